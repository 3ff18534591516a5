//! Count Session Aggregate Root
//!
//! A count session owns its lines and is the only way they change. Every
//! lifecycle operation is checked against [`SessionStateMachine`] before any
//! field is touched, so a rejected call leaves the session exactly as it was.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::CountLine;
use crate::domain::cycle_count::errors::CycleCountError;
use crate::domain::cycle_count::events::{
    CountSessionEvent, CountsRecorded, SessionAdjusted, SessionCancelled, SessionCompleted,
    SessionCreated, SessionStarted, SessionVerified,
};
use crate::domain::cycle_count::services::SessionStateMachine;
use crate::domain::cycle_count::value_objects::{CountStrategy, SessionAction, SessionStatus};
use crate::domain::shared::{
    LineId, LocationId, Money, ProductId, SessionId, TenantContext, TenantId, Timestamp, UserId,
};
use crate::domain::stock_ledger::{AbcClass, AdjustmentBatch, LocationStockLine};

/// Optional settings for a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Hide expected quantities from counters. Enforced by presentation.
    pub is_blind: bool,
    /// Class to count, for `ABC_BASED` sessions.
    pub abc_filter: Option<AbcClass>,
    /// When the count is planned.
    pub scheduled_date: Option<Timestamp>,
    /// Counter the session is assigned to.
    pub assigned_to_id: Option<UserId>,
    /// Free-text notes, searchable.
    pub notes: Option<String>,
    /// Products to count, for `SPOT_CHECK` sessions.
    pub spot_check_products: Vec<ProductId>,
}

/// Command to create a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionCommand {
    /// Location to count.
    pub location_id: LocationId,
    /// Sampling strategy.
    pub strategy: CountStrategy,
    /// Optional settings.
    pub options: SessionOptions,
}

impl CreateSessionCommand {
    /// Create a command with default options.
    #[must_use]
    pub fn new(location_id: impl Into<LocationId>, strategy: CountStrategy) -> Self {
        Self {
            location_id: location_id.into(),
            strategy,
            options: SessionOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the strategy's required inputs are missing.
    pub fn validate(&self) -> Result<(), CycleCountError> {
        if self.location_id.as_str().trim().is_empty() {
            return Err(CycleCountError::validation(
                "location_id",
                "location is required",
            ));
        }

        if self.strategy.requires_abc_filter() && self.options.abc_filter.is_none() {
            return Err(CycleCountError::validation(
                "abc_filter",
                "an ABC class is required for ABC_BASED counts",
            ));
        }

        if self.strategy.requires_product_list() {
            if self.options.spot_check_products.is_empty() {
                return Err(CycleCountError::validation(
                    "spot_check_products",
                    "at least one product is required for SPOT_CHECK counts",
                ));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = self
                .options
                .spot_check_products
                .iter()
                .find(|p| !seen.insert(*p))
            {
                return Err(CycleCountError::validation(
                    "spot_check_products",
                    format!("product {dup} is listed more than once"),
                ));
            }
        }

        Ok(())
    }
}

/// A physical count reported against one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    /// Line being counted.
    pub line_id: LineId,
    /// Quantity found on the shelf.
    pub counted_quantity: i64,
    /// Counter's notes; `None` keeps existing notes.
    pub notes: Option<String>,
}

impl CountEntry {
    /// Create an entry without notes.
    #[must_use]
    pub fn new(line_id: impl Into<LineId>, counted_quantity: i64) -> Self {
        Self {
            line_id: line_id.into(),
            counted_quantity,
            notes: None,
        }
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Lines-free view of a session used by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSessionSummary {
    /// Session ID.
    pub id: SessionId,
    /// Human-readable code.
    pub code: String,
    /// Location counted.
    pub location_id: LocationId,
    /// Sampling strategy.
    pub strategy: CountStrategy,
    /// Current status.
    pub status: SessionStatus,
    /// Blind count flag.
    pub is_blind: bool,
    /// Assigned counter.
    pub assigned_to_id: Option<UserId>,
    /// Scheduled date.
    pub scheduled_date: Option<Timestamp>,
    /// Lines in the session.
    pub total_items: usize,
    /// Lines counted so far.
    pub counted_items: usize,
    /// Lines with non-zero variance.
    pub variance_count: usize,
    /// Sum of absolute variance values.
    pub variance_value: Money,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Count Session Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountSession {
    id: SessionId,
    code: String,
    tenant_id: TenantId,
    location_id: LocationId,
    strategy: CountStrategy,
    is_blind: bool,
    abc_filter: Option<AbcClass>,
    spot_check_products: Vec<ProductId>,
    status: SessionStatus,
    scheduled_date: Option<Timestamp>,
    assigned_to_id: Option<UserId>,
    created_by_id: UserId,
    verified_by_id: Option<UserId>,
    notes: Option<String>,
    lines: Vec<CountLine>,
    total_items: usize,
    counted_items: usize,
    variance_count: usize,
    variance_value: Money,
    created_at: Timestamp,
    started_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    verified_at: Option<Timestamp>,
    cancelled_at: Option<Timestamp>,
    updated_at: Timestamp,
    version: u64,
    #[serde(skip)]
    events: Vec<CountSessionEvent>,
}

impl CountSession {
    /// Create a draft session with no lines.
    ///
    /// Generates a `Created` event.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the command is invalid.
    pub fn create(
        cmd: CreateSessionCommand,
        code: impl Into<String>,
        ctx: &TenantContext,
    ) -> Result<Self, CycleCountError> {
        cmd.validate()?;

        let code = code.into();
        let now = Timestamp::now();
        let id = SessionId::generate();
        let CreateSessionCommand {
            location_id,
            strategy,
            options,
        } = cmd;

        let mut session = Self {
            id: id.clone(),
            code: code.clone(),
            tenant_id: ctx.tenant_id.clone(),
            location_id: location_id.clone(),
            strategy,
            is_blind: options.is_blind,
            abc_filter: options.abc_filter.filter(|_| strategy.requires_abc_filter()),
            spot_check_products: options.spot_check_products,
            status: SessionStatus::Draft,
            scheduled_date: options.scheduled_date,
            assigned_to_id: options.assigned_to_id,
            created_by_id: ctx.user_id.clone(),
            verified_by_id: None,
            notes: options.notes,
            lines: Vec::new(),
            total_items: 0,
            counted_items: 0,
            variance_count: 0,
            variance_value: Money::ZERO,
            created_at: now,
            started_at: None,
            completed_at: None,
            verified_at: None,
            cancelled_at: None,
            updated_at: now,
            version: 0,
            events: Vec::new(),
        };

        session.events.push(CountSessionEvent::Created(SessionCreated {
            session_id: id,
            tenant_id: ctx.tenant_id.clone(),
            code,
            location_id,
            strategy,
            created_by: ctx.user_id.clone(),
            occurred_at: now,
        }));

        Ok(session)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the session ID.
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Get the human-readable code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Get the location being counted.
    #[must_use]
    pub const fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    /// Get the sampling strategy.
    #[must_use]
    pub const fn strategy(&self) -> CountStrategy {
        self.strategy
    }

    /// Check whether this is a blind count.
    #[must_use]
    pub const fn is_blind(&self) -> bool {
        self.is_blind
    }

    /// Get the ABC filter.
    #[must_use]
    pub const fn abc_filter(&self) -> Option<AbcClass> {
        self.abc_filter
    }

    /// Get the caller-chosen products of a spot check.
    #[must_use]
    pub fn spot_check_products(&self) -> &[ProductId] {
        &self.spot_check_products
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Get the scheduled date.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<Timestamp> {
        self.scheduled_date
    }

    /// Get the assigned counter.
    #[must_use]
    pub const fn assigned_to_id(&self) -> Option<&UserId> {
        self.assigned_to_id.as_ref()
    }

    /// Get the creator.
    #[must_use]
    pub const fn created_by_id(&self) -> &UserId {
        &self.created_by_id
    }

    /// Get the verifier, once verified.
    #[must_use]
    pub const fn verified_by_id(&self) -> Option<&UserId> {
        self.verified_by_id.as_ref()
    }

    /// Get the session notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Get the lines.
    #[must_use]
    pub fn lines(&self) -> &[CountLine] {
        &self.lines
    }

    /// Find a line by ID.
    #[must_use]
    pub fn line(&self, line_id: &LineId) -> Option<&CountLine> {
        self.lines.iter().find(|l| l.id() == line_id)
    }

    /// Get the number of lines.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Get the number of counted lines.
    #[must_use]
    pub const fn counted_items(&self) -> usize {
        self.counted_items
    }

    /// Get the number of lines with non-zero variance.
    #[must_use]
    pub const fn variance_count(&self) -> usize {
        self.variance_count
    }

    /// Get the sum of absolute variance values.
    #[must_use]
    pub const fn variance_value(&self) -> Money {
        self.variance_value
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// Get the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Get the verification timestamp.
    #[must_use]
    pub const fn verified_at(&self) -> Option<Timestamp> {
        self.verified_at
    }

    /// Get the cancellation timestamp.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Get the persisted version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Check whether some variance has not reached the ledger yet.
    #[must_use]
    pub fn has_unadjusted_variance(&self) -> bool {
        self.lines.iter().any(CountLine::needs_adjustment)
    }

    /// Check whether this session still has claims on its location's stock:
    /// counting underway, variances awaiting sign-off, or verified variances
    /// not yet applied.
    #[must_use]
    pub fn holds_location(&self) -> bool {
        match self.status {
            SessionStatus::InProgress | SessionStatus::Completed => true,
            SessionStatus::Verified => self.has_unadjusted_variance(),
            SessionStatus::Draft | SessionStatus::Cancelled => false,
        }
    }

    /// Lines-free view of this session.
    #[must_use]
    pub fn summary(&self) -> CountSessionSummary {
        CountSessionSummary {
            id: self.id.clone(),
            code: self.code.clone(),
            location_id: self.location_id.clone(),
            strategy: self.strategy,
            status: self.status,
            is_blind: self.is_blind,
            assigned_to_id: self.assigned_to_id.clone(),
            scheduled_date: self.scheduled_date,
            total_items: self.total_items,
            counted_items: self.counted_items,
            variance_count: self.variance_count,
            variance_value: self.variance_value,
            created_at: self.created_at,
        }
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Check that `action` is legal in the current status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if it is not.
    pub fn ensure_can(&self, action: SessionAction) -> Result<SessionStatus, CycleCountError> {
        SessionStateMachine::validate_action(self.status, action)
    }

    /// Materialize the sampled lines and start counting.
    ///
    /// Generates a `Started` event.
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` if the session is not in draft.
    /// - `NoEligibleItems` if nothing was selected; the session stays in draft.
    /// - `Validation` if a product appears twice in the selection.
    pub fn start(&mut self, selected: &[LocationStockLine]) -> Result<(), CycleCountError> {
        let target = self.ensure_can(SessionAction::Start)?;

        if selected.is_empty() {
            return Err(CycleCountError::NoEligibleItems {
                location_id: self.location_id.clone(),
                strategy: self.strategy,
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = selected.iter().find(|l| !seen.insert(&l.product_id)) {
            return Err(CycleCountError::validation(
                "snapshot",
                format!("product {} appears more than once", dup.product_id),
            ));
        }

        self.lines = selected.iter().map(CountLine::from_snapshot).collect();
        self.total_items = self.lines.len();
        self.counted_items = 0;
        self.transition_to(target)?;
        self.started_at = Some(self.updated_at);

        self.events.push(CountSessionEvent::Started(SessionStarted {
            session_id: self.id.clone(),
            total_items: self.total_items,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Record physical counts. Callable any number of times while in progress.
    ///
    /// The batch is validated as a whole before any line changes. Returns the
    /// number of lines whose count was kept.
    ///
    /// Generates a `CountsRecorded` event.
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` if the session is not in progress.
    /// - `Validation` if the batch is empty or a quantity is negative.
    /// - `NotFound` if a line is not part of this session.
    pub fn record_counts(
        &mut self,
        entries: &[CountEntry],
        at: Timestamp,
    ) -> Result<usize, CycleCountError> {
        let target = self.ensure_can(SessionAction::RecordCounts)?;

        if entries.is_empty() {
            return Err(CycleCountError::validation(
                "lines",
                "at least one count is required",
            ));
        }

        let index: HashMap<&LineId, usize> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id(), i))
            .collect();

        let mut positions = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.counted_quantity < 0 {
                return Err(CycleCountError::validation(
                    "counted_quantity",
                    format!(
                        "line {} has negative count {}",
                        entry.line_id, entry.counted_quantity
                    ),
                ));
            }
            let position = index
                .get(&entry.line_id)
                .copied()
                .ok_or_else(|| CycleCountError::not_found("CountLine", &entry.line_id))?;
            positions.push(position);
        }

        let recorded = entries
            .iter()
            .zip(positions)
            .filter(|(entry, position)| {
                self.lines[*position].record(entry.counted_quantity, entry.notes.clone(), at)
            })
            .count();

        self.counted_items = self.lines.iter().filter(|l| l.is_counted()).count();
        self.transition_to(target)?;

        self.events.push(CountSessionEvent::CountsRecorded(CountsRecorded {
            session_id: self.id.clone(),
            lines_recorded: recorded,
            counted_items: self.counted_items,
            occurred_at: self.updated_at,
        }));

        Ok(recorded)
    }

    /// Close counting and compute every line's variance.
    ///
    /// `unit_costs` is the current cost basis per product; it is frozen onto
    /// each line.
    ///
    /// Generates a `Completed` event.
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` if the session is not in progress.
    /// - `IncompleteCount` listing every uncounted line.
    /// - `NotFound` if a product has no cost basis.
    /// - `Validation` if a variance cannot be represented. No line is
    ///   settled in that case.
    pub fn complete(
        &mut self,
        unit_costs: &HashMap<ProductId, Money>,
    ) -> Result<(), CycleCountError> {
        let target = self.ensure_can(SessionAction::Complete)?;

        let pending_lines: Vec<LineId> = self
            .lines
            .iter()
            .filter(|l| !l.is_counted())
            .map(|l| l.id().clone())
            .collect();
        if !pending_lines.is_empty() {
            return Err(CycleCountError::IncompleteCount { pending_lines });
        }

        if let Some(missing) = self
            .lines
            .iter()
            .find(|l| !unit_costs.contains_key(l.product_id()))
        {
            return Err(CycleCountError::not_found(
                "ProductCost",
                missing.product_id(),
            ));
        }

        let mut settled = Vec::with_capacity(self.lines.len());
        let mut variance_count = 0;
        let mut variance_value = Money::ZERO;
        for line in &self.lines {
            let cost = unit_costs
                .get(line.product_id())
                .copied()
                .unwrap_or(Money::ZERO);
            let variance = line.evaluate(cost)?;
            if let Some(variance) = variance {
                if !variance.is_zero() {
                    variance_count += 1;
                }
                variance_value = variance_value
                    .checked_add(variance.value.abs())
                    .ok_or_else(|| {
                        CycleCountError::validation(
                            "variance_value",
                            "total variance value is out of range",
                        )
                    })?;
            }
            settled.push((variance, cost));
        }

        for (line, (variance, cost)) in self.lines.iter_mut().zip(settled) {
            if let Some(variance) = variance {
                line.settle(variance, cost);
            }
        }

        self.variance_count = variance_count;
        self.variance_value = variance_value;
        self.transition_to(target)?;
        self.completed_at = Some(self.updated_at);

        self.events.push(CountSessionEvent::Completed(SessionCompleted {
            session_id: self.id.clone(),
            variance_count,
            variance_value,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Sign off the computed variances. Nothing is recomputed.
    ///
    /// Generates a `Verified` event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the session is not completed.
    pub fn verify(&mut self, verifier: &UserId) -> Result<(), CycleCountError> {
        let target = self.ensure_can(SessionAction::Verify)?;

        self.transition_to(target)?;
        self.verified_by_id = Some(verifier.clone());
        self.verified_at = Some(self.updated_at);

        self.events.push(CountSessionEvent::Verified(SessionVerified {
            session_id: self.id.clone(),
            verified_by: verifier.clone(),
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Ledger corrections still owed by this session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the session is not verified.
    pub fn pending_adjustments(&self, actor: &UserId) -> Result<AdjustmentBatch, CycleCountError> {
        self.ensure_can(SessionAction::Adjust)?;

        Ok(AdjustmentBatch {
            tenant_id: self.tenant_id.clone(),
            location_id: self.location_id.clone(),
            session_code: self.code.clone(),
            actor: actor.clone(),
            adjustments: self
                .lines
                .iter()
                .filter_map(CountLine::pending_adjustment)
                .collect(),
        })
    }

    /// Mark lines the ledger has applied. Lines already adjusted, or without
    /// variance, are skipped. Returns the number of lines newly marked.
    ///
    /// Generates an `Adjusted` event when anything changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the session is not verified.
    pub fn mark_adjusted<'a>(
        &mut self,
        settled: impl IntoIterator<Item = &'a LineId>,
    ) -> Result<usize, CycleCountError> {
        let target = self.ensure_can(SessionAction::Adjust)?;

        let settled: HashSet<&LineId> = settled.into_iter().collect();
        let mut marked = 0;
        let mut net_delta = 0;
        for line in &mut self.lines {
            if settled.contains(line.id()) && line.needs_adjustment() {
                net_delta += line.variance().map_or(0, |v| v.quantity);
                line.mark_adjusted();
                marked += 1;
            }
        }

        if marked > 0 {
            self.transition_to(target)?;
            self.events.push(CountSessionEvent::Adjusted(SessionAdjusted {
                session_id: self.id.clone(),
                lines_adjusted: marked,
                net_delta,
                occurred_at: self.updated_at,
            }));
        }

        Ok(marked)
    }

    /// Abandon the session.
    ///
    /// Generates a `Cancelled` event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` once completed, verified or already cancelled.
    pub fn cancel(&mut self) -> Result<(), CycleCountError> {
        let target = self.ensure_can(SessionAction::Cancel)?;
        let previous_status = self.status;

        self.transition_to(target)?;
        self.cancelled_at = Some(self.updated_at);

        self.events.push(CountSessionEvent::Cancelled(SessionCancelled {
            session_id: self.id.clone(),
            previous_status,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    // ========================================================================
    // Events and persistence
    // ========================================================================

    /// Take all pending domain events.
    pub fn drain_events(&mut self) -> Vec<CountSessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending domain events.
    #[must_use]
    pub fn events(&self) -> &[CountSessionEvent] {
        &self.events
    }

    pub(crate) const fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn transition_to(&mut self, to: SessionStatus) -> Result<(), CycleCountError> {
        SessionStateMachine::validate_transition(self.status, to)?;
        self.status = to;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle_count::value_objects::LineStatus;
    use rust_decimal_macros::dec;

    fn ctx() -> TenantContext {
        TenantContext::new("tenant-1", "user-1")
    }

    fn snapshot(quantities: &[i64]) -> Vec<LocationStockLine> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| {
                LocationStockLine::new(format!("p-{i}"), "loc-1", *q, None, Money::ZERO)
            })
            .collect()
    }

    fn costs(values: &[Money]) -> HashMap<ProductId, Money> {
        values
            .iter()
            .enumerate()
            .map(|(i, c)| (ProductId::new(format!("p-{i}")), *c))
            .collect()
    }

    fn draft() -> CountSession {
        CountSession::create(
            CreateSessionCommand::new("loc-1", CountStrategy::Full),
            "CC-000001",
            &ctx(),
        )
        .unwrap()
    }

    fn counted(expected: &[i64], counts: &[i64]) -> CountSession {
        let mut session = draft();
        session.start(&snapshot(expected)).unwrap();
        let entries: Vec<CountEntry> = session
            .lines()
            .iter()
            .zip(counts)
            .map(|(l, c)| CountEntry::new(l.id().clone(), *c))
            .collect();
        session.record_counts(&entries, Timestamp::now()).unwrap();
        session
    }

    #[test]
    fn create_is_draft_without_lines() {
        let mut session = draft();
        assert_eq!(session.status(), SessionStatus::Draft);
        assert!(session.lines().is_empty());
        assert_eq!(session.code(), "CC-000001");
        assert_eq!(session.created_by_id().as_str(), "user-1");
        assert_eq!(session.version(), 0);

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CountSessionEvent::Created(_)));
        assert!(session.events().is_empty());
    }

    #[test]
    fn abc_based_requires_filter() {
        let err = CountSession::create(
            CreateSessionCommand::new("loc-1", CountStrategy::AbcBased),
            "CC-1",
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, CycleCountError::Validation { ref field, .. } if field == "abc_filter"));
    }

    #[test]
    fn spot_check_requires_products() {
        let err = CountSession::create(
            CreateSessionCommand::new("loc-1", CountStrategy::SpotCheck),
            "CC-1",
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, CycleCountError::Validation { ref field, .. } if field == "spot_check_products"));
    }

    #[test]
    fn abc_filter_dropped_for_other_strategies() {
        let session = CountSession::create(
            CreateSessionCommand::new("loc-1", CountStrategy::Full).with_options(SessionOptions {
                abc_filter: Some(AbcClass::A),
                ..SessionOptions::default()
            }),
            "CC-1",
            &ctx(),
        )
        .unwrap();
        assert_eq!(session.abc_filter(), None);
    }

    #[test]
    fn start_creates_pending_lines() {
        let mut session = draft();
        session.start(&snapshot(&[4, 0, 9])).unwrap();

        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.total_items(), 3);
        assert_eq!(session.lines().len(), 3);
        assert!(session.started_at().is_some());
        assert!(session
            .lines()
            .iter()
            .all(|l| l.status() == LineStatus::Pending && l.counted_quantity().is_none()));
    }

    #[test]
    fn start_with_empty_selection_stays_draft() {
        let mut session = draft();
        let err = session.start(&[]).unwrap_err();
        assert!(matches!(err, CycleCountError::NoEligibleItems { .. }));
        assert_eq!(session.status(), SessionStatus::Draft);
        assert!(session.lines().is_empty());
    }

    #[test]
    fn start_twice_is_invalid() {
        let mut session = draft();
        session.start(&snapshot(&[1])).unwrap();
        let err = session.start(&snapshot(&[1])).unwrap_err();
        assert!(matches!(err, CycleCountError::InvalidOperation { .. }));
        assert_eq!(session.total_items(), 1);
    }

    #[test]
    fn record_counts_is_incremental() {
        let mut session = draft();
        session.start(&snapshot(&[10, 5, 0])).unwrap();
        let first = session.lines()[0].id().clone();
        let second = session.lines()[1].id().clone();

        session
            .record_counts(&[CountEntry::new(first, 10)], Timestamp::now())
            .unwrap();
        assert_eq!(session.counted_items(), 1);

        session
            .record_counts(&[CountEntry::new(second, 3)], Timestamp::now())
            .unwrap();
        assert_eq!(session.counted_items(), 2);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn record_counts_rejects_whole_batch_on_bad_entry() {
        let mut session = draft();
        session.start(&snapshot(&[10, 5])).unwrap();
        let good = session.lines()[0].id().clone();

        let err = session
            .record_counts(
                &[CountEntry::new(good.clone(), 10), CountEntry::new("nope", 1)],
                Timestamp::now(),
            )
            .unwrap_err();
        assert!(matches!(err, CycleCountError::NotFound { entity: "CountLine", .. }));

        let err = session
            .record_counts(
                &[CountEntry::new(good.clone(), 10), CountEntry::new(good.clone(), -1)],
                Timestamp::now(),
            )
            .unwrap_err();
        assert!(matches!(err, CycleCountError::Validation { .. }));

        assert_eq!(session.counted_items(), 0);
        assert!(session.line(&good).unwrap().counted_quantity().is_none());
    }

    #[test]
    fn record_counts_on_draft_is_invalid() {
        let mut session = draft();
        let err = session
            .record_counts(&[CountEntry::new("l", 1)], Timestamp::now())
            .unwrap_err();
        assert!(matches!(
            err,
            CycleCountError::InvalidOperation {
                action: SessionAction::RecordCounts,
                status: SessionStatus::Draft,
                ..
            }
        ));
    }

    #[test]
    fn complete_lists_uncounted_lines() {
        let mut session = draft();
        session.start(&snapshot(&[1, 2, 3])).unwrap();
        let first = session.lines()[0].id().clone();
        session
            .record_counts(&[CountEntry::new(first, 1)], Timestamp::now())
            .unwrap();

        let err = session.complete(&costs(&[Money::ZERO; 3])).unwrap_err();
        match err {
            CycleCountError::IncompleteCount { pending_lines } => {
                assert_eq!(pending_lines.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn complete_computes_variances() {
        let mut session = counted(&[10, 5, 0], &[10, 3, 2]);
        session
            .complete(&costs(&[
                Money::new(dec!(100)),
                Money::new(dec!(50)),
                Money::new(dec!(20)),
            ]))
            .unwrap();

        let variances: Vec<i64> = session
            .lines()
            .iter()
            .map(|l| l.variance().unwrap().quantity)
            .collect();
        assert_eq!(variances, vec![0, -2, 2]);
        assert_eq!(session.variance_count(), 2);
        assert_eq!(session.variance_value().amount(), dec!(140));
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(session.completed_at().is_some());
    }

    #[test]
    fn complete_without_cost_basis_fails() {
        let mut session = counted(&[1, 1], &[1, 1]);
        let err = session.complete(&costs(&[Money::ZERO])).unwrap_err();
        assert!(matches!(err, CycleCountError::NotFound { entity: "ProductCost", .. }));
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn complete_with_unrepresentable_variance_settles_nothing() {
        let mut session = counted(&[3, -5], &[1, i64::MAX]);
        let err = session.complete(&costs(&[Money::new(dec!(1)); 2])).unwrap_err();
        assert!(matches!(err, CycleCountError::Validation { .. }));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert!(session.lines().iter().all(|l| l.variance().is_none()));
        assert!(session.events().iter().all(|e| !matches!(e, CountSessionEvent::Completed(_))));
    }

    #[test]
    fn complete_with_overflowing_variance_value_fails() {
        let mut session = counted(&[0], &[i64::MAX]);
        let err = session
            .complete(&costs(&[Money::new(dec!(100_000_000_000))]))
            .unwrap_err();
        assert!(matches!(err, CycleCountError::Validation { .. }));
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn verify_records_verifier() {
        let mut session = counted(&[1], &[2]);
        session.complete(&costs(&[Money::ZERO])).unwrap();
        session.verify(&UserId::new("manager")).unwrap();
        assert_eq!(session.status(), SessionStatus::Verified);
        assert_eq!(session.verified_by_id().map(UserId::as_str), Some("manager"));
        assert!(session.verified_at().is_some());
    }

    #[test]
    fn adjustments_skip_zero_and_adjusted_lines() {
        let mut session = counted(&[10, 5, 0], &[10, 3, 2]);
        session.complete(&costs(&[Money::ZERO; 3])).unwrap();
        session.verify(&UserId::new("manager")).unwrap();

        let batch = session.pending_adjustments(&UserId::new("manager")).unwrap();
        assert_eq!(batch.adjustments.len(), 2);
        assert_eq!(batch.net_delta(), 0);
        assert_eq!(batch.session_code, "CC-000001");

        let ids: Vec<LineId> = batch.adjustments.iter().map(|a| a.line_id.clone()).collect();
        assert_eq!(session.mark_adjusted(&ids).unwrap(), 2);
        assert_eq!(session.mark_adjusted(&ids).unwrap(), 0);
        assert!(session
            .pending_adjustments(&UserId::new("manager"))
            .unwrap()
            .is_empty());
        assert!(!session.has_unadjusted_variance());
        assert_eq!(session.status(), SessionStatus::Verified);
    }

    #[test]
    fn adjust_before_verify_is_invalid() {
        let mut session = counted(&[1], &[2]);
        session.complete(&costs(&[Money::ZERO])).unwrap();
        let err = session.pending_adjustments(&UserId::new("u")).unwrap_err();
        assert!(matches!(err, CycleCountError::InvalidOperation { .. }));
    }

    #[test]
    fn cancel_rules() {
        let mut session = draft();
        session.cancel().unwrap();
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert!(session.cancelled_at().is_some());
        assert!(matches!(
            session.cancel().unwrap_err(),
            CycleCountError::InvalidOperation { .. }
        ));

        let mut completed = counted(&[1], &[1]);
        completed.complete(&costs(&[Money::ZERO])).unwrap();
        assert!(matches!(
            completed.cancel().unwrap_err(),
            CycleCountError::InvalidOperation { .. }
        ));
        assert_eq!(completed.status(), SessionStatus::Completed);
    }

    #[test]
    fn holds_location_until_adjusted() {
        let mut session = draft();
        assert!(!session.holds_location());
        session.start(&snapshot(&[3])).unwrap();
        assert!(session.holds_location());
        let line = session.lines()[0].id().clone();
        session
            .record_counts(&[CountEntry::new(line.clone(), 1)], Timestamp::now())
            .unwrap();
        session.complete(&costs(&[Money::ZERO])).unwrap();
        session.verify(&UserId::new("m")).unwrap();
        assert!(session.holds_location());
        session.mark_adjusted([&line]).unwrap();
        assert!(!session.holds_location());
    }

    #[test]
    fn summary_has_no_lines() {
        let session = counted(&[1, 2], &[1, 2]);
        let summary = session.summary();
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.counted_items, 2);
        assert_eq!(summary.status, SessionStatus::InProgress);
    }
}
