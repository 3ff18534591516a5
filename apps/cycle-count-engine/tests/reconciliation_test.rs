//! Reconciliation Integration Tests
//!
//! Drive sessions end to end through the service facade over the in-memory
//! adapters:
//! - Sampling and line creation
//! - Counting, completion and variance roll-up
//! - Verification and ledger adjustment, including retries after a fault
//! - Cancellation, tenant isolation and listings

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use cycle_count_engine::config::{Config, load_config};
use cycle_count_engine::{
    CountEntry, CountSession, CountStrategy, CycleCountError, InMemoryContainer, LineStatus,
    LocationStockLine, Money, ProductId, SessionFilter, SessionOptions, SessionStatus,
    TenantContext, TenantId, UserId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TENANT: &str = "acme";
const STORE: &str = "store-12";

/// Load a YAML config from the fixtures directory.
fn load_fixture(name: &str) -> Config {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);

    load_config(path.to_str())
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {e}", path.display()))
}

/// Stock `STORE` with `(quantity, unit cost)` of products `p-0..`.
fn stocked(config: &Config, stock: &[(i64, Decimal)]) -> InMemoryContainer {
    let container = InMemoryContainer::in_memory(config);
    container.locations().register(TENANT, STORE);
    for (i, (quantity, cost)) in stock.iter().enumerate() {
        container.ledger().seed(
            TENANT,
            LocationStockLine::new(format!("p-{i}"), STORE, *quantity, None, Money::new(*cost)),
        );
    }
    container
}

fn ctx() -> TenantContext {
    TenantContext::new(TENANT, "counter-7")
}

fn entries(session: &CountSession, counted: &[i64]) -> Vec<CountEntry> {
    session
        .lines()
        .iter()
        .zip(counted)
        .map(|(line, qty)| CountEntry::new(line.id().clone(), *qty))
        .collect()
}

fn quantity(container: &InMemoryContainer, product: &str) -> i64 {
    container
        .ledger()
        .product_quantity(&TenantId::new(TENANT), &ProductId::new(product))
        .unwrap()
}

/// Create, start, count and complete a FULL session.
async fn completed(container: &InMemoryContainer, counted: &[i64]) -> CountSession {
    let svc = container.service();
    let ctx = ctx();
    let session = svc
        .create_session(&ctx, STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    let session = svc.start_session(&ctx, session.id()).await.unwrap();
    svc.record_counts(&ctx, session.id(), &entries(&session, counted))
        .await
        .unwrap();
    svc.complete_session(&ctx, session.id()).await.unwrap()
}

// ============================================
// Scenarios
// ============================================

#[tokio::test]
async fn test_full_count_of_ten_products() {
    let stock: Vec<(i64, Decimal)> = (0..10).map(|i| (i, dec!(1))).collect();
    let container = stocked(&Config::default(), &stock);
    let svc = container.service();

    let session = svc
        .create_session(&ctx(), STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    let session = svc.start_session(&ctx(), session.id()).await.unwrap();

    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.total_items(), 10);
    assert_eq!(session.lines().len(), 10);
    assert!(session.lines().iter().all(|l| l.status() == LineStatus::Pending));
    assert!(session.lines().iter().all(|l| l.counted_quantity().is_none()));
}

#[tokio::test]
async fn test_variances_roll_up_on_completion() {
    let container = stocked(
        &Config::default(),
        &[(10, dec!(100)), (5, dec!(50)), (0, dec!(20))],
    );

    let session = completed(&container, &[10, 3, 2]).await;

    let variances: Vec<i64> = session
        .lines()
        .iter()
        .map(|l| l.variance().unwrap().quantity)
        .collect();
    assert_eq!(variances, vec![0, -2, 2]);
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.variance_count(), 2);
    assert_eq!(session.variance_value().amount(), dec!(140));
    assert_eq!(session.lines()[2].variance().unwrap().percent, dec!(100));
}

#[tokio::test]
async fn test_adjustment_moves_stock_and_logs_two_movements() {
    let container = stocked(
        &Config::default(),
        &[(10, dec!(100)), (5, dec!(50)), (0, dec!(20))],
    );
    let session = completed(&container, &[10, 3, 2]).await;
    let svc = container.service();
    let ctx = ctx();

    svc.verify_session(&ctx, session.id(), &UserId::new("manager-1"))
        .await
        .unwrap();
    let outcome = svc.adjust_session(&ctx, session.id()).await.unwrap();

    assert_eq!(outcome.movements.len(), 2);
    assert_eq!(outcome.session.status(), SessionStatus::Verified);
    assert_eq!(quantity(&container, "p-0"), 10);
    assert_eq!(quantity(&container, "p-1"), 3);
    assert_eq!(quantity(&container, "p-2"), 2);

    let movements = container.ledger().movements(&TenantId::new(TENANT));
    assert_eq!(movements.len(), 2);
    assert!(movements.iter().all(|m| m.notes.contains(session.code())));
    assert!(movements.iter().all(|m| m.user_id.as_str() == "counter-7"));
}

#[tokio::test]
async fn test_cancel_completed_session_is_rejected() {
    let container = stocked(&Config::default(), &[(4, dec!(1))]);
    let session = completed(&container, &[4]).await;
    let svc = container.service();

    let err = svc.cancel_session(&ctx(), session.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::InvalidOperation { .. }));

    let stored = svc.get_session(&ctx(), session.id()).await.unwrap();
    assert_eq!(stored.status(), SessionStatus::Completed);
}

// ============================================
// Adjustment Safety
// ============================================

#[tokio::test]
async fn test_adjust_twice_equals_once() {
    let container = stocked(&Config::default(), &[(8, dec!(2)), (3, dec!(2))]);
    let session = completed(&container, &[6, 4]).await;
    let svc = container.service();
    let ctx = ctx();
    svc.verify_session(&ctx, session.id(), &UserId::new("m"))
        .await
        .unwrap();

    let first = svc.adjust_session(&ctx, session.id()).await.unwrap();
    let second = svc.adjust_session(&ctx, session.id()).await.unwrap();

    assert_eq!(first.movements.len(), 2);
    assert!(second.is_noop());
    assert_eq!(quantity(&container, "p-0"), 6);
    assert_eq!(quantity(&container, "p-1"), 4);
    assert_eq!(container.ledger().movements(&TenantId::new(TENANT)).len(), 2);
}

#[tokio::test]
async fn test_ledger_fault_applies_nothing_and_retry_applies_once() {
    let container = stocked(&Config::default(), &[(8, dec!(2)), (3, dec!(2))]);
    let session = completed(&container, &[6, 4]).await;
    let svc = container.service();
    let ctx = ctx();
    svc.verify_session(&ctx, session.id(), &UserId::new("m"))
        .await
        .unwrap();

    container.ledger().fail_next_apply("deadlock detected");
    let err = svc.adjust_session(&ctx, session.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::LedgerTransaction { .. }));
    assert_eq!(quantity(&container, "p-0"), 8);
    assert!(container.ledger().movements(&TenantId::new(TENANT)).is_empty());

    let stored = svc.get_session(&ctx, session.id()).await.unwrap();
    assert!(stored.lines().iter().all(|l| l.status() == LineStatus::Counted));

    let outcome = svc.adjust_session(&ctx, session.id()).await.unwrap();
    assert_eq!(outcome.movements.len(), 2);
    assert_eq!(quantity(&container, "p-0"), 6);
    assert_eq!(container.ledger().movements(&TenantId::new(TENANT)).len(), 2);
}

#[tokio::test]
async fn test_adjust_before_verify_is_rejected() {
    let container = stocked(&Config::default(), &[(8, dec!(2))]);
    let session = completed(&container, &[6]).await;

    let err = container
        .service()
        .adjust_session(&ctx(), session.id())
        .await
        .unwrap_err();
    assert!(matches!(err, CycleCountError::InvalidOperation { .. }));
    assert_eq!(quantity(&container, "p-0"), 8);
}

// ============================================
// Lifecycle Edges
// ============================================

#[tokio::test]
async fn test_complete_with_uncounted_lines_fails() {
    let container = stocked(&Config::default(), &[(1, dec!(1)), (2, dec!(1))]);
    let svc = container.service();
    let ctx = ctx();
    let session = svc
        .create_session(&ctx, STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    let session = svc.start_session(&ctx, session.id()).await.unwrap();
    svc.record_counts(&ctx, session.id(), &entries(&session, &[1]))
        .await
        .unwrap();

    let err = svc.complete_session(&ctx, session.id()).await.unwrap_err();
    let CycleCountError::IncompleteCount { pending_lines } = err else {
        panic!("expected IncompleteCount, got {err:?}");
    };
    assert_eq!(pending_lines, vec![session.lines()[1].id().clone()]);
}

#[tokio::test]
async fn test_complete_with_out_of_range_variance_is_rejected() {
    for (expected, cost) in [(-5, dec!(1)), (0, dec!(100_000_000_000))] {
        let container = stocked(&Config::default(), &[(expected, cost)]);
        let svc = container.service();
        let ctx = ctx();
        let session = svc
            .create_session(&ctx, STORE, CountStrategy::Full, SessionOptions::default())
            .await
            .unwrap();
        let session = svc.start_session(&ctx, session.id()).await.unwrap();
        svc.record_counts(&ctx, session.id(), &entries(&session, &[i64::MAX]))
            .await
            .unwrap();

        let err = svc.complete_session(&ctx, session.id()).await.unwrap_err();
        assert!(
            matches!(err, CycleCountError::Validation { .. }),
            "expected Validation, got {err:?}"
        );

        let stored = svc.get_session(&ctx, session.id()).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::InProgress);
        assert!(stored.lines()[0].variance().is_none());
    }
}

#[tokio::test]
async fn test_random_sample_of_one_item_selects_it() {
    let container = stocked(&Config::default(), &[(3, dec!(1))]);
    let svc = container.service();
    let session = svc
        .create_session(
            &ctx(),
            STORE,
            CountStrategy::RandomSample,
            SessionOptions::default(),
        )
        .await
        .unwrap();
    let session = svc.start_session(&ctx(), session.id()).await.unwrap();
    assert_eq!(session.total_items(), 1);
}

#[tokio::test]
async fn test_empty_location_has_no_eligible_items() {
    let container = stocked(&Config::default(), &[]);
    let svc = container.service();
    let session = svc
        .create_session(&ctx(), STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();

    let err = svc.start_session(&ctx(), session.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::NoEligibleItems { .. }));
    let stored = svc.get_session(&ctx(), session.id()).await.unwrap();
    assert_eq!(stored.status(), SessionStatus::Draft);
}

#[tokio::test]
async fn test_unknown_location_is_not_found() {
    let container = stocked(&Config::default(), &[(1, dec!(1))]);
    let err = container
        .service()
        .create_session(&ctx(), "warehouse-9", CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CycleCountError::NotFound { .. }));
}

#[tokio::test]
async fn test_other_tenant_cannot_see_session() {
    let container = stocked(&Config::default(), &[(1, dec!(1))]);
    let svc = container.service();
    let session = svc
        .create_session(&ctx(), STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();

    let intruder = TenantContext::new("globex", "counter-7");
    let err = svc.get_session(&intruder, session.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::NotFound { .. }));
    let err = svc.cancel_session(&intruder, session.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::NotFound { .. }));

    let page = svc
        .list_sessions(&intruder, &SessionFilter::default(), None, None)
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

// ============================================
// Configured Behavior
// ============================================

#[tokio::test]
async fn test_exclusive_policy_blocks_second_open_session() {
    let config = load_fixture("exclusive.yaml");
    let container = stocked(&config, &[(5, dec!(1))]);
    let svc = container.service();
    let ctx = ctx();

    let first = svc
        .create_session(&ctx, STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    let second = svc
        .create_session(&ctx, STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    svc.start_session(&ctx, first.id()).await.unwrap();

    let err = svc.start_session(&ctx, second.id()).await.unwrap_err();
    assert!(matches!(err, CycleCountError::InvalidOperation { .. }));
    assert!(err.to_string().contains(first.code()));

    svc.cancel_session(&ctx, first.id()).await.unwrap();
    let started = svc.start_session(&ctx, second.id()).await.unwrap();
    assert_eq!(started.status(), SessionStatus::InProgress);
}

#[tokio::test]
async fn test_listing_pages_newest_first_and_searches() {
    let config = load_fixture("exclusive.yaml");
    let container = stocked(&config, &[(1, dec!(1))]);
    let svc = container.service();
    let ctx = ctx();

    for notes in ["Aisle 3", "Freezer", "aisle 9 recount"] {
        svc.create_session(
            &ctx,
            STORE,
            CountStrategy::Full,
            SessionOptions {
                notes: Some(notes.to_string()),
                ..SessionOptions::default()
            },
        )
        .await
        .unwrap();
    }

    let first = svc
        .list_sessions(&ctx, &SessionFilter::default(), None, None)
        .await
        .unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.page_size, 2);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items[0].code, "CC-000003");

    let capped = svc
        .list_sessions(&ctx, &SessionFilter::default(), Some(1), Some(1000))
        .await
        .unwrap();
    assert_eq!(capped.page_size, 5);

    let aisles = svc
        .list_sessions(&ctx, &SessionFilter::default().with_search("AISLE"), None, None)
        .await
        .unwrap();
    assert_eq!(aisles.total, 2);

    let drafts = svc
        .list_sessions(
            &ctx,
            &SessionFilter::default().with_status(SessionStatus::InProgress),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(drafts.total, 0);
}

#[tokio::test]
async fn test_every_transition_is_published() {
    let container = stocked(&Config::default(), &[(2, dec!(5))]);
    let session = completed(&container, &[1]).await;
    let svc = container.service();
    let ctx = ctx();
    svc.verify_session(&ctx, session.id(), &UserId::new("m"))
        .await
        .unwrap();
    svc.adjust_session(&ctx, session.id()).await.unwrap();

    assert_eq!(
        container.event_publisher().event_types(),
        vec![
            "COUNT_SESSION_CREATED",
            "COUNT_SESSION_STARTED",
            "COUNT_SESSION_COUNTS_RECORDED",
            "COUNT_SESSION_COMPLETED",
            "COUNT_SESSION_VERIFIED",
            "COUNT_SESSION_ADJUSTED",
        ]
    );
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_operation() {
    let container = stocked(&Config::default(), &[(2, dec!(5))]);
    container.event_publisher().fail_with("broker offline");
    let svc = container.service();

    let session = svc
        .create_session(&ctx(), STORE, CountStrategy::Full, SessionOptions::default())
        .await
        .unwrap();
    let started = svc.start_session(&ctx(), session.id()).await.unwrap();

    assert_eq!(started.status(), SessionStatus::InProgress);
    assert!(container.event_publisher().published().is_empty());
}
