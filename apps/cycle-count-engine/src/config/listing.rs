//! Listing configuration.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::ListingPolicy;

/// Pagination limits for session listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size when the caller gives none.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Largest page size a caller may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl ListingConfig {
    /// Listing policy built from this section.
    #[must_use]
    pub const fn policy(&self) -> ListingPolicy {
        ListingPolicy {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

const fn default_page_size() -> usize {
    50
}

const fn default_max_page_size() -> usize {
    200
}
