//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod content;
pub mod cost;
pub mod entered;
pub mod level;
pub mod ownership;
pub mod platform;
pub mod trust;

// Re-export for convenience
pub use content::{DlcFilter, TradingCardsFilter};
pub use cost::{MaxCostFilter, MinCostFilter};
pub use entered::AlreadyEnteredFilter;
pub use level::{LevelFilter, MinimumLevelFilter};
pub use ownership::{AlreadyOwnedFilter, WishlistFilter};
pub use platform::PlatformFilter;
pub use trust::TrustFilter;

use model::Result;
use sources::Candidate;

/// Keep the candidates for which `keep` holds, preserving order.
///
/// Stops at the first fact that fails to resolve.
pub(crate) fn retain<F>(candidates: Vec<Candidate>, mut keep: F) -> Result<Vec<Candidate>>
where
    F: FnMut(&Candidate) -> Result<bool>,
{
    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if keep(&candidate)? {
            kept.push(candidate);
        }
    }
    Ok(kept)
}
