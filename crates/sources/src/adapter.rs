//! Capability traits implemented by site adapters.
//!
//! A site does not inherit from a shared base; it implements the
//! capabilities the harvester needs and gets [`Site`] for free. Every call
//! blocks the calling worker until the site answers.

use model::{
    EntryOutcome, Fact, FactValue, Level, Points, RawCandidateFacts, RawClaimFacts, Result,
};

/// Account state behind an authenticated session
pub trait SessionHolder {
    /// Fetch a page that only renders the logged-in marker for a live session
    fn check_session_valid(&self) -> Result<bool>;

    /// Points available right now; read once per cycle
    fn current_point_balance(&self) -> Result<Points>;

    fn current_level(&self) -> Result<Level>;
}

/// Paged giveaway listing
pub trait CandidateSource {
    /// Fetch one page (1-based). An empty page means there are no more.
    fn fetch_page(&self, page: u32) -> Result<Vec<RawCandidateFacts>>;
}

/// Answers lazy fact queries for a candidate
pub trait FactResolver {
    fn resolve_fact(&self, candidate: &RawCandidateFacts, fact: Fact) -> Result<FactValue>;
}

/// Performs the remote "enter giveaway" action
pub trait EntryAttempter {
    fn attempt_entry(&self, candidate: &RawCandidateFacts) -> EntryOutcome;
}

/// Won/completed giveaways listing
pub trait ClaimSource {
    fn fetch_claims_listing(&self) -> Result<Vec<RawClaimFacts>>;
}

/// Everything a worker needs from one site
pub trait Site: SessionHolder + CandidateSource + FactResolver + EntryAttempter + ClaimSource {}

impl<T> Site for T where
    T: SessionHolder + CandidateSource + FactResolver + EntryAttempter + ClaimSource
{
}

/// True when `page` contains the logged-in `marker`
pub fn page_has_marker(page: &str, marker: &str) -> bool {
    !marker.is_empty() && page.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_check() {
        let page = r#"<div class="nav__avatar-inner-wrap"></div>"#;
        assert!(page_has_marker(page, "nav__avatar-inner-wrap"));
        assert!(!page_has_marker("<a>Sign in</a>", "nav__avatar-inner-wrap"));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert!(!page_has_marker("anything", ""));
    }
}
