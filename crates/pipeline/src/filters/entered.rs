//! Filter to exclude giveaways the user already entered.

use crate::chain::FilterSpec;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::Result;
use sources::Candidate;

/// Removes candidates whose listing marks them as already entered.
///
/// The `entered` flag is an eager listing fact, so this filter never
/// touches the resolver.
pub struct AlreadyEnteredFilter;

impl Filter for AlreadyEnteredFilter {
    fn name(&self) -> &str {
        "entered"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates.into_iter().filter(|c| !c.entered()).collect())
    }
}

impl ConfiguredFilter for AlreadyEnteredFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::testing::{TableResolver, ids};
    use model::RawCandidateFacts;

    #[test]
    fn test_already_entered_filter() {
        let resolver = TableResolver::default();
        let context = FilterContext::new(0, &resolver);

        let candidates = vec![
            Candidate::new(RawCandidateFacts::new("1", "One", "l1", 5).with_entered(true)),
            Candidate::new(RawCandidateFacts::new("2", "Two", "l2", 5)),
        ];

        let filtered = AlreadyEnteredFilter.apply(candidates, &context).unwrap();
        assert_eq!(ids(&filtered), vec!["2"]);
        assert_eq!(resolver.calls.get(), 0);
    }

    #[test]
    fn test_rejects_argument() {
        assert!(AlreadyEnteredFilter::from_spec(&FilterSpec::with_arg("entered", "1")).is_err());
    }
}
