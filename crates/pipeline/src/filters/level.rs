//! Filters on the contributor level a giveaway requires.

use crate::chain::FilterSpec;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::Result;
use sources::Candidate;

/// Keeps giveaways the user's level allows entering
/// (required level <= user level).
pub struct LevelFilter;

impl Filter for LevelFilter {
    fn name(&self) -> &str {
        "level"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| c.level() <= context.level)
            .collect())
    }
}

impl ConfiguredFilter for LevelFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}

/// Keeps giveaways requiring at least `min` level (`min_level=N`).
///
/// Higher-level giveaways tend to draw fewer entrants. A negative `N`
/// keeps everything.
pub struct MinimumLevelFilter {
    min: i64,
    label: String,
}

impl MinimumLevelFilter {
    pub fn new(min: i64) -> Self {
        Self {
            min,
            label: format!("min_level={}", min),
        }
    }
}

impl Filter for MinimumLevelFilter {
    fn name(&self) -> &str {
        &self.label
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| i64::from(c.level()) >= self.min)
            .collect())
    }
}

impl ConfiguredFilter for MinimumLevelFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        Ok(Self::new(spec.numeric_arg()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::testing::{TableResolver, ids};
    use model::{Level, RawCandidateFacts};

    fn leveled(id: &str, level: Level) -> Candidate {
        Candidate::new(RawCandidateFacts::new(id, id, id, 1).with_level(level))
    }

    #[test]
    fn test_level_filter_keeps_reachable() {
        let resolver = TableResolver::default();
        let context = FilterContext::new(2, &resolver);
        let candidates = vec![leveled("a", 0), leveled("b", 2), leveled("c", 3)];

        let filtered = LevelFilter.apply(candidates, &context).unwrap();
        assert_eq!(ids(&filtered), vec!["a", "b"]);
    }

    #[test]
    fn test_minimum_level_filter() {
        let resolver = TableResolver::default();
        let context = FilterContext::new(10, &resolver);
        let candidates = vec![leveled("a", 0), leveled("b", 2), leveled("c", 3)];

        let filter =
            MinimumLevelFilter::from_spec(&FilterSpec::with_arg("min_level", "2")).unwrap();
        assert_eq!(filter.name(), "min_level=2");

        let filtered = filter.apply(candidates, &context).unwrap();
        assert_eq!(ids(&filtered), vec!["b", "c"]);
    }

    #[test]
    fn test_minimum_level_needs_number() {
        assert!(MinimumLevelFilter::from_spec(&FilterSpec::bare("min_level")).is_err());
        let spec = FilterSpec::with_arg("min_level", "two");
        assert!(MinimumLevelFilter::from_spec(&spec).is_err());
    }

    #[test]
    fn test_negative_minimum_level_keeps_all() {
        let resolver = TableResolver::default();
        let context = FilterContext::new(10, &resolver);

        let filter =
            MinimumLevelFilter::from_spec(&FilterSpec::with_arg("min_level", "-1")).unwrap();
        assert_eq!(filter.name(), "min_level=-1");

        let filtered = filter
            .apply(vec![leveled("a", 0), leveled("b", 3)], &context)
            .unwrap();
        assert_eq!(ids(&filtered), vec!["a", "b"]);
    }
}
