//! Filter on the giveaway author's trust score.

use crate::chain::FilterSpec;
use crate::filters::retain;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::{Result, TrustScore};
use sources::Candidate;

/// Keeps giveaways whose author is trusted enough.
///
/// ## Configuration
/// - `trust` keeps authors with a positive score (`>= 1`)
/// - `trust=N` keeps authors with a score of at least `N`
/// - `trust=N` with `N <= -1` disables the filter entirely
///
/// A disabled filter passes everything through without resolving trust.
pub struct TrustFilter {
    min: Option<TrustScore>,
    label: String,
}

impl TrustFilter {
    pub fn new(min: Option<TrustScore>) -> Self {
        let label = match min {
            Some(min) => format!("trust={}", min),
            None => "trust=off".to_string(),
        };
        Self { min, label }
    }

    pub fn threshold(&self) -> Option<TrustScore> {
        self.min
    }
}

impl Filter for TrustFilter {
    fn name(&self) -> &str {
        &self.label
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        let Some(min) = self.min else {
            return Ok(candidates);
        };
        retain(candidates, |c| Ok(c.trust(context.resolver)? >= min))
    }
}

impl ConfiguredFilter for TrustFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        let min = match spec.arg() {
            None => Some(1),
            Some(_) => {
                let n: TrustScore = spec.numeric_arg()?;
                (n > -1).then_some(n)
            }
        };
        Ok(Self::new(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::testing::{TableResolver, candidate, ids};
    use model::{Fact, FactValue};

    fn resolver() -> TableResolver {
        TableResolver::default()
            .with("a", Fact::Trust, FactValue::Score(-3))
            .with("b", Fact::Trust, FactValue::Score(0))
            .with("c", Fact::Trust, FactValue::Score(7))
    }

    fn candidates() -> Vec<Candidate> {
        vec![candidate("a", 1), candidate("b", 1), candidate("c", 1)]
    }

    #[test]
    fn test_bare_trust_requires_positive() {
        let resolver = resolver();
        let context = FilterContext::new(0, &resolver);

        let filter = TrustFilter::from_spec(&FilterSpec::bare("trust")).unwrap();
        let filtered = filter.apply(candidates(), &context).unwrap();
        assert_eq!(ids(&filtered), vec!["c"]);
    }

    #[test]
    fn test_trust_threshold() {
        let resolver = resolver();
        let context = FilterContext::new(0, &resolver);

        let filter = TrustFilter::from_spec(&FilterSpec::with_arg("trust", "0")).unwrap();
        let filtered = filter.apply(candidates(), &context).unwrap();
        assert_eq!(ids(&filtered), vec!["b", "c"]);
    }

    #[test]
    fn test_negative_threshold_disables_without_lookups() {
        let resolver = resolver();
        let context = FilterContext::new(0, &resolver);

        let filter = TrustFilter::from_spec(&FilterSpec::with_arg("trust", "-1")).unwrap();
        assert_eq!(filter.threshold(), None);

        let filtered = filter.apply(candidates(), &context).unwrap();
        assert_eq!(filtered.len(), 3);
        assert_eq!(resolver.calls.get(), 0);
    }

    #[test]
    fn test_unresolvable_trust_is_an_error() {
        let resolver = TableResolver::default();
        let context = FilterContext::new(0, &resolver);

        let filter = TrustFilter::new(Some(1));
        assert!(filter.apply(candidates(), &context).is_err());
    }
}
