//! A giveaway under evaluation.
//!
//! Eager facts come straight from the listing page. The rest are resolved
//! through the site's [`FactResolver`] on first read and cached for the
//! lifetime of the `Candidate`, which never outlives one harvesting cycle.

use model::{
    EntryRecord, Fact, FactValue, HarvestError, Level, PlatformSet, Points, RawCandidateFacts,
    Result, TrustScore,
};
use tracing::debug;

use crate::adapter::FactResolver;
use crate::lazy::LazyFact;

#[derive(Debug)]
pub struct Candidate {
    facts: RawCandidateFacts,
    owned: LazyFact<bool>,
    wishlisted: LazyFact<bool>,
    dlc: LazyFact<bool>,
    cards: LazyFact<bool>,
    trust: LazyFact<TrustScore>,
    platforms: LazyFact<PlatformSet>,
}

impl Candidate {
    /// Wrap listing facts; preloaded lazy facts start out resolved
    pub fn new(facts: RawCandidateFacts) -> Self {
        let preloaded = facts.preloaded.clone();
        Self {
            owned: LazyFact::from_option(preloaded.owned),
            wishlisted: LazyFact::from_option(preloaded.wishlisted),
            dlc: LazyFact::from_option(preloaded.dlc),
            cards: LazyFact::from_option(preloaded.cards),
            trust: LazyFact::from_option(preloaded.trust),
            platforms: LazyFact::from_option(preloaded.platforms),
            facts,
        }
    }

    pub fn id(&self) -> &str {
        &self.facts.id
    }

    pub fn title(&self) -> &str {
        &self.facts.title
    }

    pub fn link(&self) -> &str {
        &self.facts.link
    }

    pub fn cost(&self) -> Points {
        self.facts.cost
    }

    pub fn level(&self) -> Level {
        self.facts.level
    }

    pub fn entered(&self) -> bool {
        self.facts.entered
    }

    pub fn facts(&self) -> &RawCandidateFacts {
        &self.facts
    }

    pub fn record(&self) -> EntryRecord {
        EntryRecord::new(self.facts.title.clone(), self.facts.link.clone())
    }

    pub fn is_owned(&self, resolver: &dyn FactResolver) -> Result<bool> {
        self.flag(&self.owned, Fact::Owned, resolver)
    }

    pub fn is_wishlisted(&self, resolver: &dyn FactResolver) -> Result<bool> {
        self.flag(&self.wishlisted, Fact::Wishlisted, resolver)
    }

    pub fn is_dlc(&self, resolver: &dyn FactResolver) -> Result<bool> {
        self.flag(&self.dlc, Fact::Dlc, resolver)
    }

    pub fn has_cards(&self, resolver: &dyn FactResolver) -> Result<bool> {
        self.flag(&self.cards, Fact::TradingCards, resolver)
    }

    pub fn trust(&self, resolver: &dyn FactResolver) -> Result<TrustScore> {
        self.trust
            .get_or_resolve(Fact::Trust.name(), || {
                match self.resolve(Fact::Trust, resolver)? {
                    FactValue::Score(score) => Ok(score),
                    _ => Err(mismatch(Fact::Trust)),
                }
            })
            .copied()
    }

    pub fn platforms(&self, resolver: &dyn FactResolver) -> Result<&PlatformSet> {
        self.platforms.get_or_resolve(Fact::Platforms.name(), || {
            match self.resolve(Fact::Platforms, resolver)? {
                FactValue::Platforms(set) => Ok(set),
                _ => Err(mismatch(Fact::Platforms)),
            }
        })
    }

    fn flag(&self, cell: &LazyFact<bool>, fact: Fact, resolver: &dyn FactResolver) -> Result<bool> {
        cell.get_or_resolve(fact.name(), || match self.resolve(fact, resolver)? {
            FactValue::Flag(flag) => Ok(flag),
            _ => Err(mismatch(fact)),
        })
        .copied()
    }

    fn resolve(&self, fact: Fact, resolver: &dyn FactResolver) -> Result<FactValue> {
        debug!("Resolving '{}' for giveaway {}", fact, self.facts.id);
        resolver.resolve_fact(&self.facts, fact)
    }
}

impl From<RawCandidateFacts> for Candidate {
    fn from(facts: RawCandidateFacts) -> Self {
        Candidate::new(facts)
    }
}

fn mismatch(fact: Fact) -> HarvestError {
    HarvestError::FactMismatch {
        fact: fact.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Platform, PreloadedFacts};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Resolver that answers from a table and records every call
    #[derive(Default)]
    struct CountingResolver {
        answers: HashMap<Fact, FactValue>,
        calls: RefCell<Vec<Fact>>,
    }

    impl CountingResolver {
        fn answering(answers: &[(Fact, FactValue)]) -> Self {
            Self {
                answers: answers.iter().cloned().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl FactResolver for CountingResolver {
        fn resolve_fact(&self, _candidate: &RawCandidateFacts, fact: Fact) -> Result<FactValue> {
            self.calls.borrow_mut().push(fact);
            self.answers
                .get(&fact)
                .cloned()
                .ok_or_else(|| HarvestError::fetch(fact.name(), "no answer"))
        }
    }

    fn facts() -> RawCandidateFacts {
        RawCandidateFacts::new("gA1", "Portal 2", "https://example.com/gA1", 20)
    }

    #[test]
    fn test_eager_facts() {
        let candidate = Candidate::new(facts().with_level(3).with_entered(true));
        assert_eq!(candidate.id(), "gA1");
        assert_eq!(candidate.cost(), 20);
        assert_eq!(candidate.level(), 3);
        assert!(candidate.entered());
        assert_eq!(
            candidate.record(),
            EntryRecord::new("Portal 2", "https://example.com/gA1")
        );
    }

    #[test]
    fn test_two_reads_one_resolution() {
        let resolver = CountingResolver::answering(&[(Fact::Owned, FactValue::Flag(true))]);
        let candidate = Candidate::new(facts());

        assert!(candidate.is_owned(&resolver).unwrap());
        assert!(candidate.is_owned(&resolver).unwrap());
        assert_eq!(*resolver.calls.borrow(), vec![Fact::Owned]);
    }

    #[test]
    fn test_facts_resolve_independently() {
        let resolver = CountingResolver::answering(&[
            (Fact::Dlc, FactValue::Flag(false)),
            (Fact::Trust, FactValue::Score(-2)),
            (
                Fact::Platforms,
                FactValue::Platforms([Platform::Windows, Platform::Mac].into_iter().collect()),
            ),
        ]);
        let candidate = Candidate::new(facts());

        assert!(!candidate.is_dlc(&resolver).unwrap());
        assert_eq!(candidate.trust(&resolver).unwrap(), -2);
        assert!(candidate.platforms(&resolver).unwrap().contains(&Platform::Mac));
        assert_eq!(candidate.trust(&resolver).unwrap(), -2);
        assert_eq!(resolver.calls.borrow().len(), 3);
    }

    #[test]
    fn test_preloaded_fact_skips_resolver() {
        let resolver = CountingResolver::default();
        let candidate = Candidate::new(facts().with_preloaded(PreloadedFacts {
            trust: Some(100),
            ..Default::default()
        }));

        assert_eq!(candidate.trust(&resolver).unwrap(), 100);
        assert!(resolver.calls.borrow().is_empty());
    }

    #[test]
    fn test_resolution_error_propagates() {
        let resolver = CountingResolver::default();
        let candidate = Candidate::new(facts());

        let err = candidate.has_cards(&resolver).unwrap_err();
        assert!(matches!(err, HarvestError::Fetch { .. }));
    }

    #[test]
    fn test_wrong_value_shape_is_mismatch() {
        let resolver = CountingResolver::answering(&[(Fact::Wishlisted, FactValue::Score(1))]);
        let candidate = Candidate::new(facts());

        let err = candidate.is_wishlisted(&resolver).unwrap_err();
        assert!(matches!(err, HarvestError::FactMismatch { .. }));
    }
}
