//! Snapshot Site - file-backed site adapter
//!
//! Serves a giveaway site out of a JSON document instead of live HTTP. The
//! document holds what a scraper would have extracted: the account page,
//! balance and level, listing pages, the per-giveaway lazy facts, the won
//! listing, and which giveaways the site rejects on entry.
//!
//! ## Document shape
//! ```json
//! {
//!   "account_page": "<div class=\"nav__avatar-inner-wrap\">",
//!   "points": 30,
//!   "level": 1,
//!   "pages": [[{"id": "a", "title": "A", "link": "https://...", "cost": 11,
//!               "facts": {"owned": false, "platforms": ["win"]}}]],
//!   "won": [{"title": "B", "link": "https://...", "acknowledged": false}],
//!   "reject": ["a"]
//! }
//! ```
//!
//! Lazy facts stay hidden behind [`FactResolver`]; the engine only sees
//! them when a filter asks.

use model::{
    EntryOutcome, Fact, FactValue, GiveawayId, HarvestError, Level, PlatformSet, Points,
    RawCandidateFacts, RawClaimFacts, Result, TrustScore,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::adapter::{
    CandidateSource, ClaimSource, EntryAttempter, FactResolver, SessionHolder, page_has_marker,
};
use crate::context::SiteContext;

/// On-disk snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub account_page: String,
    #[serde(default)]
    pub points: Points,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub pages: Vec<Vec<SnapshotGiveaway>>,
    #[serde(default)]
    pub won: Vec<RawClaimFacts>,
    /// Giveaway ids whose entry attempt the site refuses
    #[serde(default)]
    pub reject: Vec<GiveawayId>,
}

/// A listing row plus the facts a scraper would fetch on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotGiveaway {
    #[serde(flatten)]
    pub listing: RawCandidateFacts,
    #[serde(default)]
    pub facts: SnapshotFacts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFacts {
    pub owned: Option<bool>,
    pub wishlisted: Option<bool>,
    pub dlc: Option<bool>,
    pub cards: Option<bool>,
    pub trust: Option<TrustScore>,
    pub platforms: Option<PlatformSet>,
}

impl SnapshotFacts {
    fn value(&self, fact: Fact) -> Option<FactValue> {
        match fact {
            Fact::Owned => self.owned.map(FactValue::Flag),
            Fact::Wishlisted => self.wishlisted.map(FactValue::Flag),
            Fact::Dlc => self.dlc.map(FactValue::Flag),
            Fact::TradingCards => self.cards.map(FactValue::Flag),
            Fact::Trust => self.trust.map(FactValue::Score),
            Fact::Platforms => self.platforms.clone().map(FactValue::Platforms),
        }
    }
}

impl Snapshot {
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| HarvestError::Parse {
            file: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarvestError::fetch(format!("snapshot {}", path.display()), e.to_string())
        })?;
        Self::from_json(&content, &path.display().to_string())
    }
}

/// Site adapter over a [`Snapshot`]
pub struct SnapshotSite {
    name: String,
    session_marker: String,
    snapshot: Snapshot,
    facts: HashMap<GiveawayId, SnapshotFacts>,
    rejected: HashSet<GiveawayId>,
    entered: RefCell<HashSet<GiveawayId>>,
}

impl SnapshotSite {
    /// Open the snapshot configured for the context's site
    pub fn open(ctx: &SiteContext) -> Result<Self> {
        let snapshot = Snapshot::load(&ctx.site().snapshot)?;
        Ok(Self::new(ctx.name(), &ctx.site().session_marker, snapshot))
    }

    pub fn new(
        name: impl Into<String>,
        session_marker: impl Into<String>,
        snapshot: Snapshot,
    ) -> Self {
        let facts = snapshot
            .pages
            .iter()
            .flatten()
            .map(|g| (g.listing.id.clone(), g.facts.clone()))
            .collect();
        let rejected = snapshot.reject.iter().cloned().collect();

        Self {
            name: name.into(),
            session_marker: session_marker.into(),
            snapshot,
            facts,
            rejected,
            entered: RefCell::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids entered through this adapter so far
    pub fn entered_ids(&self) -> Vec<GiveawayId> {
        let mut ids: Vec<_> = self.entered.borrow().iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl SessionHolder for SnapshotSite {
    fn check_session_valid(&self) -> Result<bool> {
        let valid = page_has_marker(&self.snapshot.account_page, &self.session_marker);
        if valid {
            debug!("{} login successful", self.name);
        }
        Ok(valid)
    }

    fn current_point_balance(&self) -> Result<Points> {
        Ok(self.snapshot.points)
    }

    fn current_level(&self) -> Result<Level> {
        Ok(self.snapshot.level)
    }
}

impl CandidateSource for SnapshotSite {
    #[instrument(skip(self), fields(site = %self.name))]
    fn fetch_page(&self, page: u32) -> Result<Vec<RawCandidateFacts>> {
        if page == 0 {
            return Err(HarvestError::fetch("page 0", "pages are numbered from 1"));
        }
        let listing: Vec<RawCandidateFacts> = self
            .snapshot
            .pages
            .get(page as usize - 1)
            .map(|rows| rows.iter().map(|g| g.listing.clone()).collect())
            .unwrap_or_default();

        debug!("Fetched {} giveaways", listing.len());
        Ok(listing)
    }
}

impl FactResolver for SnapshotSite {
    fn resolve_fact(&self, candidate: &RawCandidateFacts, fact: Fact) -> Result<FactValue> {
        self.facts
            .get(&candidate.id)
            .and_then(|facts| facts.value(fact))
            .ok_or_else(|| {
                HarvestError::fetch(
                    format!("{} of giveaway {}", fact, candidate.id),
                    "not present in snapshot",
                )
            })
    }
}

impl EntryAttempter for SnapshotSite {
    fn attempt_entry(&self, candidate: &RawCandidateFacts) -> EntryOutcome {
        if self.rejected.contains(&candidate.id) {
            return EntryOutcome::Rejected {
                reason: "site refused the entry".to_string(),
            };
        }
        if !self.entered.borrow_mut().insert(candidate.id.clone()) {
            return EntryOutcome::Rejected {
                reason: "already entered".to_string(),
            };
        }
        info!("{}: entry accepted for «{}»", self.name, candidate.title);
        EntryOutcome::Entered
    }
}

impl ClaimSource for SnapshotSite {
    fn fetch_claims_listing(&self) -> Result<Vec<RawClaimFacts>> {
        Ok(self.snapshot.won.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;
    use std::io::Write;

    const DOCUMENT: &str = r#"{
        "account_page": "<div class=\"nav__avatar-inner-wrap\"></div>",
        "points": 30,
        "level": 2,
        "pages": [
            [
                {"id": "a", "title": "A", "link": "https://s/a", "cost": 11,
                 "facts": {"owned": true, "platforms": ["win", "lin"]}},
                {"id": "b", "title": "B", "link": "https://s/b", "cost": 5, "level": 1}
            ]
        ],
        "won": [
            {"title": "Old prize", "link": "https://s/won/1", "acknowledged": true},
            {"title": "New prize", "link": "https://s/won/2"}
        ],
        "reject": ["b"]
    }"#;

    fn site() -> SnapshotSite {
        let snapshot = Snapshot::from_json(DOCUMENT, "test").unwrap();
        SnapshotSite::new("Test", "nav__avatar-inner-wrap", snapshot)
    }

    #[test]
    fn test_session_and_account() {
        let site = site();
        assert!(site.check_session_valid().unwrap());
        assert_eq!(site.current_point_balance().unwrap(), 30);
        assert_eq!(site.current_level().unwrap(), 2);
    }

    #[test]
    fn test_wrong_marker_is_invalid_session() {
        let snapshot = Snapshot::from_json(DOCUMENT, "test").unwrap();
        let site = SnapshotSite::new("Test", "account-email", snapshot);
        assert!(!site.check_session_valid().unwrap());
    }

    #[test]
    fn test_pages_are_one_based_and_end_empty() {
        let site = site();
        let first = site.fetch_page(1).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].level, 1);
        assert!(site.fetch_page(2).unwrap().is_empty());
        assert!(site.fetch_page(0).is_err());
    }

    #[test]
    fn test_listing_hides_lazy_facts() {
        let site = site();
        let first = site.fetch_page(1).unwrap();
        assert_eq!(first[0].preloaded.owned, None);

        assert_eq!(
            site.resolve_fact(&first[0], Fact::Owned).unwrap(),
            FactValue::Flag(true)
        );
        match site.resolve_fact(&first[0], Fact::Platforms).unwrap() {
            FactValue::Platforms(set) => assert!(set.contains(&Platform::Linux)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(site.resolve_fact(&first[0], Fact::Dlc).is_err());
        assert!(site.resolve_fact(&first[1], Fact::Owned).is_err());
    }

    #[test]
    fn test_entry_outcomes() {
        let site = site();
        let first = site.fetch_page(1).unwrap();

        assert_eq!(site.attempt_entry(&first[0]), EntryOutcome::Entered);
        assert!(matches!(
            site.attempt_entry(&first[0]),
            EntryOutcome::Rejected { .. }
        ));
        assert!(matches!(
            site.attempt_entry(&first[1]),
            EntryOutcome::Rejected { .. }
        ));
        assert_eq!(site.entered_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_claims_listing() {
        let claims = site().fetch_claims_listing().unwrap();
        assert_eq!(claims.len(), 2);
        assert!(!claims[1].acknowledged);
    }

    #[test]
    fn test_open_from_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        fs::File::create(&path)
            .unwrap()
            .write_all(DOCUMENT.as_bytes())
            .unwrap();

        let yaml = format!("sites:\n  - name: demo\n    snapshot: {}\n", path.display());
        let config = model::AppConfig::from_yaml(&yaml).unwrap();
        let ctx = SiteContext::from_config(&config, "demo").unwrap();

        let site = SnapshotSite::open(&ctx).unwrap();
        assert_eq!(site.name(), "demo");
        assert!(site.check_session_valid().unwrap());
    }

    #[test]
    fn test_open_missing_snapshot_is_fetch_error() {
        let config =
            model::AppConfig::from_yaml("sites:\n  - {name: demo, snapshot: /no/such.json}\n")
                .unwrap();
        let ctx = SiteContext::from_config(&config, "demo").unwrap();
        assert!(matches!(
            SnapshotSite::open(&ctx),
            Err(HarvestError::Fetch { .. })
        ));
    }
}
