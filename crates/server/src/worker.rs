//! # Site Worker
//!
//! One harvesting pass for one site:
//! 1. Validate the session (invalid → fatal, no retry)
//! 2. Read level and point balance once
//! 3. Build the filter pipeline from the site's chain
//! 4. Sow: enter affordable giveaways, page by page
//! 5. Reap: collect won but unacknowledged giveaways
//!
//! Every fatal condition ends as an `error` [`WorkResult`]; a worker never
//! panics its way out and always produces exactly one result.

use model::{AppConfig, EntryRecord, HarvestError, Result, WorkResult};
use pipeline::{FilterChain, FilterPipeline, FilterRegistry, SelectionEngine, SowOutcome, reap};
use sources::{Site, SiteContext, SnapshotSite};
use tracing::{error, info, instrument, warn};

/// Everything one successful pass produced
#[derive(Debug, Clone)]
pub struct Harvest {
    pub sow: SowOutcome,
    pub claimed: Vec<EntryRecord>,
}

impl From<Harvest> for WorkResult {
    fn from(harvest: Harvest) -> Self {
        WorkResult::ok(harvest.sow.entered, harvest.claimed)
    }
}

/// Effective chain and client-side pipeline for a site
pub fn build_pipeline(
    ctx: &SiteContext,
    registry: &FilterRegistry,
) -> Result<(FilterChain, FilterPipeline)> {
    let chain = FilterChain::for_site(ctx.site())?;
    let pipeline = FilterPipeline::from_chain(&chain, registry, ctx.lenient_filters())?;
    Ok((chain, pipeline))
}

pub struct Worker<S: Site> {
    ctx: SiteContext,
    site: S,
    registry: FilterRegistry,
}

impl<S: Site> Worker<S> {
    pub fn new(ctx: SiteContext, site: S) -> Self {
        Self {
            ctx,
            site,
            registry: FilterRegistry::with_defaults(),
        }
    }

    pub fn with_registry(mut self, registry: FilterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    /// Run the pass and fold any failure into the result
    pub fn run(&self) -> WorkResult {
        match self.harvest() {
            Ok(harvest) => harvest.into(),
            Err(e) => {
                error!("{}: Harvester end work with error: {}", self.ctx.name(), e);
                WorkResult::error(e.to_string())
            }
        }
    }

    #[instrument(skip(self), fields(site = %self.ctx.name()))]
    pub fn harvest(&self) -> Result<Harvest> {
        if !self.site.check_session_valid()? {
            return Err(HarvestError::Session {
                site: self.ctx.name().to_string(),
            });
        }

        let level = self.site.current_level()?;
        let balance = self.site.current_point_balance()?;
        info!("Logged in: level {}, {} points", level, balance);

        let (chain, pipeline) = build_pipeline(&self.ctx, &self.registry)?;
        info!("Filter chain: {}", chain);

        let sow = SelectionEngine::new(&pipeline)
            .with_policy(self.ctx.on_unaffordable())
            .sow(&self.site, balance, level)?;

        let claimed = reap(&self.site).unwrap_or_else(|e| {
            warn!("Won listing unavailable, reporting no claims: {}", e);
            Vec::new()
        });

        Ok(Harvest { sow, claimed })
    }
}

/// Run one pass for `site_name` against its configured snapshot
pub fn run_site_worker(config: &AppConfig, site_name: &str) -> WorkResult {
    let opened = SiteContext::from_config(config, site_name)
        .and_then(|ctx| SnapshotSite::open(&ctx).map(|site| (ctx, site)));

    match opened {
        Ok((ctx, site)) => Worker::new(ctx, site).run(),
        Err(e) => {
            error!("{}: Harvester end work with error: {}", site_name, e);
            WorkResult::error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        EntryOutcome, Fact, FactValue, Level, Points, RawCandidateFacts, RawClaimFacts,
        SiteConfig, UnaffordablePolicy,
    };
    use sources::{CandidateSource, ClaimSource, EntryAttempter, FactResolver, SessionHolder};

    struct FakeSite {
        logged_in: bool,
        points: Points,
        page: Vec<RawCandidateFacts>,
        won: Option<Vec<RawClaimFacts>>,
    }

    impl FakeSite {
        fn new() -> Self {
            Self {
                logged_in: true,
                points: 30,
                page: vec![
                    RawCandidateFacts::new("a", "A", "https://s/a", 11),
                    RawCandidateFacts::new("b", "B", "https://s/b", 5),
                ],
                won: Some(vec![RawClaimFacts {
                    title: "Prize".to_string(),
                    link: "https://s/won".to_string(),
                    acknowledged: false,
                }]),
            }
        }
    }

    impl SessionHolder for FakeSite {
        fn check_session_valid(&self) -> Result<bool> {
            Ok(self.logged_in)
        }
        fn current_point_balance(&self) -> Result<Points> {
            Ok(self.points)
        }
        fn current_level(&self) -> Result<Level> {
            Ok(0)
        }
    }

    impl CandidateSource for FakeSite {
        fn fetch_page(&self, page: u32) -> Result<Vec<RawCandidateFacts>> {
            Ok(if page == 1 { self.page.clone() } else { Vec::new() })
        }
    }

    impl FactResolver for FakeSite {
        fn resolve_fact(&self, _candidate: &RawCandidateFacts, _fact: Fact) -> Result<FactValue> {
            Ok(FactValue::Flag(false))
        }
    }

    impl EntryAttempter for FakeSite {
        fn attempt_entry(&self, _candidate: &RawCandidateFacts) -> EntryOutcome {
            EntryOutcome::Entered
        }
    }

    impl ClaimSource for FakeSite {
        fn fetch_claims_listing(&self) -> Result<Vec<RawClaimFacts>> {
            self.won
                .clone()
                .ok_or_else(|| HarvestError::fetch("won listing", "timed out"))
        }
    }

    fn ctx() -> SiteContext {
        SiteContext::new(SiteConfig::new("Fake", "fake.json"))
    }

    #[test]
    fn test_worker_reports_entries_and_claims() {
        let result = Worker::new(ctx(), FakeSite::new()).run();
        match result {
            WorkResult::Ok { entered, claimed, .. } => {
                assert_eq!(entered.len(), 2);
                assert_eq!(claimed, vec![EntryRecord::new("Prize", "https://s/won")]);
            }
            other => panic!("expected ok, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_session_is_error_result() {
        let mut site = FakeSite::new();
        site.logged_in = false;

        let worker = Worker::new(ctx(), site);
        assert!(matches!(worker.harvest(), Err(HarvestError::Session { .. })));
        assert!(!worker.run().is_ok());
    }

    #[test]
    fn test_reap_failure_keeps_sow_result() {
        let mut site = FakeSite::new();
        site.won = None;

        let harvest = Worker::new(ctx(), site).harvest().unwrap();
        assert_eq!(harvest.sow.entered.len(), 2);
        assert!(harvest.claimed.is_empty());
    }

    #[test]
    fn test_unaffordable_policy_from_context() {
        let mut site = FakeSite::new();
        site.points = 6;

        let halting = Worker::new(ctx(), FakeSite { points: 6, ..FakeSite::new() })
            .harvest()
            .unwrap();
        assert!(halting.sow.entered.is_empty());

        let skipping = Worker::new(ctx().with_unaffordable_policy(UnaffordablePolicy::Skip), site)
            .harvest()
            .unwrap();
        assert_eq!(skipping.sow.entered, vec![EntryRecord::new("B", "https://s/b")]);
    }

    #[test]
    fn test_bad_chain_is_error_result() {
        let mut site_config = SiteConfig::new("Fake", "fake.json");
        site_config.filters = vec!["max_points=many".to_string()];

        let result = Worker::new(SiteContext::new(site_config), FakeSite::new()).run();
        assert!(matches!(result, WorkResult::Error { .. }));
    }

    #[test]
    fn test_run_site_worker_unknown_site() {
        let config = AppConfig::from_yaml("sites: []").unwrap();
        assert!(!run_site_worker(&config, "Nowhere").is_ok());
    }
}
