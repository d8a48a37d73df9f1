//! # Harvest Orchestrator
//!
//! Drives harvesting cycles:
//! 1. Spawn a fresh worker for every enabled site
//! 2. During the cycle's sleep interval, drain every worker channel once per
//!    poll interval and log a summary line per result
//! 3. At the end of the interval terminate workers that never reported,
//!    logging each as an error
//! 4. Start the next cycle
//!
//! Workers share nothing; a worker fault only ever reaches the orchestrator
//! as an `error` result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use model::{AppConfig, WorkResult};
use pipeline::FilterRegistry;
use sources::SiteContext;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::launcher::{WorkerHandle, WorkerLauncher};
use crate::worker::build_pipeline;

/// Results gathered in one cycle, in arrival order
pub type CycleReport = Vec<(String, WorkResult)>;

/// How long a collection pass lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    /// The whole cycle interval, even once every worker has reported
    IntervalEnd,
    /// Every worker reported, or the interval ended
    AllReported,
}

pub struct HarvestOrchestrator<L: WorkerLauncher> {
    config: Arc<AppConfig>,
    launcher: L,
    cycle_sleep: Duration,
    poll_interval: Duration,
}

impl<L: WorkerLauncher> HarvestOrchestrator<L> {
    /// Create an orchestrator after checking every enabled site's filter
    /// chain, so a bad chain fails at startup rather than in every cycle
    pub fn new(config: Arc<AppConfig>, launcher: L) -> Result<Self> {
        validate_chains(&config)?;
        Ok(Self {
            cycle_sleep: config.cycle_sleep(),
            poll_interval: config.poll_interval(),
            config,
            launcher,
        })
    }

    /// Override the configured intervals
    pub fn with_timing(mut self, cycle_sleep: Duration, poll_interval: Duration) -> Self {
        self.cycle_sleep = cycle_sleep;
        self.poll_interval = poll_interval;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run cycles until `shutdown` resolves. Live workers are terminated.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Interrupted, terminating live workers");
                    return Ok(());
                }
                _ = self.run_cycle(cycle) => {}
            }
        }
    }

    /// One full cycle over all enabled sites
    pub async fn run_cycle(&self, cycle: u64) -> CycleReport {
        let sites: Vec<String> = self.config.enabled_sites().map(|s| s.name.clone()).collect();
        info!("Cycle {} started for {} site(s)", cycle, sites.len());
        let handles = self.spawn(&sites);
        self.collect(handles, Until::IntervalEnd).await
    }

    /// A single cycle that ends as soon as every worker reported.
    ///
    /// With `only`, just that site runs, enabled or not.
    pub async fn run_once(&self, only: Option<&str>) -> Result<CycleReport> {
        let sites: Vec<String> = match only {
            Some(name) => vec![self.config.site(name)?.name.clone()],
            None => self.config.enabled_sites().map(|s| s.name.clone()).collect(),
        };
        let handles = self.spawn(&sites);
        Ok(self.collect(handles, Until::AllReported).await)
    }

    fn spawn(&self, sites: &[String]) -> Vec<WorkerHandle> {
        sites
            .iter()
            .map(|site| {
                info!("{}: starting worker", site);
                self.launcher.launch(site)
            })
            .collect()
    }

    async fn collect(&self, mut pending: Vec<WorkerHandle>, until: Until) -> CycleReport {
        let deadline = Instant::now() + self.cycle_sleep;
        let mut report = CycleReport::new();

        loop {
            drain(&mut pending, &mut report);
            if until == Until::AllReported && pending.is_empty() {
                break;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }

        drain(&mut pending, &mut report);
        for handle in pending {
            handle.terminate();
            let result = WorkResult::error("worker did not report before the cycle ended");
            log_summary(&handle.site, &result);
            report.push((handle.site.clone(), result));
        }
        report
    }
}

/// Take every available result off the pending handles
fn drain(pending: &mut Vec<WorkerHandle>, report: &mut CycleReport) {
    pending.retain_mut(|handle| {
        let result = match handle.result.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Closed) => {
                WorkResult::error("worker exited without reporting a result")
            }
        };
        log_summary(&handle.site, &result);
        report.push((handle.site.clone(), result));
        false
    });
}

/// Human readable summary of one result
pub fn summarize(site: &str, result: &WorkResult) -> Vec<String> {
    match result {
        WorkResult::Ok { entered, claimed, .. } if claimed.is_empty() => vec![format!(
            "{}: takes part in {} giveaways, and you don't win anything. For now...",
            site,
            entered.len()
        )],
        WorkResult::Ok { entered, claimed, .. } => {
            let mut lines = vec![format!(
                "{}: takes part in {} giveaways, and YOU WIN something!",
                site,
                entered.len()
            )];
            lines.extend(
                claimed
                    .iter()
                    .map(|won| format!("{}:   {} ({})", site, won.title, won.link)),
            );
            lines
        }
        WorkResult::Error { message, .. } => {
            vec![format!("{}: Harvester end work with error: {}", site, message)]
        }
    }
}

fn log_summary(site: &str, result: &WorkResult) {
    for line in summarize(site, result) {
        if result.is_ok() {
            info!("{}", line);
        } else {
            error!("{}", line);
        }
    }
}

/// Build every enabled site's filter pipeline once
pub fn validate_chains(config: &AppConfig) -> Result<()> {
    let registry = FilterRegistry::with_defaults();
    for site in config.enabled_sites() {
        let ctx = SiteContext::from_config(config, &site.name)?;
        let (chain, _) = build_pipeline(&ctx, &registry)
            .with_context(|| format!("Invalid filter chain for site '{}'", site.name))?;
        if chain.specs().is_empty() {
            warn!("{}: empty filter chain, every giveaway is a candidate", site.name);
        }
    }
    Ok(())
}
