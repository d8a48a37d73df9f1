//! Budget-constrained greedy selection ("sow").
//!
//! ## Algorithm
//! Walks listing pages from page 1 as a small state machine:
//!
//! ```text
//! Fetching -> Filtering -> Entering -> (Fetching | Halted)
//! ```
//!
//! 1. Fetch a page. An empty page halts with [`HaltReason::Exhausted`].
//! 2. Run the filter pipeline over the page.
//! 3. Walk the survivors in order. A candidate the remaining budget covers
//!    gets an entry attempt; success deducts its cost, rejection is logged
//!    and skipped. The first candidate the budget does not cover halts the
//!    cycle with [`HaltReason::BudgetExhausted`] (or is skipped under
//!    [`UnaffordablePolicy::Skip`]).
//! 4. Otherwise move on to the next page.
//!
//! The budget is read once by the caller and only ever decreases.

use std::fmt;

use model::{EntryOutcome, EntryRecord, Level, Points, Result, UnaffordablePolicy};
use sources::{Candidate, CandidateSource, EntryAttempter, FactResolver};
use tracing::{debug, info, instrument, warn};

use crate::filter_pipeline::FilterPipeline;
use crate::traits::FilterContext;

/// Why a sow pass stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The source ran out of pages
    Exhausted,
    /// A candidate cost more than what was left
    BudgetExhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Exhausted => f.write_str("exhausted"),
            HaltReason::BudgetExhausted => f.write_str("budget exhausted"),
        }
    }
}

/// Mutable state of one pass
#[derive(Debug)]
pub struct HarvestState {
    pub remaining_budget: Points,
    pub page: u32,
    pub entered: Vec<EntryRecord>,
}

impl HarvestState {
    pub fn new(budget: Points) -> Self {
        Self {
            remaining_budget: budget,
            page: 1,
            entered: Vec::new(),
        }
    }
}

enum SowState {
    Fetching,
    Filtering(Vec<Candidate>),
    Entering(Vec<Candidate>),
    Halted(HaltReason),
}

/// Result of one sow pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SowOutcome {
    pub entered: Vec<EntryRecord>,
    pub initial_budget: Points,
    pub remaining_budget: Points,
    pub pages_fetched: u32,
    pub halt: HaltReason,
}

impl SowOutcome {
    /// Points spent on successful entries
    pub fn spent(&self) -> Points {
        self.initial_budget - self.remaining_budget
    }
}

pub struct SelectionEngine<'p> {
    pipeline: &'p FilterPipeline,
    policy: UnaffordablePolicy,
}

impl<'p> SelectionEngine<'p> {
    pub fn new(pipeline: &'p FilterPipeline) -> Self {
        Self {
            pipeline,
            policy: UnaffordablePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnaffordablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one pass against `site` with the given budget and user level.
    ///
    /// # Returns
    /// * `Ok(SowOutcome)` - Entered giveaways and how the pass ended
    /// * `Err` - A page or a lazy fact could not be fetched
    #[instrument(skip(self, site), fields(policy = ?self.policy))]
    pub fn sow<S>(&self, site: &S, budget: Points, level: Level) -> Result<SowOutcome>
    where
        S: CandidateSource + FactResolver + EntryAttempter,
    {
        let context = FilterContext::new(level, site);
        let mut state = HarvestState::new(budget);
        let mut pages_fetched = 0;
        let mut step = SowState::Fetching;

        let halt = loop {
            step = match step {
                SowState::Fetching => {
                    let page = site.fetch_page(state.page)?;
                    pages_fetched += 1;
                    debug!("Page {} has {} giveaways", state.page, page.len());
                    if page.is_empty() {
                        SowState::Halted(HaltReason::Exhausted)
                    } else {
                        SowState::Filtering(page.into_iter().map(Candidate::new).collect())
                    }
                }
                SowState::Filtering(candidates) => {
                    SowState::Entering(self.pipeline.apply(candidates, &context)?)
                }
                SowState::Entering(candidates) => match self.enter(site, candidates, &mut state) {
                    Some(reason) => SowState::Halted(reason),
                    None => {
                        state.page += 1;
                        SowState::Fetching
                    }
                },
                SowState::Halted(reason) => break reason,
            };
        };

        info!(
            "Sow halted ({}): {} entered, {} of {} points left",
            halt,
            state.entered.len(),
            state.remaining_budget,
            budget
        );

        Ok(SowOutcome {
            entered: state.entered,
            initial_budget: budget,
            remaining_budget: state.remaining_budget,
            pages_fetched,
            halt,
        })
    }

    /// Attempt entries for one filtered page. Returns a halt reason when
    /// the pass must stop here.
    fn enter<S: EntryAttempter>(
        &self,
        site: &S,
        candidates: Vec<Candidate>,
        state: &mut HarvestState,
    ) -> Option<HaltReason> {
        for candidate in candidates {
            if candidate.cost() > state.remaining_budget {
                match self.policy {
                    UnaffordablePolicy::Halt => {
                        info!(
                            "Not enough points for «{}»: costs {}, {} left",
                            candidate.title(),
                            candidate.cost(),
                            state.remaining_budget
                        );
                        return Some(HaltReason::BudgetExhausted);
                    }
                    UnaffordablePolicy::Skip => {
                        debug!(
                            "Skipping «{}»: costs {}, {} left",
                            candidate.title(),
                            candidate.cost(),
                            state.remaining_budget
                        );
                        continue;
                    }
                }
            }

            match site.attempt_entry(candidate.facts()) {
                EntryOutcome::Entered => {
                    state.remaining_budget -= candidate.cost();
                    info!("Take part in «{}» giveaway", candidate.title());
                    state.entered.push(candidate.record());
                }
                EntryOutcome::Rejected { reason } => {
                    warn!("Entry for «{}» rejected: {}", candidate.title(), reason);
                }
            }
        }
        None
    }
}
