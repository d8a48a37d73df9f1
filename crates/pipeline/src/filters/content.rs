//! Filters on what a giveaway's game is.

use crate::chain::FilterSpec;
use crate::filters::retain;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::Result;
use sources::Candidate;

/// Removes DLC giveaways (`dlc`).
pub struct DlcFilter;

impl Filter for DlcFilter {
    fn name(&self) -> &str {
        "dlc"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        retain(candidates, |c| Ok(!c.is_dlc(context.resolver)?))
    }
}

impl ConfiguredFilter for DlcFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}

/// Keeps games that drop trading cards (`cards`).
pub struct TradingCardsFilter;

impl Filter for TradingCardsFilter {
    fn name(&self) -> &str {
        "cards"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        retain(candidates, |c| c.has_cards(context.resolver))
    }
}

impl ConfiguredFilter for TradingCardsFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}
