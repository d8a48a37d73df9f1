//! Filters on a giveaway's point cost.
//!
//! These only bound which giveaways are considered at all. Whether the
//! current balance covers a cost is decided by the selection engine.
//!
//! Bounds are signed: `max_points=-1` keeps nothing, `min_points=-1` keeps
//! everything.

use crate::chain::FilterSpec;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::{Points, Result};
use sources::Candidate;

fn signed(cost: Points) -> i64 {
    i64::try_from(cost).unwrap_or(i64::MAX)
}

/// Keeps giveaways costing at most `max` points (`max_points=N`).
pub struct MaxCostFilter {
    max: i64,
    label: String,
}

impl MaxCostFilter {
    pub fn new(max: i64) -> Self {
        Self {
            max,
            label: format!("max_points={}", max),
        }
    }
}

impl Filter for MaxCostFilter {
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
            .filter(|c| signed(c.cost()) <= self.max)
            .collect())
    }
}

impl ConfiguredFilter for MaxCostFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        Ok(Self::new(spec.numeric_arg()?))
    }
}

/// Keeps giveaways costing at least `min` points (`min_points=N`).
pub struct MinCostFilter {
    min: i64,
    label: String,
}

impl MinCostFilter {
    pub fn new(min: i64) -> Self {
        Self {
            min,
            label: format!("min_points={}", min),
        }
    }
}

impl Filter for MinCostFilter {
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
            .filter(|c| signed(c.cost()) >= self.min)
            .collect())
    }
}

impl ConfiguredFilter for MinCostFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        Ok(Self::new(spec.numeric_arg()?))
    }
}
