//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use model::{Level, Result};
use sources::{Candidate, FactResolver};

use crate::chain::FilterSpec;

/// What a filter may look at besides the candidates themselves.
///
/// The point budget is deliberately absent: affordability is the selection
/// engine's business, not a filter's.
pub struct FilterContext<'a> {
    /// The user's contributor level on the site
    pub level: Level,
    /// Where lazy candidate facts get resolved
    pub resolver: &'a dyn FactResolver,
}

impl<'a> FilterContext<'a> {
    pub fn new(level: Level, resolver: &'a dyn FactResolver) -> Self {
        Self { level, resolver }
    }
}

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Relative order of the kept candidates must not change
/// - An error means a fact could not be resolved; the cycle is over
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - User level and fact resolver
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates
    /// * `Err` - If a lazy fact could not be resolved
    fn apply(&self, candidates: Vec<Candidate>, context: &FilterContext<'_>)
    -> Result<Vec<Candidate>>;
}

/// A filter that can be built from a configured chain token.
pub trait ConfiguredFilter: Filter + Sized {
    fn from_spec(spec: &FilterSpec) -> Result<Self>;
}
