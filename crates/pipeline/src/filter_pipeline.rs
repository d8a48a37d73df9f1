//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, or builds one
//! from a site's configured [`FilterChain`].

use crate::chain::FilterChain;
use crate::registry::FilterRegistry;
use crate::traits::{Filter, FilterContext};
use model::{HarvestError, Result};
use sources::Candidate;
use tracing::{self, warn};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyEnteredFilter)
///     .add_filter(LevelFilter)
///     .add_filter(MaxCostFilter::new(50));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add an already boxed filter (builder pattern).
    pub fn add_boxed(mut self, filter: Box<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Build the client-side part of a chain.
    ///
    /// Filters the site applies server-side are skipped. An unknown filter
    /// name fails the build unless `lenient` is set, in which case it is
    /// logged and left out. Malformed arguments always fail.
    pub fn from_chain(
        chain: &FilterChain,
        registry: &FilterRegistry,
        lenient: bool,
    ) -> Result<Self> {
        let mut pipeline = Self::new();
        for spec in chain.client_side() {
            match registry.build(spec) {
                Ok(filter) => pipeline = pipeline.add_boxed(filter),
                Err(HarvestError::UnknownFilter { name }) if lenient => {
                    warn!("Skipping unknown filter '{}'", name);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the filters, in application order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter
    /// * `context` - User level and fact resolver
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates after all filters
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
