//! Name to filter lookup.
//!
//! Maps the filter names accepted in configuration to constructors. The
//! default registry knows every built-in filter; callers can register
//! more under new names.

use std::collections::HashMap;

use model::{HarvestError, Result};

use crate::chain::FilterSpec;
use crate::filters::*;
use crate::traits::{ConfiguredFilter, Filter};

type Builder = fn(&FilterSpec) -> Result<Box<dyn Filter>>;

fn build<F: ConfiguredFilter + 'static>(spec: &FilterSpec) -> Result<Box<dyn Filter>> {
    Ok(Box::new(F::from_spec(spec)?))
}

pub struct FilterRegistry {
    builders: HashMap<&'static str, Builder>,
}

impl FilterRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// A registry with all built-in filters
    pub fn with_defaults() -> Self {
        Self::new()
            .register("entered", build::<AlreadyEnteredFilter>)
            .register("level", build::<LevelFilter>)
            .register("min_level", build::<MinimumLevelFilter>)
            .register("max_points", build::<MaxCostFilter>)
            .register("min_points", build::<MinCostFilter>)
            .register("trust", build::<TrustFilter>)
            .register("library", build::<AlreadyOwnedFilter>)
            .register("wishlist", build::<WishlistFilter>)
            .register("dlc", build::<DlcFilter>)
            .register("cards", build::<TradingCardsFilter>)
            .register("os", build::<PlatformFilter>)
    }

    /// Register a constructor under `name` (builder pattern)
    pub fn register(mut self, name: &'static str, builder: Builder) -> Self {
        self.builders.insert(name, builder);
        self
    }

    /// Build the filter a spec names
    pub fn build(&self, spec: &FilterSpec) -> Result<Box<dyn Filter>> {
        let builder = self
            .builders
            .get(spec.name())
            .ok_or_else(|| HarvestError::UnknownFilter {
                name: spec.name().to_string(),
            })?;
        builder(spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builders.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
