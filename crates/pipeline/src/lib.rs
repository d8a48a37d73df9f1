//! Filtering and selection of giveaway candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterChain assembly from configured tokens and a FilterRegistry to
//!   turn it into a FilterPipeline
//! - SelectionEngine, the budget-constrained entry pass ("sow")
//! - `reap`, the scan for won but unacknowledged giveaways
//!
//! ## Architecture
//! Each cycle processes candidates in stages:
//! 1. A page of candidates is fetched from the site
//! 2. Filters remove unwanted candidates (entered, owned, untrusted, ...)
//! 3. Affordable survivors get an entry attempt, in listing order
//! 4. The won listing is scanned for unacknowledged prizes
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterChain, FilterPipeline, FilterRegistry, SelectionEngine, reap};
//!
//! let chain = FilterChain::for_site(ctx.site())?;
//! let pipeline = FilterPipeline::from_chain(&chain, &FilterRegistry::with_defaults(), false)?;
//!
//! let outcome = SelectionEngine::new(&pipeline).sow(&site, balance, level)?;
//! let claimed = reap(&site)?;
//! ```

pub mod chain;
pub mod claims;
pub mod filter_pipeline;
pub mod filters;
pub mod registry;
pub mod selection;
pub mod traits;

// Re-export main types
pub use chain::{FilterChain, FilterSpec, Origin, parse_tokens};
pub use claims::reap;
pub use filter_pipeline::FilterPipeline;
pub use registry::FilterRegistry;
pub use selection::{HaltReason, HarvestState, SelectionEngine, SowOutcome};
pub use traits::{ConfiguredFilter, Filter, FilterContext};
