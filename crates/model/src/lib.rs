//! # Model Crate
//!
//! Shared vocabulary of the giveaway harvester.
//!
//! ## Main Components
//!
//! - **types**: giveaway facts, lazily resolved facts, entry records and the
//!   per-cycle `WorkResult`
//! - **config**: the immutable YAML configuration
//! - **error**: `HarvestError` and the crate-wide `Result` alias
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{AppConfig, WorkResult};
//!
//! let config = AppConfig::load("harvester.yml")?;
//! for site in config.enabled_sites() {
//!     println!("{} -> {:?}", site.name, site.filters);
//! }
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{AppConfig, DEFAULT_CONFIG_FILE, SiteConfig, UnaffordablePolicy};
pub use error::{HarvestError, Result};
pub use types::{
    // Type aliases
    GiveawayId,
    Level,
    PlatformSet,
    Points,
    TrustScore,
    // Core types
    EntryOutcome,
    EntryRecord,
    Fact,
    FactValue,
    Platform,
    PreloadedFacts,
    RawCandidateFacts,
    RawClaimFacts,
    WorkResult,
};
