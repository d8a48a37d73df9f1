//! # Sources Crate
//!
//! Where giveaway candidates come from and how their facts are looked up.
//!
//! ## Components
//!
//! ### Adapter capabilities
//! `SessionHolder`, `CandidateSource`, `FactResolver`, `EntryAttempter` and
//! `ClaimSource`. A site implements the ones it supports; anything that
//! implements all five is a [`Site`] the worker can harvest.
//!
//! ### Candidate
//! A giveaway under evaluation. Eager facts (id, title, link, cost, level,
//! entered) come with the listing; ownership, wishlist, DLC, trading cards,
//! author trust and platforms are resolved lazily, at most once each.
//!
//! ### SiteContext
//! Per-worker settings, built once and passed explicitly.
//!
//! ### SnapshotSite
//! File-backed adapter serving a site from a JSON snapshot.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{Candidate, SiteContext, SnapshotSite, CandidateSource};
//!
//! let ctx = SiteContext::from_config(&config, "SteamGifts")?;
//! let site = SnapshotSite::open(&ctx)?;
//!
//! for raw in site.fetch_page(1)? {
//!     let candidate = Candidate::new(raw);
//!     if !candidate.is_owned(&site)? {
//!         println!("{} costs {}", candidate.title(), candidate.cost());
//!     }
//! }
//! ```

// Public modules
pub mod adapter;
pub mod candidate;
pub mod context;
pub mod lazy;
pub mod snapshot;

// Re-export commonly used types
pub use adapter::{
    CandidateSource, ClaimSource, EntryAttempter, FactResolver, SessionHolder, Site,
    page_has_marker,
};
pub use candidate::Candidate;
pub use context::SiteContext;
pub use lazy::LazyFact;
pub use snapshot::{Snapshot, SnapshotFacts, SnapshotGiveaway, SnapshotSite};
