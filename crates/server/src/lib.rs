//! Server crate for the giveaway harvester.
//!
//! This crate contains the per-site [`Worker`], the launchers that run
//! workers in child processes or in-process, and the
//! [`HarvestOrchestrator`] that drives harvesting cycles.

pub mod launcher;
pub mod orchestrator;
pub mod worker;

pub use launcher::{InProcessLauncher, ProcessLauncher, WorkerHandle, WorkerLauncher};
pub use orchestrator::{CycleReport, HarvestOrchestrator, summarize, validate_chains};
pub use worker::{Harvest, Worker, build_pipeline, run_site_worker};
