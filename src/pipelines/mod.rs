//! # Pipeline Module
//!
//! High-level orchestration of per-sample haplotype inference and the
//! sample-level reports built from it.

pub mod inference;
pub mod summary;

pub use inference::InferencePipeline;
pub use summary::SampleReport;
