//! # Utilities Module
//!
//! ## Sub-modules
//! - `workspace`: Pre-allocated Viterbi buffers reused across chromosomes

pub mod workspace;
