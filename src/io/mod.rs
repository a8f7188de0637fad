//! # I/O Module
//!
//! File boundaries of the driver binary: JSON sample bundles in, JSON reports out.

pub mod json;
