//! # Data Module
//!
//! In-memory representations of array genotype data.
//!
//! ## Design Philosophy
//! - **Typed records:** SNPs, allele calls and strains are explicit structs,
//!   validated when they are built rather than deep inside the decoder.
//! - **Zero-cost newtypes:** `SnpIdx` and `StrainIdx` keep SNP rows and
//!   strain columns from being confused.
//! - **Flat storage:** `CodeMatrix` is a single row-major buffer so a whole
//!   SNP row is one slice.

pub mod genotype;
pub mod matrix;
pub mod snp;
pub mod strain;

// Re-export commonly used types
pub use genotype::{AbCode, AlleleCalls, NO_CALL};
pub use matrix::CodeMatrix;
pub use snp::{Snp, SnpIdx, SnpPanel};
pub use strain::{ContributingStrains, StrainIdx};
