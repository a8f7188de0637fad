//! # Model Module
//!
//! The diplotype HMM and the post-processing applied to its decoded path.
//!
//! ## Core Algorithms
//! - `Encoder`: allele pairs to AB codes using each SNP's probe calls
//! - `Emission`: P(sample call | two parental calls) from weighted profiles
//! - `States`: unordered strain-pair state space
//! - `Parameters`: switch probability and transition log-probabilities
//! - `HMM`: log-space Viterbi decoding of the most likely diplotype path
//! - `Blocks`: run-length haplotype blocks and greedy label extension
//! - `Candidates`: strain pairs ranked by likelihood over an interval
//! - `Concordance`: call concordance QC, overall and in windows

pub mod blocks;
pub mod candidates;
pub mod concordance;
pub mod emission;
pub mod encoder;
pub mod hmm;
pub mod parameters;
pub mod states;
