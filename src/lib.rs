//! # StrainHap Library Root
//!
//! Infers which inbred parental strains a genotyped sample inherited from,
//! chromosome by chromosome, with a pair hidden Markov model decoded by
//! Viterbi.
//!
//! ## Module Structure
//! ```text
//! strainhap
//! ├── data        # SNPs, AB codes, code matrices, contributing strains
//! ├── io          # JSON sample bundles and reports (driver binary)
//! ├── model       # Encoding, emissions, Viterbi, blocks, concordance
//! ├── pipelines   # Per-sample orchestration and summaries
//! └── utils       # Reusable decode buffers
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

pub use config::{Config, HmmConfig};
pub use data::{AbCode, CodeMatrix, ContributingStrains, Snp, SnpPanel, StrainIdx};
pub use error::{Result, StrainHapError};
pub use model::blocks::HaplotypeBlock;
pub use model::candidates::{rank_pairs, CandidatePair};
pub use model::concordance::{ConcordanceBin, ConcordanceReport};
pub use model::emission::EmissionModel;
pub use model::hmm::{viterbi_decode, DiplotypeHmm, ViterbiPath};
pub use model::states::DiplotypeState;
pub use pipelines::{InferencePipeline, SampleReport};
