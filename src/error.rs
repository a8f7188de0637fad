//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! Data-integrity and configuration problems are reported at the point of
//! detection. Zero-probability emissions and single-state models are not
//! errors; they flow through the decoder as `-inf` log-probabilities.

use thiserror::Error;

/// Main error type for strain haplotype inference
#[derive(Error, Debug)]
pub enum StrainHapError {
    /// An allele pair that fits none of the N/A/B/H categories for its SNP
    #[error(
        "Encoding error: sample {sample:?} at SNP index {snp_index} has alleles \
         ({allele1}, {allele2}) matching neither probe call"
    )]
    Encoding {
        sample: String,
        snp_index: usize,
        allele1: char,
        allele2: char,
    },

    /// Parallel arrays disagree in length
    #[error("Shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// Invalid data errors (unsorted SNPs, out-of-range codes or indices)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Configuration errors (zero-sum profiles, empty strain lists)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O errors from the driver binary
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors from the driver binary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using StrainHapError
pub type Result<T> = std::result::Result<T, StrainHapError>;

impl StrainHapError {
    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    /// Fail with a shape mismatch unless `found == expected`
    pub fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::shape(what, expected, found))
        }
    }

    /// True for errors caused by the biological input rather than the parameters
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::Encoding { .. } | Self::ShapeMismatch { .. } | Self::InvalidData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_names_sample_and_index() {
        let err = StrainHapError::Encoding {
            sample: "UM-004".to_string(),
            snp_index: 17,
            allele1: 'C',
            allele2: 'G',
        };
        let msg = err.to_string();
        assert!(msg.contains("UM-004"));
        assert!(msg.contains("17"));
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_check_len() {
        assert!(StrainHapError::check_len("observed", 3, 3).is_ok());
        let err = StrainHapError::check_len("observed", 3, 4).unwrap_err();
        assert!(matches!(
            err,
            StrainHapError::ShapeMismatch {
                expected: 3,
                found: 4,
                ..
            }
        ));
        assert!(!StrainHapError::config("x").is_data_integrity());
    }
}
