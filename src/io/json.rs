//! # JSON Sample Bundles
//!
//! Reads the sample bundle consumed by the `strainhap` binary and writes the
//! resulting report. The core library defines no storage format; this is the
//! binary's interchange surface only.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::pipelines::inference::SampleInput;
use crate::pipelines::summary::SampleReport;

/// Read a sample bundle
pub fn read_bundle(path: &Path) -> Result<SampleInput> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open sample bundle: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse sample bundle: {}", path.display()))
}

/// Write a report as pretty-printed JSON
pub fn write_report(path: &Path, report: &SampleReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("Failed to serialize report")?;
    writer.write_all(b"\n")?;
    writer.flush().context("Failed to flush report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::inference::{ChromosomeInput, GenotypeInput, Sex};
    use tempfile::tempdir;

    fn bundle() -> SampleInput {
        SampleInput {
            sample_id: "DO-0042".into(),
            sex: Some(Sex::Male),
            platform_id: "GigaMUGA".into(),
            platform_chromosomes: vec!["1".into()],
            contributing_strains: vec!["WSB/EiJ".into()],
            chromosomes: vec![ChromosomeInput {
                chromosome: "1".into(),
                snps: vec![],
                sample: GenotypeInput::Codes(vec![]),
                strains: [("WSB/EiJ".to_string(), GenotypeInput::Codes(vec![]))]
                    .into_iter()
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_bundle_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let file = File::create(&path).unwrap();
        serde_json::to_writer(file, &bundle()).unwrap();
        assert_eq!(read_bundle(&path).unwrap(), bundle());
    }

    #[test]
    fn test_missing_bundle_names_path() {
        let err = read_bundle(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/bundle.json"));
    }

    #[test]
    fn test_malformed_bundle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"sample_id\": 3}").unwrap();
        assert!(read_bundle(&path).is_err());
    }
}
