//! # StrainHap: Parental Strain Haplotype Inference
//!
//! ## Usage
//! ```bash
//! strainhap --input sample.json --out report.json
//!
//! # With custom model constants and span timings
//! strainhap --input sample.json --out report.json --params hmm.json --profile
//! ```

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use strainhap::config::Config;
use strainhap::io::json::{read_bundle, write_report};
use strainhap::pipelines::{InferencePipeline, SampleReport};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for hierarchical profiling output
fn init_profiling() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::new("info"))
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Warnings only, unless `RUST_LOG` says otherwise
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate().context("Invalid arguments")?;

    if config.profile {
        init_profiling();
        eprintln!("=== Profiling enabled ===\n");
    } else {
        init_logging();
    }

    let n_threads = config.nthreads();
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
        .ok();

    let hmm_config = config.hmm_config().context("Invalid model parameters")?;
    let pipeline = InferencePipeline::new(hmm_config)?;

    let sample = read_bundle(&config.input)?;
    info!(
        sample_id = %sample.sample_id,
        n_chromosomes = sample.chromosomes.len(),
        n_threads,
        "inferring haplotypes"
    );

    let result = pipeline
        .run(&sample)
        .with_context(|| format!("Inference failed for sample {}", sample.sample_id))?;
    let report = SampleReport::from_result(result);
    write_report(&config.out, &report)?;

    eprintln!(
        "Sample {}: {} inferred, {} skipped, {} failed chromosomes",
        report.sample_id,
        report.summary.n_inferred,
        report.summary.n_skipped,
        report.summary.n_failed
    );
    if let Some(percent) = report.summary.concordant_percent {
        eprintln!("Call concordance: {:.2}%", percent);
    }
    eprintln!("Completed in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

