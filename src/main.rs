//! # codesim CLI
//!
//! Compares every pair of submissions in one folder and writes a ranked JSON
//! report.
//!
//! ```bash
//! # Compare all Python files in ./submissions with the offline stub model
//! codesim ./submissions --lang py
//!
//! # Use the HTTP embedding model configured in codesim.yaml
//! codesim ./submissions --lang java --config codesim.yaml --provider api --output out.json
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use codesim::{build_provider, CodesimConfig, Language, ProviderKind, Report, SimilarityEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of ranked pairs printed after a run.
const SUMMARY_ROWS: usize = 10;

/// Source-code similarity checker for a folder of submissions.
#[derive(Parser)]
#[command(name = "codesim", version, about = "Pairwise source-code similarity report for a folder of submissions")]
struct Cli {
    /// Folder holding one file per submission.
    dir: PathBuf,

    /// Language of the submissions; only `*.<lang>` files are read.
    #[arg(long, value_parser = parse_language)]
    lang: Language,

    /// Where to write the JSON report.
    #[arg(long, short, default_value = "report.json")]
    output: PathBuf,

    /// YAML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the embedding provider from the config file.
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Stub,
    Api,
}

impl From<ProviderArg> for ProviderKind {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Stub => ProviderKind::Stub,
            ProviderArg::Api => ProviderKind::Api,
        }
    }
}

fn parse_language(tag: &str) -> Result<Language, String> {
    Language::from_tag(tag).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => CodesimConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CodesimConfig::default(),
    };
    if let Some(provider) = cli.provider {
        config.embedding.provider = provider.into();
        config
            .validate()
            .context("config invalid after --provider override")?;
    }

    let provider = build_provider(&config.embedding).context("building embedding provider")?;
    let engine = SimilarityEngine::new(provider, config.engine_config());

    let start = Instant::now();
    let report = engine
        .compare_directory(&cli.dir, cli.lang)
        .with_context(|| format!("comparing {}", cli.dir.display()))?;

    report
        .write_json(&cli.output)
        .context("writing report")?;
    info!(
        output = %cli.output.display(),
        elapsed_ms = start.elapsed().as_millis(),
        "report_written"
    );

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &Report) {
    println!(
        "{} files, {} comparisons, {} highlighted",
        report.file_count,
        report.comparison_count,
        report.highlighted().count()
    );
    for (rank, pair) in report.pairs.iter().take(SUMMARY_ROWS).enumerate() {
        let marker = if pair.highlight.is_some() { "*" } else { " " };
        println!(
            "{marker} {:>3}. {:.4}  {}  {}",
            rank + 1,
            pair.score,
            pair.file1,
            pair.file2
        );
    }
    if report.pairs.len() > SUMMARY_ROWS {
        println!("  ... {} more in the report", report.pairs.len() - SUMMARY_ROWS);
    }
}
