use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use maccabyte::config::resolve_config;
use maccabyte::loader::read_source;
use maccabyte::report::{render_comparison_as, render_tokens_as, write_analysis, OutputFormat};
use maccabyte::{build_engine, Config, FeatureMode, Pipeline, PipelineSettings};

#[derive(Parser, Debug)]
#[command(name = "maccabyte")]
#[command(version, about = "Analyze or compare Ancient Greek texts")]
struct Cli {
    /// Configuration file (defaults to ./maccabyte.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a single text
    Analyze {
        /// Greek text, or path to a .txt or Perseus .xml file
        text: String,

        /// Where to save the results (defaults to analysis.results_file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Characters per engine call
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: Option<u64>,
    },
    /// Compare two texts by lemma or POS
    Compare {
        /// First text or file
        text1: String,

        /// Second text or file
        text2: String,

        /// Feature to compare: lemma or pos
        #[arg(long)]
        mode: Option<String>,

        /// How many top items to compare
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        top: Option<u64>,

        /// Rank every value of either text instead of only shared ones
        #[arg(long)]
        combined: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Characters per engine call
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings_for(config: &Config, chunk_size: Option<u64>) -> PipelineSettings {
    let mut settings = PipelineSettings::from(config);
    if let Some(size) = chunk_size {
        settings.chunk_size = NonZeroUsize::new(size as usize);
    }
    settings
}

fn run_analyze(
    config: &Config,
    text: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
    chunk_size: Option<u64>,
) -> Result<()> {
    let document = read_source(text)?;
    let engine = build_engine(&config.engine)?;
    let pipeline = Pipeline::new(engine, settings_for(config, chunk_size));

    let tokens = pipeline.analyze_document(&document)?;
    print!("{}", render_tokens_as(&tokens, format)?);

    let path = output.unwrap_or_else(|| config.analysis.results_file.clone());
    write_analysis(&tokens, &path, format)
        .with_context(|| format!("saving analysis results to {}", path.display()))?;
    info!(path = %path.display(), tokens = tokens.len(), "analysis complete");
    Ok(())
}

fn run_compare(
    config: &Config,
    text1: &str,
    text2: &str,
    mode: Option<String>,
    top: Option<u64>,
    combined: bool,
    format: OutputFormat,
    chunk_size: Option<u64>,
) -> Result<()> {
    // Reject bad modes and inputs before paying for engine start-up.
    let mode: FeatureMode = match mode {
        Some(mode) => mode.parse()?,
        None => config.compare.mode,
    };
    let top_n = top.map(|n| n as usize).unwrap_or(config.compare.top_n);
    let first = read_source(text1).context("loading the first text")?;
    let second = read_source(text2).context("loading the second text")?;

    let engine = build_engine(&config.engine)?;
    let pipeline = Pipeline::new(engine, settings_for(config, chunk_size));
    let report = pipeline.compare_documents(&first, &second, mode, top_n)?;

    print!(
        "{}",
        render_comparison_as(&report, format, combined, config.compare.unique_display_limit)?
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            text,
            output,
            format,
            chunk_size,
        } => run_analyze(&config, &text, output, format, chunk_size),
        Commands::Compare {
            text1,
            text2,
            mode,
            top,
            combined,
            format,
            chunk_size,
        } => run_compare(
            &config, &text1, &text2, mode, top, combined, format, chunk_size,
        ),
    }
}
