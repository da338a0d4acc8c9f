// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use content_inventory::utils::logging::{
    format_error, format_step, format_success, format_warning, init_logger,
};
use content_inventory::{
    Config, InventoryOrchestrator, Summarizer, Validator, extract_text,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "content_inventory")]
#[command(version)]
#[command(about = "Summaries, entities and near-duplicates for a document corpus", long_about = None)]
struct Cli {
    /// Configuration file; defaults to config/default.toml when present
    #[arg(short, long, value_name = "FILE", env = "CONTENT_INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inventory a corpus and write JSON and markdown reports
    Run {
        #[arg(short, long, value_name = "DIR")]
        source: PathBuf,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Jaccard similarity above which two documents are near-duplicates
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Print near-duplicate pairs only
    Duplicates {
        #[arg(short, long, value_name = "DIR")]
        source: PathBuf,

        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Print the summary of a single file
    Summarize {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    colored::control::set_override(cli.color);
    init_logger(cli.color, cli.verbose);

    if let Err(e) = dispatch(cli).await {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            source,
            output,
            threshold,
        } => cmd_run(config, source, output, threshold).await,
        Commands::Duplicates { source, threshold } => {
            cmd_duplicates(config, source, threshold).await
        }
        Commands::Summarize { file } => cmd_summarize(&config, &file).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(Some(path))
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Config::load(None).context("Failed to load configuration"),
    }
}

fn apply_threshold(config: &mut Config, threshold: Option<f64>) -> Result<()> {
    if let Some(threshold) = threshold {
        Validator::validate_threshold(threshold)?;
        config.dedup.similarity_threshold = threshold;
    }
    Ok(())
}

async fn cmd_run(
    mut config: Config,
    source: PathBuf,
    output: Option<PathBuf>,
    threshold: Option<f64>,
) -> Result<()> {
    let start_time = Instant::now();

    Validator::validate_directory(&source).context("Invalid source directory")?;
    apply_threshold(&mut config, threshold)?;
    if let Some(output) = output {
        config.output.directory = output;
    }
    Validator::validate_output_directory(&config.output.directory)
        .context("Invalid output directory")?;

    let output_dir = config.output.directory.clone();
    let top_entities = config.output.top_entities;

    println!("{}", format_step(1, 2, &format!("Inventorying {}", source.display())));
    let orchestrator = InventoryOrchestrator::new(config, source)
        .context("Failed to initialize inventory pipeline")?;
    let report = orchestrator.run().await.context("Inventory run failed")?;

    println!("{}", format_step(2, 2, "Reports written"));
    if report.stats.files_failed > 0 {
        println!(
            "{}",
            format_warning(&format!("{} files could not be parsed", report.stats.files_failed))
        );
    }

    println!("  Files:            {}", report.records.len());
    println!("  Words:            {}", report.stats.total_words);
    println!("  Duplicate pairs:  {}", report.duplicates.len());
    println!("  Distinct entities: {}", report.entities.len());

    if !report.entities.is_empty() {
        println!("\n{}", "Top entities".bold());
        for (phrase, count) in report.entities.most_common(top_entities.min(10)) {
            println!("  {:<40} {}", phrase, count);
        }
    }

    println!(
        "\n{}",
        format_success(&format!(
            "Inventory complete in {:.2}s, reports in {}",
            start_time.elapsed().as_secs_f64(),
            output_dir.display()
        ))
    );

    Ok(())
}

async fn cmd_duplicates(mut config: Config, source: PathBuf, threshold: Option<f64>) -> Result<()> {
    Validator::validate_directory(&source).context("Invalid source directory")?;
    apply_threshold(&mut config, threshold)?;
    let threshold = config.dedup.similarity_threshold;

    let orchestrator = InventoryOrchestrator::new(config, source)
        .context("Failed to initialize inventory pipeline")?
        .with_progress(false);
    let scan = orchestrator
        .find_duplicates()
        .await
        .context("Duplicate scan failed")?;

    if scan.duplicates.is_empty() {
        println!(
            "{}",
            format_success(&format!(
                "No near-duplicates at threshold {:.2} among {} documents",
                threshold, scan.documents
            ))
        );
        return Ok(());
    }

    for pair in &scan.duplicates {
        println!("{:.4}\t{}\t{}", pair.similarity, pair.doc1, pair.doc2);
    }
    println!(
        "{}",
        format_warning(&format!(
            "{} near-duplicate pairs at threshold {:.2}",
            scan.duplicates.len(),
            threshold
        ))
    );

    Ok(())
}

async fn cmd_summarize(config: &Config, file: &Path) -> Result<()> {
    Validator::validate_file_path(file)?;
    Validator::validate_supported_format(file)?;

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let text = extract_text(file, &content)?;

    let summarizer =
        Summarizer::new(config.summary.clone()).context("Invalid summary configuration")?;
    println!("{}", summarizer.summarize(&text));

    Ok(())
}
