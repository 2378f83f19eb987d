//! Command-line interface wiring for the `proxysheet` binary.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use proxysheet::{Geometry, Pipeline, PipelineConfig, TracingDiagnostics};

pub mod utils;

use utils::parse_non_empty_path;

/// Parsed CLI entrypoint for the `proxysheet` binary.
#[derive(Parser, Debug)]
#[command(
    name = "proxysheet",
    version,
    about = "Print a VTES deck list as 3x3 proxy sheets (A4 PDF)"
)]
pub struct Cli {
    /// Deck list, one `<quantity> <card name>` per line; a `Crypt` line starts the crypt.
    #[arg(value_parser = parse_non_empty_path)]
    pub deck_list: PathBuf,

    /// Folder holding `<cardname>.jpg` images.
    #[arg(value_parser = parse_non_empty_path)]
    pub image_folder: PathBuf,

    /// Output PDF (default: deck list name with a .pdf extension).
    #[arg(short = 'o', long = "output", value_parser = parse_non_empty_path)]
    pub output: Option<PathBuf>,

    /// JSON file overriding page and grid dimensions.
    #[arg(long, value_parser = parse_non_empty_path)]
    pub layout: Option<PathBuf>,

    /// Print the placement plan as JSON instead of writing a PDF.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase log detail (-v debug, -vv trace).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Translate flags into a pipeline configuration.
    pub fn to_config(&self) -> Result<PipelineConfig> {
        if !self.image_folder.is_dir() {
            bail!(
                "image folder {} is not a directory",
                self.image_folder.display()
            );
        }
        let mut config = PipelineConfig::new(&self.deck_list, &self.image_folder);
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(layout) = &self.layout {
            config.geometry = Geometry::load(layout)?;
        }
        Ok(config)
    }
}

/// Execute the requested run.
pub fn run(cli: Cli) -> Result<()> {
    utils::init_tracing(cli.verbose, cli.quiet);
    tracing::info!(
        deck = %cli.deck_list.display(),
        images = %cli.image_folder.display(),
        "starting proxysheet"
    );

    let pipeline = Pipeline::new(cli.to_config()?);
    let diagnostics = TracingDiagnostics;

    if cli.dry_run {
        let planned = pipeline.plan(&diagnostics)?;
        let json = serde_json::to_string_pretty(&planned.plan)
            .context("failed to serialize placement plan")?;
        println!("{}", json);
        return Ok(());
    }

    let summary = pipeline.run(&diagnostics).with_context(|| {
        format!(
            "failed to build proxy sheet for {}",
            pipeline.config().deck_list.display()
        )
    })?;
    println!(
        "Wrote {} image(s) on {} page(s) to {}",
        summary.placed,
        summary.pages,
        summary.output.display()
    );
    Ok(())
}
