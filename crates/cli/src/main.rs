//! Offline generation of a clippings deck from a spreadsheet.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use clipdeck_core::{aggregate, categorize, outline, ReportConfig};
use clipdeck_pptx::Branding;

/// Generate the clippings slide deck from an XLSX file.
#[derive(Parser, Debug)]
#[command(name = "clipdeck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input spreadsheet (.xlsx)
    input: PathBuf,

    /// Output deck path (default: input name with .pptx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding the branding images (icon.png, banner.png)
    #[arg(long, default_value = "static")]
    branding_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = ReportConfig::default();
    let branding = Branding::load_from_dir(&args.branding_dir);

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let clippings = clipdeck_xlsx::load_clippings(&bytes)
        .with_context(|| format!("Failed to load clippings from {}", args.input.display()))?;
    if args.verbose {
        eprintln!("  Loaded {} clippings", clippings.len());
    }

    let rows = categorize::categorize_clippings(&config, clippings);
    let distribution = aggregate::outlet_distribution(&rows);
    let chart = clipdeck_chart::render_outlet_pie(&distribution)?;

    let outline = outline::from_categorized(&config, rows, chart);
    if args.verbose {
        eprintln!(
            "  Assembled {} pages across {} sections",
            outline.pages.len(),
            outline.stats.by_category.len()
        );
    }

    let deck = clipdeck_pptx::render_deck(&outline.pages, &branding)?;

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("pptx"));
    fs::write(&output, &deck).with_context(|| format!("Failed to write {}", output.display()))?;
    log::debug!("wrote {} bytes", deck.len());
    println!("Deck written to {}", output.display());

    Ok(())
}
