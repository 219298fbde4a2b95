pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use log::info;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let opts = args.output_options();

    // 1. ── Parse ──────────────────────────────────────────────────────
    let raw = parser::load_project(&args.input)
        .with_context(|| format!("Loading project from {}", args.input.display()))?;

    // 2. ── Process ────────────────────────────────────────────────────
    let marker = args
        .filter_flashbacks
        .then_some(args.flashback_marker.as_str());
    let rows = processor::run(&raw, marker);

    // 3. ── Write output ───────────────────────────────────────────────
    let summary = writer::emit(&rows, &opts, &args.output).with_context(|| "Writing transcript")?;

    println!(
        "Extracted {} maps, {} common events, {} events, {} dialogue lines.",
        summary.maps, summary.common_events, summary.events, summary.dialogue_lines
    );
    println!("Story transcript saved to {}", args.output.display());
    info!("extraction finished");

    Ok(())
}
