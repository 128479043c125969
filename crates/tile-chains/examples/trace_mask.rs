//! Example: extract boundary chains from an ASCII tile mask.
//!
//! The mask file uses `#` (or `1`) for active tiles and `.` (or `0`) for
//! inactive ones, one grid row per line. Without `--input` a synthetic plane
//! with a hollow ring, a T junction and a stray tile is used.
//!
//! Kept chains are printed to stdout and optionally written as JSON.
//!
//! Run from the workspace root:
//!   cargo run -p tile-chains --example trace_mask -- --help
//!   RUST_LOG=debug cargo run -p tile-chains --example trace_mask

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tile_chains::{ActivationMap, ExtractConfig, FilterConfig, extract_chains};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Trace boundary chains in an ASCII tile mask")]
struct Args {
    /// Path to the ASCII mask (default: built-in demo plane)
    #[arg(long)]
    input: Option<String>,

    /// Minimum chain length in tiles
    #[arg(long, default_value_t = 3)]
    min_length: usize,

    /// Skip single-tile gap filling
    #[arg(long)]
    no_fill: bool,

    /// Output JSON path
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChainDto {
    chain_id: usize,
    tiles: Vec<[usize; 2]>,
    turns: Vec<u8>,
    spliced: bool,
    is_loop: bool,
}

#[derive(Serialize)]
struct Report {
    height: usize,
    width: usize,
    raw_chains: usize,
    /// Wall-clock time for the whole pipeline, in milliseconds.
    elapsed_ms: f64,
    chains: Vec<ChainDto>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

const DEMO: &str = "
............
.####.......
.#..#...#...
.####...#...
......#####.
............
..#.........
............
";

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let text = match &args.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => DEMO.to_owned(),
    };
    let plane = ActivationMap::from_ascii(&text).context("parsing ASCII mask")?;

    println!(
        "mask {}x{}, {} active tiles",
        plane.height(),
        plane.width(),
        plane.count_active()
    );

    let cfg = ExtractConfig {
        fill_gaps: !args.no_fill,
        filter: FilterConfig {
            min_length: args.min_length,
        },
    };

    let t0 = Instant::now();
    let out = extract_chains(&plane, &cfg).context("extracting chains")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    println!(
        "kept {}/{} chains ({elapsed_ms:.3} ms)",
        out.chains.len(),
        out.raw_chains
    );
    for c in &out.chains {
        let kind = if c.is_loop() {
            "loop"
        } else if c.spliced {
            "spliced"
        } else {
            "open"
        };
        println!(
            "  chain {:>3}: {:>3} tiles, {:>6.2} arc, {kind}",
            c.chain_id,
            c.len(),
            c.arc_length()
        );
    }

    if let Some(out_path) = &args.out {
        let report = Report {
            height: out.height(),
            width: out.width(),
            raw_chains: out.raw_chains,
            elapsed_ms,
            chains: out
                .chains
                .iter()
                .map(|c| ChainDto {
                    chain_id: c.chain_id,
                    tiles: c.tiles.iter().map(|t| [t.row, t.col]).collect(),
                    turns: c.steps.iter().map(|s| s.turn.code()).collect(),
                    spliced: c.spliced,
                    is_loop: c.is_loop(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        fs::write(out_path, json).with_context(|| format!("writing {out_path}"))?;
        println!("results written to {out_path}");
    }

    Ok(())
}
