use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Rgb, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};
use tile_chains::{
    ActivationMap, CellGrid, Chain, ChainTracer, ExtractConfig, FilterConfig, TraceStats,
    Verdict, classify_chain, extract_chains, fill_gaps_map,
};

#[derive(Parser, Debug)]
#[command(name = "tc_gallery")]
#[command(about = "Run tile-chains stages on binary mask fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gap filling only.
    #[command(name = "fill")]
    Fill(FillArgs),
    /// Fill and trace, every raw chain annotated with its filter verdict.
    #[command(name = "trace")]
    Trace(PipelineArgs),
    /// Full pipeline: fill, trace, filter.
    #[command(name = "chains")]
    Chains(PipelineArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Mask image, one pixel per tile; luma > 0 is active.
    #[arg(long, required = true)]
    input: PathBuf,
    /// Optional case envelope; its width/height must match the mask.
    #[arg(long)]
    truth: Option<PathBuf>,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
    /// Output pixels per tile in rendered PNGs.
    #[arg(long, default_value_t = 8)]
    scale: u32,
}

#[derive(Args, Debug, Clone)]
struct FillArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 3)]
    min_length: usize,
    /// Trace the mask as is.
    #[arg(long)]
    no_fill: bool,
}

impl PipelineArgs {
    fn config(&self) -> ExtractConfig {
        ExtractConfig {
            fill_gaps: !self.no_fill,
            filter: FilterConfig {
                min_length: self.min_length,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TruthEnvelope {
    case: String,
    width: usize,
    height: usize,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaFill {
    width: usize,
    height: usize,
    active_before: usize,
    active_after: usize,
    closed: usize,
    rule: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct ChainDto {
    chain_id: usize,
    tiles: Vec<[usize; 2]>,
    turns: Vec<u8>,
    spliced: bool,
    is_loop: bool,
    arc_length: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
struct ChainsDto {
    width: usize,
    height: usize,
    chains: Vec<ChainDto>,
}

#[derive(Debug, Clone, Serialize)]
struct StatsDto {
    seeds: usize,
    isolated: usize,
    chains: usize,
    loops: usize,
    spliced: usize,
    branches_spawned: usize,
    branches_dropped: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaChains {
    fill_gaps: bool,
    min_length: usize,
    raw_chains: usize,
    kept_chains: usize,
    stats: StatsDto,
}

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([230, 25, 75]),
    Rgb([60, 180, 75]),
    Rgb([255, 225, 25]),
    Rgb([0, 130, 200]),
    Rgb([245, 130, 48]),
    Rgb([145, 30, 180]),
    Rgb([70, 240, 240]),
    Rgb([240, 50, 230]),
];

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Fill(args) => run_fill(args),
        Command::Trace(args) => run_trace(args),
        Command::Chains(args) => run_chains(args),
    }
}

fn run_fill(args: FillArgs) -> Result<()> {
    let (case_dir, mask) = prepare_case(&args.common, "fill")?;

    let filled = fill_gaps_map(&mask);
    save_plane(case_dir.join("filled.png"), &filled, args.common.scale)?;

    let before = mask.count_active();
    let after = filled.count_active();
    info!("fill: {before} -> {after} active tiles");

    write_json(
        case_dir.join("meta.json"),
        &MetaFill {
            width: mask.width(),
            height: mask.height(),
            active_before: before,
            active_after: after,
            closed: after - before,
            rule: "inactive tile set iff both 8-neighbours along one axis are active",
        },
    )?;

    Ok(())
}

fn run_trace(args: PipelineArgs) -> Result<()> {
    let (case_dir, mask) = prepare_case(&args.common, "trace")?;
    let cfg = args.config();

    let filled = if cfg.fill_gaps {
        fill_gaps_map(&mask)
    } else {
        mask.clone()
    };
    save_plane(case_dir.join("filled.png"), &filled, args.common.scale)?;

    let mut grid = CellGrid::from_activation(&filled);
    let mut tracer = ChainTracer::new();
    let chains = tracer
        .trace(&mut grid)
        .context("tracing activation grid")?;

    let (height, width) = filled.shape();
    let mut dtos = Vec::with_capacity(chains.len());
    let mut kept = 0usize;
    for c in &chains {
        let verdict = classify_chain(c, height, width, cfg.filter.min_length)
            .with_context(|| format!("classifying chain {}", c.chain_id))?;
        if verdict.is_kept() {
            kept += 1;
        }
        dtos.push(chain_dto(c, Some(verdict_name(verdict))));
    }
    info!("trace: {} raw chains, {kept} would be kept", chains.len());

    write_json(
        case_dir.join("chains.json"),
        &ChainsDto {
            width,
            height,
            chains: dtos,
        },
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaChains {
            fill_gaps: cfg.fill_gaps,
            min_length: cfg.filter.min_length,
            raw_chains: chains.len(),
            kept_chains: kept,
            stats: stats_dto(tracer.stats()),
        },
    )?;

    render_chains(&filled, &chains, args.common.scale)?
        .save(case_dir.join("chains.png"))
        .with_context(|| format!("saving overlay in {}", case_dir.display()))?;

    Ok(())
}

fn run_chains(args: PipelineArgs) -> Result<()> {
    let (case_dir, mask) = prepare_case(&args.common, "chains")?;
    let cfg = args.config();

    let out = extract_chains(&mask, &cfg).context("extracting chains")?;
    save_plane(case_dir.join("filled.png"), &out.filled, args.common.scale)?;
    info!(
        "chains: kept {} of {} raw chains",
        out.chains.len(),
        out.raw_chains
    );

    write_json(
        case_dir.join("chains.json"),
        &ChainsDto {
            width: out.width(),
            height: out.height(),
            chains: out.chains.iter().map(|c| chain_dto(c, None)).collect(),
        },
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaChains {
            fill_gaps: cfg.fill_gaps,
            min_length: cfg.filter.min_length,
            raw_chains: out.raw_chains,
            kept_chains: out.chains.len(),
            stats: stats_dto(out.stats),
        },
    )?;

    render_chains(&out.filled, &out.chains, args.common.scale)?
        .save(case_dir.join("chains.png"))
        .with_context(|| format!("saving overlay in {}", case_dir.display()))?;

    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<(PathBuf, ActivationMap)> {
    ensure_file_exists(&common.input, "input")?;
    if common.scale == 0 {
        bail!("--scale must be at least 1");
    }

    let mask = load_mask(&common.input)?;
    scaled_dims(&mask, common.scale)?;

    if let Some(truth_path) = &common.truth {
        ensure_file_exists(truth_path, "truth")?;
        let truth: TruthEnvelope = read_json(truth_path)
            .with_context(|| format!("reading truth json at {}", truth_path.display()))?;
        if truth.width != mask.width() || truth.height != mask.height() {
            bail!(
                "truth dimensions ({}, {}) do not match mask dimensions ({}, {}).",
                truth.width,
                truth.height,
                mask.width(),
                mask.height()
            );
        }
        info!(
            "case '{}': {}",
            truth.case,
            truth.notes.as_deref().unwrap_or("no notes")
        );
    }

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    save_plane(case_dir.join("input.png"), &mask, common.scale)?;

    Ok((case_dir, mask))
}

fn load_mask(path: &Path) -> Result<ActivationMap> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw().into_iter().map(|v| u8::from(v > 0)).collect();

    ActivationMap::from_vec(h as usize, w as usize, data)
        .with_context(|| format!("building activation plane from {}", path.display()))
}

fn save_plane(path: PathBuf, plane: &ActivationMap, scale: u32) -> Result<()> {
    let (w, h) = scaled_dims(plane, scale)?;
    let gray = GrayImage::from_fn(w, h, |x, y| {
        let v = plane.data()[(y / scale) as usize * plane.width() + (x / scale) as usize];
        image::Luma([v * 255])
    });
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn render_chains(plane: &ActivationMap, chains: &[Chain], scale: u32) -> Result<RgbImage> {
    let (w, h) = scaled_dims(plane, scale)?;
    let mut rgb = RgbImage::from_fn(w, h, |x, y| {
        let v = plane.data()[(y / scale) as usize * plane.width() + (x / scale) as usize];
        if v == 1 { Rgb([72, 72, 72]) } else { Rgb([0, 0, 0]) }
    });

    for c in chains {
        let color = PALETTE[c.chain_id % PALETTE.len()];
        for t in &c.tiles {
            fill_tile(&mut rgb, t.col as u32, t.row as u32, scale, color);
        }
    }

    Ok(rgb)
}

fn fill_tile(img: &mut RgbImage, col: u32, row: u32, scale: u32, color: Rgb<u8>) {
    // leave a one pixel gutter so neighbouring tiles stay distinguishable
    let inset = u32::from(scale > 2);
    for dy in inset..scale - inset {
        for dx in inset..scale - inset {
            let (x, y) = (col * scale + dx, row * scale + dy);
            if x < img.width() && y < img.height() {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Output image size for `plane` rendered at `scale` pixels per tile.
fn scaled_dims(plane: &ActivationMap, scale: u32) -> Result<(u32, u32)> {
    let w = u32::try_from(plane.width()).context("plane width exceeds u32")?;
    let h = u32::try_from(plane.height()).context("plane height exceeds u32")?;
    let (Some(sw), Some(sh)) = (w.checked_mul(scale), h.checked_mul(scale)) else {
        bail!("{w}x{h} tiles at --scale {scale} exceed the maximum image size");
    };
    Ok((sw, sh))
}

fn chain_dto(c: &Chain, verdict: Option<&'static str>) -> ChainDto {
    ChainDto {
        chain_id: c.chain_id,
        tiles: c.tiles.iter().map(|t| [t.row, t.col]).collect(),
        turns: c.steps.iter().map(|s| s.turn.code()).collect(),
        spliced: c.spliced,
        is_loop: c.is_loop(),
        arc_length: c.arc_length(),
        verdict,
    }
}

fn stats_dto(s: TraceStats) -> StatsDto {
    StatsDto {
        seeds: s.seeds,
        isolated: s.isolated,
        chains: s.chains,
        loops: s.loops,
        spliced: s.spliced,
        branches_spawned: s.branches_spawned,
        branches_dropped: s.branches_dropped,
    }
}

fn verdict_name(v: Verdict) -> &'static str {
    match v {
        Verdict::TooShort => "TooShort",
        Verdict::Loop => "Loop",
        Verdict::Spliced => "Spliced",
        Verdict::Border => "Border",
        Verdict::Floating => "Floating",
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tile_chains::ActivationMap;

    use super::scaled_dims;

    #[test]
    fn scaled_dims_multiplies_tiles_by_scale() {
        let plane = ActivationMap::new(3, 5);
        assert_eq!(scaled_dims(&plane, 8).expect("small plane"), (40, 24));
    }

    #[test]
    fn scaled_dims_rejects_overflowing_scale() {
        let plane = ActivationMap::new(2, 3);
        assert!(scaled_dims(&plane, u32::MAX).is_err());
        assert!(scaled_dims(&plane, u32::MAX / 3).is_ok());
    }
}
