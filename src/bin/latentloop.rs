use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "latentloop", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the planned waypoint schedule as JSON.
    Plan(PlanArgs),
    /// Generate the loop and write each drawn frame as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Sketch config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Sketch config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Number of frames to draw.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Output directory for `frame_NNNNN.png`.
    #[arg(long)]
    out: PathBuf,

    /// Scripted key presses as `frame:key`, comma separated (e.g. `10:3,40:d`).
    #[arg(long, value_delimiter = ',', value_parser = parse_key_event)]
    keys: Vec<(u64, char)>,

    /// Fixed pointer position `x,y` applied every frame.
    #[arg(long, value_parser = parse_pointer)]
    pointer: Option<(f32, f32)>,

    /// Constant audio level fed to the amplitude drive.
    #[arg(long)]
    amplitude: Option<f32>,

    /// Frame ranges `start-end` (inclusive) during which the pointer is held.
    #[arg(long, value_delimiter = ',', value_parser = parse_frame_range)]
    pressed: Vec<(u64, u64)>,
}

fn parse_key_event(s: &str) -> Result<(u64, char), String> {
    let (frame, key) = s
        .split_once(':')
        .ok_or_else(|| format!("expected frame:key, got '{s}'"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad frame '{frame}': {e}"))?;
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((frame, c)),
        _ => Err(format!("key must be a single character, got '{key}'")),
    }
}

fn parse_frame_range(s: &str) -> Result<(u64, u64), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected start-end, got '{s}'"))?;
    let start = start.trim().parse::<u64>().map_err(|e| e.to_string())?;
    let end = end.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if end < start {
        return Err(format!("range end {end} is before start {start}"));
    }
    Ok((start, end))
}

fn parse_pointer(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<latentloop::SketchConfig> {
    match path {
        Some(p) => Ok(latentloop::SketchConfig::load(p)?),
        None => Ok(latentloop::SketchConfig::default()),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let sketch = latentloop::Sketch::new(cfg)?;
    let path = sketch.path();

    let waypoints = path
        .waypoints
        .iter()
        .map(|w| {
            serde_json::json!({
                "index": w.index,
                "segment": w.segment,
                "step": w.step,
                "amt": w.amt,
            })
        })
        .collect::<Vec<_>>();
    let doc = serde_json::json!({
        "seed": sketch.seed(),
        "anchors": path.segments(),
        "planned": path.len(),
        "waypoints": waypoints,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let manifest = latentloop::ModelManifest::load(&args.manifest)?;
    let mut generator = latentloop::load_generator(&manifest)?;
    let mut sketch = latentloop::Sketch::new(cfg)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    // Only the strict gate needs the whole pass up front; the others draw while generating.
    if sketch.config().readiness == latentloop::ReadinessGate::Complete {
        pollster::block_on(sketch.load(generator.as_mut()))?;
    }

    let mut written = 0u64;
    for frame in 0..args.frames {
        if sketch.is_generating() {
            pollster::block_on(sketch.load_step(generator.as_mut()))?;
        }

        let input = latentloop::FrameInput {
            pointer: args.pointer,
            key: args
                .keys
                .iter()
                .find(|(f, _)| *f == frame)
                .map(|&(_, k)| k),
            amplitude: args.amplitude,
            pressed: args
                .pressed
                .iter()
                .any(|&(start, end)| (start..=end).contains(&frame)),
        };
        let Some(raster) = sketch.draw(&input) else {
            tracing::debug!(frame, "nothing to draw yet");
            continue;
        };

        let out_path = args.out.join(format!("frame_{frame:05}.png"));
        raster
            .to_rgba_image()?
            .save(&out_path)
            .with_context(|| format!("write frame '{}'", out_path.display()))?;
        written += 1;
    }

    let report = sketch.report();
    tracing::info!(
        written,
        generated = report.generated,
        failed = report.failed,
        planned = report.planned,
        "render finished"
    );
    for line in sketch.status_lines() {
        tracing::info!("{line}");
    }
    Ok(())
}
