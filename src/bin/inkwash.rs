use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "inkwash", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Run the stage with a scripted pointer, writing numbered PNGs.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input stage JSON (omit for the built-in demo stage).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Simulation ticks to advance before rendering (frame 1 is the first
    /// animated frame).
    #[arg(long, default_value_t = 1)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input stage JSON (omit for the built-in demo stage).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// How long to run, in seconds.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Output directory for numbered PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_spec_json(path: &Path) -> anyhow::Result<inkwash::StageSpec> {
    let f = File::open(path).with_context(|| format!("open stage spec '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: inkwash::StageSpec =
        serde_json::from_reader(r).with_context(|| "parse stage spec JSON")?;
    Ok(spec)
}

fn load_spec(in_path: Option<&Path>) -> anyhow::Result<inkwash::StageSpec> {
    match in_path {
        Some(p) => read_spec_json(p),
        None => Ok(inkwash::StageSpec::default()),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = load_spec(args.in_path.as_deref())?;
    spec.validate()?;
    let bg = spec.background_rgba;

    let mut stage = inkwash::Stage::new(spec)?;
    for _ in 0..args.frame {
        stage.tick_frame();
    }
    let frame = stage.render_frame()?;
    let fp = inkwash::fingerprint_frame(&frame);

    write_png(&args.out, &frame, bg)?;
    eprintln!("wrote {} (fingerprint {fp})", args.out.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let spec = load_spec(args.in_path.as_deref())?;
    spec.validate()?;
    let bg = spec.background_rgba;
    let fps = spec.fps.as_f64();
    let (w, h) = (spec.viewport.width, spec.viewport.height);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let total_frames = (args.seconds * fps).round().max(1.0) as u64;
    let mut stage = inkwash::Stage::new(spec)?;
    let period = stage.spec().fps.frame_duration();
    let mut stats = inkwash::RunStats::default();

    for i in 1..=total_frames {
        for ev in scripted_events(i, fps, w, h) {
            stage.push_event(ev);
        }
        let started = Instant::now();
        stage.tick_frame();
        let frame = stage.render_frame()?;
        stats.frames += 1;
        if started.elapsed() > period {
            stats.slow_frames += 1;
        }

        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        write_png(&out, &frame, bg)?;
    }

    eprintln!(
        "wrote {} frames to {} ({} over budget, deck ended on card {})",
        stats.frames,
        args.out_dir.display(),
        stats.slow_frames,
        stage.deck().active_index()
    );
    Ok(())
}

/// Pointer script for the demo run: a slow inkwash figure over the upper
/// half of the stage, interrupted one second in by a rightward swipe that
/// commits the deck.
fn scripted_events(frame: u64, fps: f64, w: f64, h: f64) -> Vec<inkwash::PointerEvent> {
    let t = frame as f64 / fps;
    let ts = t * 1000.0;

    let swipe_start = fps.round() as u64;
    let swipe_moves = 12;
    if frame == swipe_start {
        return vec![inkwash::PointerEvent::down(w * 0.5, h * 0.7, ts)];
    }
    if frame > swipe_start && frame <= swipe_start + swipe_moves {
        let dx = 15.0 * (frame - swipe_start) as f64;
        return vec![inkwash::PointerEvent::moved(w * 0.5 + dx, h * 0.7, ts)];
    }
    if frame == swipe_start + swipe_moves + 1 {
        return vec![inkwash::PointerEvent::up(w * 0.5 + 180.0, h * 0.7, ts)];
    }

    let x = w * (0.5 + 0.35 * (t * 1.1).sin());
    let y = h * (0.35 + 0.2 * (t * 1.7).cos());
    vec![inkwash::PointerEvent::moved(x, y, ts)]
}

fn write_png(out: &Path, frame: &inkwash::FrameRGBA, bg: [u8; 4]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut flat = vec![0u8; frame.data.len()];
    inkwash::composite_cpu::flatten_to_opaque_rgba8(&mut flat, &frame.data, frame.premultiplied, bg)?;

    image::save_buffer_with_format(
        out,
        &flat,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}
