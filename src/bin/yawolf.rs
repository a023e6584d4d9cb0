//! Terminal walkthrough of the demo level.
//!
//! ```bash
//! cargo run --release -- --frames 200 --turn 4 --walk 16 --colour
//! RUST_LOG=yawolf_rs=debug cargo run -- --config level.toml 2> render.log
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yawolf_rs::{
    RenderConfig, RenderSession,
    renderer::{Palette, PixelShader, TerminalOutput},
    world::{builtin, demo_level},
};

#[derive(Parser, Debug)]
#[command(version, about = "ASCII ray-casting renderer")]
struct Args {
    /// TOML file with render settings; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to draw.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Target frames per second.
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// Turn per frame, library angle units (1024 = full circle).
    #[arg(long, default_value_t = 4, allow_hyphen_values = true)]
    turn: i32,

    /// Forward movement per frame, library units (1024 = one square).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    walk: i32,

    /// 24-bit colour output with distance shading.
    #[arg(long)]
    colour: bool,

    /// Leave the map empty instead of loading the demo level.
    #[arg(long)]
    empty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let mut session = RenderSession::new();
    session.configure(&config).context("configuring renderer")?;
    if args.colour {
        session.set_shader(PixelShader::new(Palette::Shaded));
    }
    if !args.empty {
        demo_level(session.map_mut()?, builtin()).context("building demo level")?;
    }

    let mut term = TerminalOutput::new(args.colour);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    term.enter(&mut out)?;

    let result = run(&args, &mut session, &mut term, &mut out);

    // restore the terminal even when a frame failed
    term.exit(&mut out)?;
    result
}

fn run<W: Write>(
    args: &Args,
    session: &mut RenderSession,
    term: &mut TerminalOutput,
    out: &mut W,
) -> anyhow::Result<()> {
    let frame_time = Duration::from_secs(1) / args.fps.max(1);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0u32;
    let mut last_report = Instant::now();

    for n in 0..args.frames {
        let t0 = Instant::now();

        session
            .render_frame()
            .with_context(|| format!("rendering frame {n}"))?;
        term.present(session.frame()?, out)?;

        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_report.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!(avg_ms = %format!("{avg_ms:.2}"), frames = acc_frames, "render timing");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_report = Instant::now();
        }

        session.turn(args.turn)?;
        session.walk(args.walk)?;

        if let Some(rest) = frame_time.checked_sub(t0.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(())
}
