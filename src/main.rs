//! Hand Therapy Coach - camera-guided hand exercise sessions
//!
//! Scores tracked hand landmarks against five therapeutic exercises,
//! counts repetitions with an edge-triggered state machine and appends
//! every accepted rep to a per-user CSV progress log.
//!
//! Landmarks come from a replayed tracker recording (JSON Lines) or a
//! seeded simulated hand.

mod cli;
mod error;
mod exercise;
mod hand;
mod session;

use clap::Parser;
use cli::{Display, InputHandler, LiveView};
use hand::{write_recording, ReplaySource, Sample, SimulatedSource};
use session::driver::NullObserver;
use session::{
    read_history, CsvProgressLog, DebouncePolicy, MemoryLog, ProgressLog, SessionConfig,
    SessionContext, SessionDriver,
};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "hand-coach")]
#[command(about = "Guided hand therapy exercises with gesture scoring and rep counting")]
struct Args {
    /// Patient name (progress is logged to <data-dir>/<username>.csv)
    #[arg(short, long)]
    username: Option<String>,

    /// Directory holding progress logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Session configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a landmark recording (JSON Lines) instead of simulating
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Frames produced by the simulated hand
    #[arg(long, default_value = "3000")]
    simulate_frames: usize,

    /// Seed for the simulated hand
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Simulated tracking jitter (normalized units)
    #[arg(long, default_value = "0.004")]
    jitter: f32,

    /// Probability that a simulated frame loses the hand
    #[arg(long, default_value = "0.05")]
    dropout: f64,

    /// Frames the simulated hand spends on each key pose
    #[arg(long, default_value = "20")]
    pose_frames: usize,

    /// Save the frames fed to this session as a recording
    #[arg(long)]
    record: Option<PathBuf>,

    /// Repetitions per exercise (overrides the config file)
    #[arg(short, long)]
    target_reps: Option<u32>,

    /// Count every above-threshold frame, then skip this many frames
    #[arg(long)]
    cooldown: Option<u32>,

    /// Mirror replayed landmarks horizontally
    #[arg(long)]
    mirror: bool,

    /// Milliseconds per frame in the live view
    #[arg(long, default_value = "30")]
    frame_ms: u64,

    /// Run without the live view
    #[arg(long)]
    headless: bool,

    /// Do not write the progress log
    #[arg(long)]
    dry_run: bool,

    /// Show logged progress for the user and exit
    #[arg(long)]
    history: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Config file (if any) with command-line overrides applied
fn build_config(args: &Args) -> Result<SessionConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(target) = args.target_reps {
        config.set_target_reps(target);
    }
    if let Some(samples) = args.cooldown {
        config.debounce = DebouncePolicy::Cooldown { samples };
    }
    if args.mirror {
        config.mirror = true;
    }

    Ok(config)
}

/// Build the sample stream, saving it first when `--record` is given
fn open_source(
    args: &Args,
    config: &SessionConfig,
) -> Result<Box<dyn Iterator<Item = Sample>>, Box<dyn Error>> {
    let source: Box<dyn Iterator<Item = Sample>> = match &args.replay {
        Some(path) => {
            let replay = ReplaySource::load(path)?.mirrored(config.mirror);
            log::info!("replaying {} frames from {:?}", replay.len(), path);
            Box::new(replay)
        }
        None => Box::new(
            SimulatedSource::new(args.seed, args.simulate_frames)
                .with_jitter(args.jitter)
                .with_dropout(args.dropout)
                .with_frames_per_pose(args.pose_frames),
        ),
    };

    match &args.record {
        Some(path) => {
            let frames: Vec<Sample> = source.collect();
            let written = write_recording(BufWriter::new(File::create(path)?), &frames)?;
            log::info!("recorded {} frames to {:?}", written, path);
            Ok(Box::new(frames.into_iter()))
        }
        None => Ok(source),
    }
}

fn show_history(config: &SessionConfig) -> Result<(), Box<dyn Error>> {
    let path = CsvProgressLog::new(&config.data_dir).user_path(&config.username)?;
    if !path.exists() {
        println!("No progress logged yet for {}", config.username);
        return Ok(());
    }
    let rows = read_history(&path)?;
    Display::new().show_history(&config.username, &rows)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }),
    )
    .format_timestamp_millis()
    .init();

    let config = build_config(&args)?;
    let definitions = config.definitions()?;

    if args.history {
        return show_history(&config);
    }

    let progress_log: Box<dyn ProgressLog> = if args.dry_run {
        Box::new(MemoryLog::default())
    } else {
        let csv_log = CsvProgressLog::new(&config.data_dir);
        // fail before the session starts rather than on the first rep
        csv_log.user_path(&config.username)?;
        Box::new(csv_log)
    };

    println!("Hand Therapy Coach v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Patient: {} | Exercises: {} | Log: {}",
        config.username,
        definitions.len(),
        if args.dry_run {
            "disabled".to_string()
        } else {
            config.data_dir.display().to_string()
        }
    );

    let source = open_source(&args, &config)?;
    let mut ctx = SessionContext::new(config.username.clone(), progress_log);
    let driver = SessionDriver::with_policy(definitions, config.debounce);

    let (report, mut display) = if args.headless {
        (driver.run(source, &mut ctx, &mut NullObserver), Display::new())
    } else {
        let mut display = Display::new();
        display.enter_live()?;
        let mut live = LiveView::new(
            display,
            InputHandler::with_timeout(Duration::from_millis(args.frame_ms)),
            config.countdown_secs,
        );
        let report = driver.run(source, &mut ctx, &mut live);
        (report, live.into_display())
    };
    display.shutdown()?;

    // Summary
    if report.stopped {
        println!("\nSession ended early.");
    } else if report.summary.completed() {
        println!("\nTherapy session completed. Well done!");
    } else if report.source_exhausted {
        println!("\nNo more frames: session finished with partial results.");
    }
    display.show_summary(&report.summary)?;
    println!(
        "Frames: {} ({} without a hand) | Reps: {} | Logged entries: {}",
        report.frames_seen,
        report.frames_without_hand,
        report.summary.total_reps(),
        report.entries.len()
    );

    Ok(())
}
