//! Terminal Polytris runner (default binary).
//!
//! Reads the configuration, installs the file logger, then drives a
//! [`Session`] from crossterm input and the session's gravity timer.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use log::{info, LevelFilter};

use polytris::engine::Session;
use polytris::input::{handle_key_event, is_press, should_quit};
use polytris::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use polytris::types::GameConfig;

/// Poll timeout when no gravity timer is running (game over).
const IDLE_POLL: Duration = Duration::from_millis(250);

/// How long the "LEVEL n" banner stays up.
const LEVEL_BANNER: Duration = Duration::from_millis(1500);

/// Falling blocks with a new set of pieces every round
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with game settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed (defaults to POLYTRIS_SEED, then the clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Where log lines go; the terminal itself is in raw mode
    #[arg(long, default_value = "polytris.log")]
    log_file: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(args.config.as_ref())?;
    let seed = args
        .seed
        .or_else(|| std::env::var("POLYTRIS_SEED").ok()?.trim().parse().ok())
        .unwrap_or_else(clock_seed);
    info!(
        "starting {}x{} board with {} piece types (seed {})",
        config.cols, config.rows, config.shape_type_count, seed
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(args: &Args) -> Result<()> {
    let file = fern::log_file(&args.log_file)
        .with_context(|| format!("opening log file {}", args.log_file.display()))?;
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(args.log_level)
        .chain(file)
        .apply()?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let base = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    let config = base.with_env_overrides();
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(term: &mut TerminalRenderer, config: GameConfig, seed: u64) -> Result<()> {
    let mut session = Session::try_new(config, seed, Instant::now())?;
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut banner: Option<(u32, Instant)> = None;

    loop {
        let now = Instant::now();
        if banner.is_some_and(|(_, since)| now.duration_since(since) >= LEVEL_BANNER) {
            banner = None;
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let overlay = Overlay {
            level_banner: banner.map(|(level, _)| level),
            ..Overlay::default()
        };
        view.render_into(&session.snapshot(), &overlay, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next gravity tick.
        let mut timeout = session.time_until_tick(now).unwrap_or(IDLE_POLL);
        if let Some((_, since)) = banner {
            timeout = timeout.min(LEVEL_BANNER.saturating_sub(now.duration_since(since)));
        }

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if is_press(&key) => {
                    if should_quit(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.apply(action, Instant::now());
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        session.poll_tick(Instant::now());

        if let Some(event) = session.take_last_event() {
            if event.leveled_up() {
                banner = Some((event.level_after, Instant::now()));
            }
        }
    }
}
