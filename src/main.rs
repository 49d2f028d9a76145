use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use pixel_survivor::config::GameConfig;
use pixel_survivor::display;
use pixel_survivor::game::Game;
use pixel_survivor::platform::SystemClock;
use pixel_survivor::save::SaveManager;
use pixel_survivor::terminal::{spawn_event_reader, TerminalInput, TerminalRenderer, Viewport};

/// Top-down arcade survival shooter in the terminal.
#[derive(Parser, Debug)]
#[command(name = "pixel_survivor", version, about)]
struct Args {
    /// Game configuration document
    #[arg(long, default_value = "config/settings.json")]
    config: PathBuf,

    /// Directory holding the save file
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Log output; stdout is the game screen
    #[arg(long, default_value = "pixel_survivor.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Config problems are fatal before the terminal is touched.
    let config = GameConfig::load(&args.config)
        .with_context(|| format!("cannot start with config {}", args.config.display()))?;
    let mut game = Game::new(config, SaveManager::new(&args.save_dir))?;
    tracing::info!("Starting {}", game.config.game.title);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = run(&mut out, &mut game);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!("Exited with error: {:#}", e);
    } else {
        tracing::info!("Goodbye");
    }
    result
}

fn run<W: Write>(out: &mut W, game: &mut Game) -> Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / game.config.game.fps.max(1) as f64);
    let (cols, rows) = terminal::size()?;
    let viewport = Viewport::new(cols, rows, game.width(), game.height());

    let mut renderer = TerminalRenderer::new(out, viewport);
    let mut input = TerminalInput::new(spawn_event_reader(), viewport);
    let mut clock = SystemClock::new();
    let mut rng = thread_rng();

    while game.is_running() {
        let frame_start = Instant::now();

        let (cols, rows) = terminal::size()?;
        if (cols, rows) != (renderer.viewport().cols, renderer.viewport().rows) {
            renderer.resize(cols, rows);
            input.set_viewport(renderer.viewport());
        }

        game.frame(&mut input, &mut clock, &mut rng);
        display::render(&mut renderer, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
    Ok(())
}
