use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::logger::{self, LogSink};
use grid_snake::modes::{CalcMode, RealTimeMode, TurnMode};
use log::{LevelFilter, info};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Terminal Snake with a seedable step engine, plus a calculator")]
struct Cli {
    #[arg(long, value_enum, default_value = "realtime")]
    mode: Mode,

    /// TOML game config (defaults to ./Snake.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Milliseconds per tick in real-time mode
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the Snake modes log nowhere without it
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Expression to evaluate in calc mode; reads stdin lines when absent
    #[arg(long)]
    expr: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Snake advancing on a timer, steered with the keyboard
    Realtime,
    /// Snake that moves one step per key press
    Turn,
    /// Expression calculator
    Calc,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        // A named file has to load; a stray ./Snake.toml only warns
        let mut config = match &self.config {
            Some(path) => {
                GameConfig::load(Some(path.as_path())).context("Failed to load game config")?
            }
            None => GameConfig::load_or_default(None),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }

    fn log_sink(&self) -> LogSink {
        match (&self.log_file, &self.mode) {
            (Some(path), _) => LogSink::File(path.clone()),
            (None, Mode::Calc) => LogSink::Stderr,
            (None, _) => LogSink::Off,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.mode {
        Mode::Calc => LevelFilter::Warn,
        _ => LevelFilter::Info,
    };
    logger::init(&cli.log_sink(), default_level)?;

    match cli.mode {
        Mode::Realtime => {
            let config = cli.game_config()?;
            info!("Starting real-time game: {config:?}");
            RealTimeMode::new(config).run().await?;
        }
        Mode::Turn => {
            let config = cli.game_config()?;
            info!("Starting turn-based game: {config:?}");
            TurnMode::new(config).run().await?;
        }
        Mode::Calc => match &cli.expr {
            Some(expr) => println!("{}", CalcMode::run_once(expr)?),
            None => CalcMode::new().run(io::stdin().lock(), io::stdout().lock())?,
        },
    }

    Ok(())
}
