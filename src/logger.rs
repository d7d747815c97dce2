use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::PathBuf;

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Plain stderr, for modes that do not draw on it
    Stderr,
    /// Log file, truncated on start; used while a TUI owns the terminal
    File(PathBuf),
    /// Discard everything
    Off,
}

/// Install the global logger. `RUST_LOG` overrides `default_level` for the
/// stderr and file sinks.
pub fn init(sink: &LogSink, default_level: LevelFilter) -> Result<()> {
    let mut builder = match sink {
        LogSink::Off => Builder::new(),
        _ => Builder::from_env(Env::default().default_filter_or(default_level.as_str())),
    };

    match sink {
        LogSink::Stderr => {
            builder.target(Target::Stderr);
        }
        LogSink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
            builder.write_style(env_logger::WriteStyle::Never);
        }
        LogSink::Off => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder.try_init().context("Failed to install logger")?;
    Ok(())
}
