/// cubeview - interactive shaded cube in the terminal
///
/// Controls:
///   - Mouse drag: Turn the cube (on it) or roll it (beside it)
///   - WASD: Quarter turns, Arrow Keys: Small turns
///   - J/L: Roll
///   - N/M: Zoom in/out
///   - O: Orthographic/perspective, C: Coloring, H: Shading
///   - R: Reset, Q/ESC: Quit
use anyhow::{Context, Result};
use cubeview_terminal::{config::DebugConfig, AppConfig, TerminalApp};
use std::fs::File;

fn main() -> Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.debug)?;
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    Ok(())
}

fn init_logging(debug: &DebugConfig) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&debug.log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Some(path) = &debug.log_file {
        let file = File::create(path).with_context(|| format!("failed to create log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("failed to initialize logging")
}
