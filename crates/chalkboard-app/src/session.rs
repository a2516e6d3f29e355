//! Script replay.

use chalkboard_core::{Command, ConfigError, ExportError, Whiteboard, WhiteboardConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read script {path:?}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid script {path:?}: {source}")]
    ParseScript {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Replay a whiteboard session script and export the canvas.
#[derive(Parser, Debug)]
#[command(name = "chalkboard", about = "Replay a whiteboard session and export it as PNG")]
pub struct CliArgs {
    /// JSON array of session commands.
    #[arg(value_name = "SCRIPT.json")]
    pub script: PathBuf,

    /// PNG file written after the script finishes.
    #[arg(short, long, default_value = "board.png", value_name = "FILE")]
    pub output: PathBuf,

    /// JSON configuration file (canvas size, background, history limit).
    #[arg(short, long, value_name = "CONFIG.json")]
    pub config: Option<PathBuf>,
}

/// Read a command script.
pub fn load_script(path: &Path) -> Result<Vec<Command>, AppError> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| AppError::ParseScript {
        path: path.to_path_buf(),
        source,
    })
}

pub fn run(args: &CliArgs) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => WhiteboardConfig::load(path)?,
        None => WhiteboardConfig::default(),
    };
    let commands = load_script(&args.script)?;
    log::info!(
        "Replaying {} commands on a {}x{} canvas",
        commands.len(),
        config.width,
        config.height
    );

    let mut board = Whiteboard::from_config(&config)?;
    for command in commands {
        board.apply(command)?;
    }
    log::debug!(
        "Session finished with {} undo and {} redo states",
        board.history().undo_len(),
        board.history().redo_len()
    );

    board.export_png(&args.output)?;
    Ok(())
}
