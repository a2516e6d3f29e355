//! Main application entry point.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Chalkboard");

    let args = chalkboard_app::CliArgs::parse();
    match chalkboard_app::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("chalkboard: {}", e);
            ExitCode::FAILURE
        }
    }
}
