//! Chalkboard Application
//!
//! Headless session driver: replays a recorded command script against a
//! whiteboard and exports the result.

mod session;

pub use session::{AppError, CliArgs, load_script, run};
