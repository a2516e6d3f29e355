//! Chalkboard Core Library
//!
//! Drawing tools, snapshot-based undo/redo and an in-memory raster canvas
//! for the Chalkboard whiteboard.

pub mod canvas;
pub mod color;
pub mod config;
pub mod export;
pub mod history;
pub mod input;
pub mod shapes;
pub mod tools;
pub mod whiteboard;

pub use canvas::{Canvas, CanvasError, RasterCanvas, Snapshot, check_dimensions};
pub use color::{ColorError, ColorInput, ColorMirror, Rgb};
pub use config::{ConfigError, WhiteboardConfig};
pub use export::{ExportError, encode_png, write_png};
pub use history::{DEFAULT_HISTORY_LIMIT, HistoryStore};
pub use input::{GestureEvent, PointerEvent, PointerKind, PointerTranslator};
pub use shapes::Shape;
pub use tools::{DrawStyle, Gesture, ToolController, ToolError, ToolKind, ToolState};
pub use whiteboard::{Command, Whiteboard};
