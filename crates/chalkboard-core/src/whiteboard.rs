//! Whiteboard session: tools, history and canvas wired to input.

use crate::canvas::{Canvas, CanvasError, RasterCanvas, Snapshot, check_dimensions};
use crate::color::{ColorError, ColorInput, ColorMirror, Rgb};
use crate::config::{ConfigError, WhiteboardConfig};
use crate::export::{self, ExportError};
use crate::history::HistoryStore;
use crate::input::{GestureEvent, PointerEvent, PointerTranslator};
use crate::shapes::Shape;
use crate::tools::{ToolController, ToolError, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A UI command or input event, as recorded in session scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SelectTool { tool: String },
    SetColor { color: ColorInput },
    SetFill { fill: bool },
    Undo,
    Redo,
    Gesture { event: GestureEvent },
    Pointer { event: PointerEvent },
    /// Canvas position in client coordinates, for touch translation.
    CanvasOrigin { origin: Point },
    Resize { width: u32, height: u32 },
    Export { path: PathBuf },
}

/// One drawing session.
#[derive(Debug, Clone)]
pub struct Whiteboard<C: Canvas = RasterCanvas> {
    tools: ToolController,
    history: HistoryStore,
    canvas: C,
    pointer: PointerTranslator,
}

impl Whiteboard<RasterCanvas> {
    /// Create a session with an in-memory canvas.
    pub fn from_config(config: &WhiteboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let background = config.background_color()?;
        let mut tools = ToolController::with_background(background);
        tools.current_color = config.initial_color()?;

        Ok(Self::new(
            RasterCanvas::new(config.width, config.height, background),
            tools,
            HistoryStore::with_limit(config.history_limit),
        ))
    }
}

impl<C: Canvas> Whiteboard<C> {
    pub fn new(canvas: C, tools: ToolController, history: HistoryStore) -> Self {
        Self {
            tools,
            history,
            canvas,
            pointer: PointerTranslator::default(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Begin a gesture at a canvas-local point.
    pub fn gesture_start(&mut self, point: Point) {
        self.tools
            .on_gesture_start(point, &mut self.history, &self.canvas);
    }

    pub fn gesture_move(&mut self, point: Point) {
        self.tools.on_gesture_move(point, &mut self.canvas);
    }

    /// Finish the gesture; returns the shape drawn by a discrete tool.
    pub fn gesture_end(&mut self, point: Point) -> Option<Shape> {
        self.tools
            .on_gesture_end(point, &mut self.history, &mut self.canvas)
    }

    pub fn gesture_abort(&mut self) {
        self.tools.on_gesture_abort();
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Start { position } => self.gesture_start(position),
            GestureEvent::Move { position } => self.gesture_move(position),
            GestureEvent::End { position } => {
                self.gesture_end(position);
            }
            GestureEvent::Abort => self.gesture_abort(),
        }
    }

    /// Translate a raw pointer event and feed it to the tools.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(gesture) = self.pointer.translate(event) {
            self.handle_gesture(gesture);
        }
    }

    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.pointer.set_canvas_origin(origin);
    }

    pub fn select_tool(&mut self, name: &str) -> Result<ToolKind, ToolError> {
        self.tools.select_tool_by_name(name)
    }

    pub fn set_color(&mut self, input: &ColorInput) -> Result<Rgb, ColorError> {
        self.tools.set_color(input)
    }

    /// Values the color widgets should display.
    pub fn color_mirror(&self) -> ColorMirror {
        ColorMirror::from(self.tools.current_color)
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.tools.set_fill(fill);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.canvas)
    }

    /// Change canvas dimensions. Existing snapshots keep their old size.
    ///
    /// Zero or oversized dimensions leave the canvas untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if let Err(e) = check_dimensions(width, height) {
            log::warn!("Ignoring canvas resize: {}", e);
            return Err(e);
        }
        self.canvas.resize(width, height);
        Ok(())
    }

    /// Current raster.
    pub fn snapshot(&self) -> Snapshot {
        self.canvas.get_pixels()
    }

    /// Export the current raster as a PNG file. History is untouched.
    pub fn export_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        export::write_png(&self.canvas.get_pixels(), path)
    }

    /// Apply a scripted command.
    ///
    /// Invalid tool names, colors and canvas sizes are ignored; only export
    /// can fail.
    pub fn apply(&mut self, command: Command) -> Result<(), ExportError> {
        match command {
            Command::SelectTool { tool } => {
                let _ = self.select_tool(&tool);
            }
            Command::SetColor { color } => {
                let _ = self.set_color(&color);
            }
            Command::SetFill { fill } => self.set_fill(fill),
            Command::Undo => {
                if !self.undo() {
                    log::debug!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.redo() {
                    log::debug!("Nothing to redo");
                }
            }
            Command::Gesture { event } => self.handle_gesture(event),
            Command::Pointer { event } => self.handle_pointer(event),
            Command::CanvasOrigin { origin } => self.set_canvas_origin(origin),
            Command::Resize { width, height } => {
                let _ = self.resize(width, height);
            }
            Command::Export { path } => self.export_png(path)?,
        }
        Ok(())
    }
}
