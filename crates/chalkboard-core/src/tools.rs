//! Tool system for the whiteboard.

use crate::canvas::Canvas;
use crate::color::{ColorError, ColorInput, Rgb};
use crate::history::HistoryStore;
use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Line width used for outlined shapes and thin strokes.
pub const THIN_LINE_WIDTH: u32 = 2;
/// Line width of the marker.
pub const MARKER_LINE_WIDTH: u32 = 10;

/// Tool selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0:?}")]
    UnknownTool(String),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Marker,
    Eraser,
    Ruler,
    Divider,
    Rectangle,
    Square,
    Circle,
    Triangle,
    Quadrilateral,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Pen,
        ToolKind::Marker,
        ToolKind::Eraser,
        ToolKind::Ruler,
        ToolKind::Divider,
        ToolKind::Rectangle,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Quadrilateral,
    ];

    /// Continuous tools paint while the pointer moves; all others draw once on release.
    pub fn is_continuous(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Marker | ToolKind::Eraser)
    }

    /// Lowercase name used by the tool selector.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Marker => "marker",
            ToolKind::Eraser => "eraser",
            ToolKind::Ruler => "ruler",
            ToolKind::Divider => "divider",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Quadrilateral => "quadrilateral",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Style applied to a single draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub stroke_color: Rgb,
    pub line_width: u32,
    /// Fill the primitive instead of outlining it. Ignored for line segments.
    pub filled: bool,
}

impl DrawStyle {
    /// Style for a continuous-tool segment.
    pub fn for_stroke(tool: ToolKind, color: Rgb, background: Rgb) -> Self {
        let stroke_color = if tool == ToolKind::Eraser { background } else { color };
        let line_width = if tool == ToolKind::Marker {
            MARKER_LINE_WIDTH
        } else {
            THIN_LINE_WIDTH
        };
        Self {
            stroke_color,
            line_width,
            filled: false,
        }
    }

    /// Style for a discrete-tool primitive.
    pub fn for_shape(color: Rgb, filled: bool) -> Self {
        Self {
            stroke_color: color,
            line_width: THIN_LINE_WIDTH,
            filled,
        }
    }
}

/// A pointer interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    /// Tool captured when the gesture started.
    pub tool: ToolKind,
    /// Point where the gesture started.
    pub start: Point,
    /// Latest point; for continuous tools, the start of the next segment.
    pub current: Point,
    /// Segments drawn so far.
    pub segments: usize,
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, Default)]
pub enum ToolState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// A gesture is in progress.
    Active(Gesture),
}

/// Holds tool selection and turns gestures into draw calls.
#[derive(Debug, Clone)]
pub struct ToolController {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Color for strokes and shapes.
    pub current_color: Rgb,
    /// Fill shapes instead of outlining them.
    pub fill_shape: bool,
    /// Canvas background, painted by the eraser.
    pub background: Rgb,
    /// Current state of the interaction.
    pub state: ToolState,
}

impl Default for ToolController {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_color: Rgb::BLACK,
            fill_shape: false,
            background: Rgb::WHITE,
            state: ToolState::default(),
        }
    }
}

impl ToolController {
    /// Create a new tool controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller whose eraser paints `background`.
    pub fn with_background(background: Rgb) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    /// Set the current tool. An active gesture keeps the tool it started with.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Select a tool by its name. Unknown names leave the selection unchanged.
    pub fn select_tool_by_name(&mut self, name: &str) -> Result<ToolKind, ToolError> {
        match name.parse::<ToolKind>() {
            Ok(tool) => {
                self.select_tool(tool);
                Ok(tool)
            }
            Err(e) => {
                log::warn!("Ignoring tool selection: {}", e);
                Err(e)
            }
        }
    }

    /// Set the current color. Malformed input leaves the color unchanged.
    pub fn set_color(&mut self, input: &ColorInput) -> Result<Rgb, ColorError> {
        match input.resolve() {
            Ok(color) => {
                self.current_color = color;
                Ok(color)
            }
            Err(e) => {
                log::warn!("Ignoring color change: {}", e);
                Err(e)
            }
        }
    }

    /// Toggle filled rendering for shape tools.
    pub fn set_fill(&mut self, fill: bool) {
        self.fill_shape = fill;
    }

    /// Check if a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::Active(_))
    }

    /// The gesture in progress, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            ToolState::Active(gesture) => Some(gesture),
            ToolState::Idle => None,
        }
    }

    /// Style for a continuous-tool segment with the current selection.
    pub fn stroke_style(&self, tool: ToolKind) -> DrawStyle {
        DrawStyle::for_stroke(tool, self.current_color, self.background)
    }

    /// Style for a discrete-tool primitive with the current selection.
    pub fn shape_style(&self) -> DrawStyle {
        DrawStyle::for_shape(self.current_color, self.fill_shape)
    }

    /// Begin a gesture at `point`.
    ///
    /// Continuous tools snapshot the canvas here so the whole stroke undoes
    /// as one step. A start while another gesture is active is ignored.
    pub fn on_gesture_start<C: Canvas>(
        &mut self,
        point: Point,
        history: &mut HistoryStore,
        canvas: &C,
    ) {
        if self.is_drawing() {
            log::debug!("Ignoring gesture start at {:?}: gesture already active", point);
            return;
        }

        let tool = self.current_tool;
        if tool.is_continuous() {
            history.snapshot(canvas);
        }

        self.state = ToolState::Active(Gesture {
            tool,
            start: point,
            current: point,
            segments: 0,
        });
    }

    /// Advance the gesture to `point`, drawing a segment for continuous tools.
    pub fn on_gesture_move<C: Canvas>(&mut self, point: Point, canvas: &mut C) {
        let style = match self.gesture() {
            Some(gesture) if gesture.tool.is_continuous() => Some(self.stroke_style(gesture.tool)),
            Some(_) => None,
            None => return,
        };

        if let ToolState::Active(gesture) = &mut self.state {
            if let Some(style) = style {
                canvas.stroke_line(gesture.current, point, &style);
                gesture.segments += 1;
            }
            gesture.current = point;
        }
    }

    /// Finish the gesture at `point`.
    ///
    /// Discrete tools snapshot the canvas and draw their shape here. Returns
    /// the shape that was drawn, if any.
    pub fn on_gesture_end<C: Canvas>(
        &mut self,
        point: Point,
        history: &mut HistoryStore,
        canvas: &mut C,
    ) -> Option<Shape> {
        let ToolState::Active(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };

        if gesture.tool.is_continuous() {
            log::debug!("{} stroke finished with {} segments", gesture.tool, gesture.segments);
            return None;
        }

        let shape = Shape::derive(gesture.tool, gesture.start, point)?;
        history.snapshot(&*canvas);
        canvas.draw_shape(&shape, &self.shape_style());
        Some(shape)
    }

    /// Abandon the gesture without drawing.
    pub fn on_gesture_abort(&mut self) {
        if let ToolState::Active(gesture) = std::mem::take(&mut self.state) {
            log::debug!("{} gesture aborted", gesture.tool);
        }
    }

    /// Shape a discrete gesture would draw if released at its current point.
    pub fn preview_shape(&self) -> Option<Shape> {
        let gesture = self.gesture()?;
        Shape::derive(gesture.tool, gesture.start, gesture.current)
    }
}
