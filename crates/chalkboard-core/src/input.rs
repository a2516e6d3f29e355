//! Pointer event translation into canvas-local gestures.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Source of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Positions are offsets relative to the canvas already.
    #[default]
    Mouse,
    /// Positions are client (viewport) coordinates of the first touch point.
    Touch,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        kind: PointerKind,
    },
    Move {
        position: Point,
        #[serde(default)]
        kind: PointerKind,
    },
    /// Release. Mouse-up and touch-end carry no reliable position.
    Up,
    /// Pointer left the canvas.
    Leave,
    /// Touch sequence cancelled by the platform.
    Cancel,
}

/// Gesture events in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Start { position: Point },
    Move { position: Point },
    End { position: Point },
    Abort,
}

/// Translates pointer events into gestures.
#[derive(Debug, Clone, Default)]
pub struct PointerTranslator {
    /// Top-left of the canvas in client coordinates.
    pub canvas_origin: Point,
    /// Last canvas-local position seen.
    last_position: Option<Point>,
}

impl PointerTranslator {
    pub fn new(canvas_origin: Point) -> Self {
        Self {
            canvas_origin,
            last_position: None,
        }
    }

    /// Update the canvas origin after layout changes.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    fn to_canvas(&self, position: Point, kind: PointerKind) -> Point {
        match kind {
            PointerKind::Mouse => position,
            PointerKind::Touch => position - self.canvas_origin.to_vec2(),
        }
    }

    /// Convert a pointer event. Returns `None` for events that carry no gesture.
    pub fn translate(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        match event {
            PointerEvent::Down { position, kind } => {
                let position = self.to_canvas(position, kind);
                self.last_position = Some(position);
                Some(GestureEvent::Start { position })
            }
            PointerEvent::Move { position, kind } => {
                let position = self.to_canvas(position, kind);
                self.last_position = Some(position);
                Some(GestureEvent::Move { position })
            }
            PointerEvent::Up => self
                .last_position
                .take()
                .map(|position| GestureEvent::End { position }),
            PointerEvent::Leave | PointerEvent::Cancel => {
                self.last_position = None;
                Some(GestureEvent::Abort)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_positions_pass_through() {
        let mut translator = PointerTranslator::new(Point::new(100.0, 50.0));
        let event = PointerEvent::Down {
            position: Point::new(10.0, 20.0),
            kind: PointerKind::Mouse,
        };
        assert_eq!(
            translator.translate(event),
            Some(GestureEvent::Start {
                position: Point::new(10.0, 20.0)
            })
        );
    }

    #[test]
    fn test_touch_positions_are_translated() {
        let mut translator = PointerTranslator::new(Point::new(100.0, 50.0));
        let event = PointerEvent::Move {
            position: Point::new(130.0, 90.0),
            kind: PointerKind::Touch,
        };
        assert_eq!(
            translator.translate(event),
            Some(GestureEvent::Move {
                position: Point::new(30.0, 40.0)
            })
        );
    }

    #[test]
    fn test_up_ends_at_last_position() {
        let mut translator = PointerTranslator::default();
        translator.translate(PointerEvent::Down {
            position: Point::new(1.0, 1.0),
            kind: PointerKind::Mouse,
        });
        translator.translate(PointerEvent::Move {
            position: Point::new(7.0, 3.0),
            kind: PointerKind::Mouse,
        });
        assert_eq!(
            translator.translate(PointerEvent::Up),
            Some(GestureEvent::End {
                position: Point::new(7.0, 3.0)
            })
        );
        assert_eq!(translator.translate(PointerEvent::Up), None);
    }

    #[test]
    fn test_leave_and_cancel_abort() {
        let mut translator = PointerTranslator::default();
        assert_eq!(translator.translate(PointerEvent::Leave), Some(GestureEvent::Abort));
        assert_eq!(translator.translate(PointerEvent::Cancel), Some(GestureEvent::Abort));
    }

    #[test]
    fn test_deserialize_pointer_event() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"type":"down","position":{"x":3.0,"y":4.0},"kind":"touch"}"#)
                .unwrap();
        assert_eq!(
            event,
            PointerEvent::Down {
                position: Point::new(3.0, 4.0),
                kind: PointerKind::Touch
            }
        );
    }
}
