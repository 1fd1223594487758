//! Input model: editor modes, mouse buttons, and the stroke gesture machine.
//!
//! `Mode` is the toolbar toggle (draw vs. select). `InputState` tracks the
//! gesture between pointer-down and pointer-up and carries the points of the
//! stroke being drawn until it is committed on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::MIN_SEGMENT_PX;
use crate::geom::Point;

/// Toolbar mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pointer drags do nothing (default).
    #[default]
    Select,
    /// Pointer drags lay down ink.
    Draw,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing {
        /// Points collected so far, in canvas pixels.
        points: Vec<Point>,
    },
}

impl InputState {
    /// Start a stroke at `at`.
    #[must_use]
    pub fn start(at: Point) -> Self {
        Self::Drawing { points: vec![at] }
    }

    /// Extend the active stroke. Returns the new segment when one was added.
    pub fn extend(&mut self, to: Point) -> Option<(Point, Point)> {
        let Self::Drawing { points } = self else {
            return None;
        };
        let last = *points.last()?;
        if last.distance(to) < MIN_SEGMENT_PX {
            return None;
        }
        points.push(to);
        Some((last, to))
    }

    /// End the gesture, returning the collected points if a stroke was active.
    pub fn finish(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(self) {
            Self::Drawing { points } => Some(points),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
