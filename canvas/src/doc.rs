//! Stroke document: the ordered annotation layer above the background.
//!
//! Strokes are append-only and removed strictly last-in first-out, so the
//! store is a plain `Vec`. The JSON form (`{"strokes":[{"points":[..]}]}`) is
//! what the CLI reads annotation scripts from; stroke ids are optional on input
//! and generated when absent.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// One freehand stroke in canvas pixels. Color and width are fixed editor-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default = "Uuid::new_v4")]
    pub id: StrokeId,
    pub points: Vec<Point>,
}

impl Stroke {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { id: Uuid::new_v4(), points }
    }

    /// Consecutive point pairs. A single-point stroke yields one zero-length segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let single = (self.points.len() == 1).then(|| (self.points[0], self.points[0]));
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(single)
    }
}

/// Ordered stroke list, bottom first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDoc {
    #[serde(default)]
    strokes: Vec<Stroke>,
}

impl AnnotationDoc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke on top. Strokes without points are ignored.
    pub fn push(&mut self, stroke: Stroke) -> bool {
        if stroke.points.is_empty() {
            return false;
        }
        self.strokes.push(stroke);
        true
    }

    /// Remove the most recently added stroke.
    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Parse a stroke document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(text)?;
        doc.strokes.retain(|s| !s.points.is_empty());
        Ok(doc)
    }

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
