//! Text cells: the unit of recognized text placed on a page.

use crate::domain::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single recognized line of text placed at a rectangle in page
/// coordinates.
///
/// `index` is the cell's position within the page's OCR pass: zero-based,
/// strictly sequential across every region processed for that page, and
/// reset for the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    /// Sequence position within the page's OCR-produced cells.
    pub index: usize,
    /// Recognized text.
    pub text: String,
    /// Raw recognized text before any host-side normalization. Identical to
    /// `text` as produced here.
    pub orig: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    /// Marks the cell as OCR-derived rather than extracted programmatically.
    pub from_ocr: bool,
    /// Bounding rectangle in page coordinates.
    pub rect: Rect,
}

impl TextCell {
    /// Creates an OCR-derived cell.
    pub fn from_ocr(index: usize, text: impl Into<String>, confidence: f32, rect: Rect) -> Self {
        let text = text.into();
        Self {
            index,
            orig: text.clone(),
            text,
            confidence,
            from_ocr: true,
            rect,
        }
    }
}
