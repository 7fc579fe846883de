//! The page model the engine operates on.

use crate::core::traits::PageBackend;
use crate::domain::cells::TextCell;
use crate::domain::geometry::Rect;

/// A single document page moving through the conversion pipeline.
///
/// The engine reads the backing image through `backend`, consults
/// `bitmap_rects` when selecting OCR regions, and accumulates recognized
/// text into `cells`. A page without a backend, or whose backend reports
/// itself invalid, passes through the engine untouched.
pub struct Page {
    /// Zero-based page number within the document.
    pub page_no: usize,
    /// Page width in page units.
    pub width: f32,
    /// Page height in page units.
    pub height: f32,
    /// Handle to the renderable page source, if any.
    pub backend: Option<Box<dyn PageBackend>>,
    /// Rectangles covered by embedded raster resources, in page coordinates.
    pub bitmap_rects: Vec<Rect>,
    /// The page's text-cell model.
    pub cells: Vec<TextCell>,
}

impl Page {
    /// Creates an empty page of the given size with no backend.
    pub fn new(page_no: usize, width: f32, height: f32) -> Self {
        Self {
            page_no,
            width,
            height,
            backend: None,
            bitmap_rects: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Attaches a backend to the page.
    pub fn with_backend(mut self, backend: Box<dyn PageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The page's bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns true when the page has a backend that reports itself valid.
    pub fn has_valid_backend(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.is_valid())
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("page_no", &self.page_no)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_backend", &self.backend.is_some())
            .field("bitmap_rects", &self.bitmap_rects.len())
            .field("cells", &self.cells.len())
            .finish()
    }
}
