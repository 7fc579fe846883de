//! Collaborator seams between the engine and its host.
//!
//! The engine is written against these traits; the host (or a test) supplies
//! the page source, the region selection policy, and the cell merge policy.
//! Default implementations for the latter two live in [`crate::pipeline`].

use crate::core::errors::OcrResult;
use crate::domain::cells::TextCell;
use crate::domain::geometry::Rect;
use crate::domain::page::Page;
use image::RgbImage;

/// A renderable page source.
pub trait PageBackend {
    /// Whether the source can currently produce images. An invalid source
    /// makes the engine pass the page through unchanged.
    fn is_valid(&self) -> bool;

    /// Renders the page cropped to `cropbox` at `scale` times page
    /// resolution. The returned image is `cropbox` sized in scaled pixels.
    fn page_image(&self, scale: u32, cropbox: &Rect) -> OcrResult<RgbImage>;
}

/// Produces the ordered list of rectangles a page needs OCR on.
pub trait RegionSelector {
    /// Regions requiring OCR, in processing order, in page coordinates.
    fn ocr_regions(&self, page: &Page) -> Vec<Rect>;
}

/// Receives the cells accumulated over one page's OCR pass.
///
/// Merging, deduplication against programmatic text, and ordering are the
/// sink's business; the engine only accumulates and hands off.
pub trait CellSink {
    /// Folds `cells` into the page's text-cell model.
    fn post_process_cells(&self, cells: Vec<TextCell>, page: &mut Page);
}

/// A registered OCR engine, as the host registry sees it.
pub trait OcrEngine: std::fmt::Debug {
    /// The identifier the engine was registered under.
    fn kind(&self) -> &'static str;

    /// Processes a stream of pages.
    ///
    /// The stream is lazy, finite, and single-pass: each page is fully
    /// processed when the consumer pulls it, and no more than one page is
    /// held at a time. A disabled engine yields the input unchanged,
    /// element for element.
    fn process_pages<'a>(
        &'a self,
        pages: Box<dyn Iterator<Item = Page> + 'a>,
    ) -> Box<dyn Iterator<Item = Page> + 'a>;
}
