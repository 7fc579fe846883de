//! The OCR engine and its default collaborator policies.

pub mod ocr;
pub mod postprocess;
pub mod regions;

pub use ocr::{SuryaOcrModel, suryaocr_engine_factory};
pub use postprocess::OverlapCellSink;
pub use regions::BitmapRegionSelector;
