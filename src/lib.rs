//! # SuryaOCR plugin
//!
//! An OCR engine plugin for document-conversion pipelines, backed by the
//! pre-built SuryaOCR model suite. The host locates the engine through a
//! string-keyed registry under the identifier `"suryaocr"`; the engine then
//! turns pages into text cells by rendering candidate regions at an upscale,
//! handing them to the recognition suite, and mapping the suite's
//! image-local output boxes back into page coordinates.
//!
//! ## Components
//!
//! - **Registry**: explicit map from engine identifier to factory, failing
//!   loudly on unknown kinds
//! - **Engine**: lazy page-stream processing with per-page region selection
//!   and a running cell index
//! - **Capability**: the external detection + recognition suite behind a
//!   fixed call contract, initialized once at engine construction
//! - **Artifacts**: explicit model storage resolution and download, no
//!   process-environment coupling
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, registry, and collaborator traits
//! * [`domain`] - Page-space geometry, pages, and text cells
//! * [`models`] - The recognition capability and its provider
//! * [`pipeline`] - The engine and default region/cell policies
//! * [`utils`] - Debug visualization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use suryaocr_plugin::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ocr_engines();
//! let accelerator = AcceleratorOptions::default();
//! let options = serde_json::json!({ "lang": ["en"] });
//!
//! let engine = registry.create(
//!     SuryaOcrOptions::KIND,
//!     &EngineInit {
//!         enabled: true,
//!         artifacts_path: None,
//!         options: &options,
//!         accelerator: &accelerator,
//!     },
//! )?;
//!
//! let pages: Vec<Page> = Vec::new(); // supplied by the host pipeline
//! for page in engine.process_pages(Box::new(pages.into_iter())) {
//!     println!("page {}: {} cells", page.page_no, page.cells.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod models;
pub mod pipeline;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Included items cover the common host-side tasks: building the registry,
/// constructing the engine, and consuming its output.
pub mod prelude {
    pub use crate::core::config::{AcceleratorOptions, DebugConfig, Device, SuryaOcrOptions};
    pub use crate::core::errors::{OcrError, OcrResult};
    pub use crate::core::registry::{EngineInit, OcrEngineRegistry, ocr_engines};
    pub use crate::core::traits::{CellSink, OcrEngine, PageBackend, RegionSelector};
    pub use crate::domain::{Page, Rect, TextCell};
    pub use crate::pipeline::{BitmapRegionSelector, OverlapCellSink, SuryaOcrModel};
}
