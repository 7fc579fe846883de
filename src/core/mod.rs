//! Core building blocks: error handling, configuration, the engine
//! registry, and the collaborator traits the engine is written against.

pub mod config;
pub mod errors;
pub mod registry;
pub mod traits;

pub use config::{AcceleratorOptions, DebugConfig, Device, SuryaOcrOptions};
pub use errors::{OcrError, OcrResult};
pub use registry::{EngineFactory, EngineInit, OcrEngineRegistry, ocr_engines};
pub use traits::{CellSink, OcrEngine, PageBackend, RegionSelector};
