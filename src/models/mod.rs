//! The recognition capability: the external model suite as the engine
//! consumes it.
//!
//! The suite is opaque to the rest of the crate. The engine holds a boxed
//! [`RecognitionCapability`] obtained exactly once, at construction, from a
//! [`CapabilityProvider`]; a provider that cannot deliver fails with
//! [`crate::core::errors::OcrError::CapabilityUnavailable`] and nothing else
//! in the pipeline is attempted.

pub mod artifacts;
pub mod download;
pub mod surya;

use crate::core::config::{AcceleratorOptions, SuryaOcrOptions};
use crate::core::errors::OcrResult;
use image::RgbImage;
use std::path::Path;

pub use artifacts::{ModelArtifacts, ModelFile};
pub use surya::{SuryaPredictor, SuryaPredictorProvider};

/// One recognized line of text within an input image.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedLine {
    /// `[x0, y0, x1, y1]` in pixels of the input image, top-left origin.
    pub bbox: [f32; 4],
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

/// The recognition result for one input image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionOutput {
    /// Recognized lines in the order the suite produced them.
    pub text_lines: Vec<RecognizedLine>,
}

/// The fixed call contract to the external recognition suite.
///
/// One output per input image, line order preserved. Coordinates are local
/// to each input image, in its own pixel space.
pub trait RecognitionCapability {
    /// Runs detection and recognition over `images`.
    fn recognize(&self, images: &[RgbImage]) -> OcrResult<Vec<RecognitionOutput>>;
}

/// Everything a provider needs to construct a capability.
pub struct CapabilityContext<'a> {
    /// The host's artifacts root, if it manages one.
    pub artifacts_path: Option<&'a Path>,
    /// Engine options.
    pub options: &'a SuryaOcrOptions,
    /// Host accelerator settings.
    pub accelerator: &'a AcceleratorOptions,
}

/// Builds a [`RecognitionCapability`] once, at engine construction.
///
/// Providers defer every heavy or environment-dependent step (artifact
/// resolution, downloads, session construction) to `initialize`, so a
/// disabled engine never touches them.
pub trait CapabilityProvider {
    /// Name of the backend, used in error messages.
    fn backend(&self) -> &'static str;

    /// Constructs the capability.
    fn initialize(&self, ctx: &CapabilityContext<'_>) -> OcrResult<Box<dyn RecognitionCapability>>;
}
