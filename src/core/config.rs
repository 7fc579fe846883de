//! Configuration surface for the plugin.
//!
//! Engine options are deserialized from the host's raw JSON payload with
//! unknown fields rejected, so a typo in a host configuration fails loudly
//! at engine construction instead of being silently ignored.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options for the SuryaOCR engine.
///
/// `kind` is not a field: the identifier lives in [`SuryaOcrOptions::KIND`]
/// and the registry key, and the two must stay equal. See
/// [`crate::core::registry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuryaOcrOptions {
    /// Languages to recognize. Passed through to the model suite.
    pub lang: Vec<String>,
    /// Whether to run inference on the GPU. `None` selects automatically
    /// based on [`AcceleratorOptions::device`].
    pub use_gpu: Option<bool>,
    /// Overrides the directory the model suite is stored in.
    pub model_storage_directory: Option<PathBuf>,
    /// Whether missing model artifacts may be fetched over the network.
    pub download_enabled: bool,
}

impl SuryaOcrOptions {
    /// Engine identifier. Must equal the key the factory is registered
    /// under; the host locates the engine by this string.
    pub const KIND: &'static str = "suryaocr";
}

impl Default for SuryaOcrOptions {
    fn default() -> Self {
        Self {
            lang: vec!["en".to_string()],
            use_gpu: None,
            model_storage_directory: None,
            download_enabled: true,
        }
    }
}

/// Compute device selection for the recognition sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// Prefer the GPU when an execution provider can be registered,
    /// falling back to CPU at runtime.
    #[default]
    Auto,
    /// CPU only.
    Cpu,
    /// CUDA execution provider.
    Cuda,
}

/// Host-level accelerator settings, shared by all engines the host builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratorOptions {
    /// Device preference.
    pub device: Device,
    /// Intra-op thread count for the inference sessions.
    pub num_threads: usize,
}

impl Default for AcceleratorOptions {
    fn default() -> Self {
        Self {
            device: Device::Auto,
            num_threads: 4,
        }
    }
}

impl AcceleratorOptions {
    /// Resolves the effective GPU preference for an engine.
    ///
    /// An explicit `use_gpu` in the engine options wins; otherwise `Auto`
    /// and `Cuda` attempt the GPU and `Cpu` does not.
    pub fn wants_gpu(&self, use_gpu: Option<bool>) -> bool {
        use_gpu.unwrap_or(!matches!(self.device, Device::Cpu))
    }
}

/// Debug/visualization switches.
///
/// Disabled by default; when `visualize_ocr` is set the engine writes one
/// PNG per processed page under `output_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Render OCR regions and emitted cells for inspection.
    pub visualize_ocr: bool,
    /// Where visualization output is written.
    pub output_dir: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            visualize_ocr: false,
            output_dir: PathBuf::from("debug"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults_match_documented_values() {
        let options = SuryaOcrOptions::default();
        assert_eq!(options.lang, vec!["en".to_string()]);
        assert_eq!(options.use_gpu, None);
        assert!(options.model_storage_directory.is_none());
        assert!(options.download_enabled);
    }

    #[test]
    fn options_reject_unknown_fields() {
        let result: Result<SuryaOcrOptions, _> =
            serde_json::from_value(serde_json::json!({ "lang": ["en"], "turbo": true }));
        assert!(result.is_err());
    }

    #[test]
    fn options_deserialize_partial_payload() {
        let options: SuryaOcrOptions =
            serde_json::from_value(serde_json::json!({ "use_gpu": false })).unwrap();
        assert_eq!(options.use_gpu, Some(false));
        assert_eq!(options.lang, vec!["en".to_string()]);
        assert!(options.download_enabled);
    }

    #[test]
    fn gpu_preference_resolution() {
        let auto = AcceleratorOptions::default();
        assert!(auto.wants_gpu(None));
        assert!(!auto.wants_gpu(Some(false)));

        let cpu = AcceleratorOptions {
            device: Device::Cpu,
            ..AcceleratorOptions::default()
        };
        assert!(!cpu.wants_gpu(None));
        assert!(cpu.wants_gpu(Some(true)));
    }
}
