//! String-keyed engine registry.
//!
//! The host locates OCR engines through an explicit map from identifier to
//! factory, populated at process start. Lookup of an unregistered kind fails
//! loudly with [`OcrError::UnknownEngine`]; there is no implicit coupling
//! between an options type and its engine beyond the one `register` call.

use crate::core::config::AcceleratorOptions;
use crate::core::errors::{OcrError, OcrResult};
use crate::core::traits::OcrEngine;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Construction inputs a factory receives from the host.
pub struct EngineInit<'a> {
    /// Whether the engine should actually run. A disabled engine is built
    /// without touching its backend and passes pages through unchanged.
    pub enabled: bool,
    /// The host's artifacts root, if it manages one.
    pub artifacts_path: Option<&'a Path>,
    /// Raw engine options; each factory deserializes against its own schema
    /// and rejects unknown fields.
    pub options: &'a serde_json::Value,
    /// Host accelerator settings.
    pub accelerator: &'a AcceleratorOptions,
}

/// Builds an engine from host inputs.
pub type EngineFactory = fn(&EngineInit<'_>) -> OcrResult<Box<dyn OcrEngine>>;

/// Registry of OCR engine factories keyed by kind string.
#[derive(Debug, Default)]
pub struct OcrEngineRegistry {
    factories: BTreeMap<&'static str, EngineFactory>,
}

impl OcrEngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: &'static str, factory: EngineFactory) {
        if self.factories.insert(kind, factory).is_some() {
            warn!("replacing OCR engine registration for '{kind}'");
        }
    }

    /// The registered kinds, in sorted order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Builds the engine registered under `kind`.
    ///
    /// # Errors
    ///
    /// [`OcrError::UnknownEngine`] when no factory is registered under
    /// `kind`; otherwise whatever the factory reports (invalid options,
    /// capability unavailable).
    pub fn create(&self, kind: &str, init: &EngineInit<'_>) -> OcrResult<Box<dyn OcrEngine>> {
        let factory = self.factories.get(kind).ok_or_else(|| OcrError::UnknownEngine {
            kind: kind.to_string(),
            known: self.kinds().iter().map(|k| k.to_string()).collect(),
        })?;
        factory(init)
    }
}

/// The plugin's entry point: a registry pre-populated with every engine this
/// crate provides.
pub fn ocr_engines() -> OcrEngineRegistry {
    let mut registry = OcrEngineRegistry::new();
    registry.register(
        crate::core::config::SuryaOcrOptions::KIND,
        crate::pipeline::ocr::suryaocr_engine_factory,
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_fails_loudly_with_known_kinds() {
        let registry = ocr_engines();
        let init = EngineInit {
            enabled: false,
            artifacts_path: None,
            options: &serde_json::Value::Null,
            accelerator: &AcceleratorOptions::default(),
        };
        let err = registry.create("tesseract", &init).unwrap_err();
        match err {
            OcrError::UnknownEngine { kind, known } => {
                assert_eq!(kind, "tesseract");
                assert_eq!(known, vec!["suryaocr".to_string()]);
            }
            other => panic!("expected UnknownEngine, got {other:?}"),
        }
    }
}
