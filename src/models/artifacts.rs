//! Storage layout for the pre-built model suite.
//!
//! The suite lives in a single directory resolved at capability
//! initialization and passed explicitly to whoever needs it; the plugin
//! never communicates the location through process environment.

use crate::core::errors::{OcrError, OcrResult};
use std::path::{Path, PathBuf};

/// Subdirectory of the cache root the suite is stored under.
const MODEL_REPO_FOLDER: &str = "SuryaOcr";

/// The files the suite consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFile {
    /// Text line detection model.
    Detection,
    /// Text recognition model.
    Recognition,
    /// Character set for decoding recognition output.
    Dictionary,
}

impl ModelFile {
    /// All files required for the suite to load.
    pub const ALL: [ModelFile; 3] = [
        ModelFile::Detection,
        ModelFile::Recognition,
        ModelFile::Dictionary,
    ];

    /// File name within the artifact directory.
    pub fn filename(&self) -> &'static str {
        match self {
            ModelFile::Detection => "det.onnx",
            ModelFile::Recognition => "rec.onnx",
            ModelFile::Dictionary => "dict.txt",
        }
    }
}

impl std::fmt::Display for ModelFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.filename())
    }
}

/// A resolved, existing artifact directory.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    dir: PathBuf,
}

impl ModelArtifacts {
    /// Resolves the artifact directory and creates it if needed.
    ///
    /// Precedence: the engine's `model_storage_directory` override, then the
    /// host's artifacts path, then the user cache directory. The two
    /// fallbacks get a `models/SuryaOcr` suffix; an explicit override is
    /// used as given.
    pub fn resolve(
        storage_override: Option<&Path>,
        artifacts_path: Option<&Path>,
    ) -> OcrResult<Self> {
        let dir = match (storage_override, artifacts_path) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(root)) => root.join("models").join(MODEL_REPO_FOLDER),
            (None, None) => {
                let dirs = directories::ProjectDirs::from("", "", "suryaocr-plugin")
                    .ok_or_else(|| {
                        OcrError::config_error("cannot determine a user cache directory")
                    })?;
                dirs.cache_dir().join("models").join(MODEL_REPO_FOLDER)
            }
        };
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Uses `dir` as the artifact directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> OcrResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The artifact directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one suite file.
    pub fn path(&self, file: ModelFile) -> PathBuf {
        self.dir.join(file.filename())
    }

    /// Whether a suite file is present and non-empty.
    pub fn is_available(&self, file: ModelFile) -> bool {
        std::fs::metadata(self.path(file)).is_ok_and(|m| m.is_file() && m.len() > 0)
    }

    /// The suite files that are missing.
    pub fn missing(&self) -> Vec<ModelFile> {
        ModelFile::ALL
            .into_iter()
            .filter(|f| !self.is_available(*f))
            .collect()
    }

    /// Verifies the full suite is on disk, fetching missing files when
    /// downloads are permitted.
    ///
    /// With downloads disabled, missing files are a capability failure that
    /// names them and where they were expected.
    pub fn ensure_available(&self, download_enabled: bool) -> OcrResult<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        if !download_enabled {
            let names: Vec<&str> = missing.iter().map(|f| f.filename()).collect();
            return Err(OcrError::capability_unavailable(
                "suryaocr",
                format!(
                    "model files {:?} missing from {} and downloads are disabled",
                    names,
                    self.dir.display()
                ),
            ));
        }
        crate::models::download::fetch_files(self, &missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_artifacts_path() {
        let tmp = tempfile::tempdir().unwrap();
        let override_dir = tmp.path().join("custom");
        let artifacts = ModelArtifacts::resolve(Some(&override_dir), Some(tmp.path())).unwrap();
        assert_eq!(artifacts.dir(), override_dir);
        assert!(override_dir.is_dir());
    }

    #[test]
    fn artifacts_path_gets_suite_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = ModelArtifacts::resolve(None, Some(tmp.path())).unwrap();
        assert_eq!(artifacts.dir(), tmp.path().join("models").join("SuryaOcr"));
    }

    #[test]
    fn empty_files_count_as_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = ModelArtifacts::at(tmp.path()).unwrap();
        std::fs::write(artifacts.path(ModelFile::Detection), b"").unwrap();
        std::fs::write(artifacts.path(ModelFile::Dictionary), b"a\nb\n").unwrap();

        assert!(!artifacts.is_available(ModelFile::Detection));
        assert!(artifacts.is_available(ModelFile::Dictionary));
        assert_eq!(
            artifacts.missing(),
            vec![ModelFile::Detection, ModelFile::Recognition]
        );
    }

    #[test]
    fn missing_files_without_downloads_is_capability_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = ModelArtifacts::at(tmp.path()).unwrap();
        let err = artifacts.ensure_available(false).unwrap_err();
        assert!(err.is_capability_unavailable());
        assert!(err.to_string().contains("det.onnx"));
    }
}
