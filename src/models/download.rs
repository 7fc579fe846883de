//! Fetching missing suite files.
//!
//! Downloads stream to a temp file next to the destination and are renamed
//! into place only after the stream completes, so an interrupted fetch never
//! leaves a half-written model behind. The SHA-256 of every fetched file is
//! logged for postmortem comparison against the suite's published digests.

use crate::core::errors::{OcrError, OcrResult};
use crate::models::artifacts::{ModelArtifacts, ModelFile};
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Where the pre-built suite is published.
const DOWNLOAD_BASE_URL: &str = "https://huggingface.co/suryaocr/suryaocr-onnx/resolve/main";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

fn url_for(file: ModelFile) -> String {
    format!("{DOWNLOAD_BASE_URL}/{}", file.filename())
}

/// Fetches the given suite files into the artifact directory.
pub fn fetch_files(artifacts: &ModelArtifacts, files: &[ModelFile]) -> OcrResult<()> {
    if files.is_empty() {
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| OcrError::download_error("building HTTP client", e))?;

        for &file in files {
            let dest = artifacts.path(file);
            info!("downloading {} from {}", file, url_for(file));
            fetch_one(&client, file, &dest).await?;
        }
        Ok(())
    })
}

async fn fetch_one(client: &reqwest::Client, file: ModelFile, dest: &Path) -> OcrResult<()> {
    let url = url_for(file);
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| OcrError::download_error(format!("requesting {url}"), e))?;

    if !response.status().is_success() {
        return Err(OcrError::Download {
            context: format!("{url} returned status {}", response.status()),
            source: format!("HTTP {}", response.status()).into(),
        });
    }

    let total = response.content_length();
    debug!("{}: {:?} bytes", file, total);

    let tmp_path = dest.with_extension("tmp");
    let mut tmp = std::fs::File::create(&tmp_path)?;
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| OcrError::download_error(format!("streaming {url}"), e))?;
        tmp.write_all(&chunk)?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
    }
    tmp.flush()?;
    drop(tmp);

    if downloaded == 0 {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(OcrError::Download {
            context: format!("{url} produced an empty file"),
            source: "empty response body".into(),
        });
    }

    std::fs::rename(&tmp_path, dest)?;
    info!(
        "downloaded {} ({} bytes, sha256 {:x})",
        file,
        downloaded,
        hasher.finalize()
    );
    Ok(())
}
