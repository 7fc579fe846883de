//! The SuryaOCR suite behind the recognition-capability contract.
//!
//! The suite ships as two pre-built ONNX models plus a character set: a
//! detection model emitting scored line boxes in input-pixel space, and a
//! recognition model emitting a per-timestep character distribution that is
//! collapsed greedily against the character set. The plugin treats both
//! models as opaque; everything here is tensor plumbing around them.

use crate::core::config::{AcceleratorOptions, SuryaOcrOptions};
use crate::core::errors::{OcrError, OcrResult};
use crate::models::artifacts::{ModelArtifacts, ModelFile};
use crate::models::{
    CapabilityContext, CapabilityProvider, RecognitionCapability, RecognitionOutput,
    RecognizedLine,
};
use image::{RgbImage, imageops};
use ndarray::{Array4, ArrayView2};
use ort::execution_providers::CUDAExecutionProvider;
use ort::logging::LogLevel;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::TensorRef;
use std::cell::RefCell;
use std::path::Path;
use tracing::{debug, warn};

/// Longest input side the detection model is fed.
const DET_MAX_SIDE: u32 = 960;
/// Detection inputs are padded to multiples of this.
const DET_STRIDE: u32 = 32;
/// Boxes scored below this are dropped.
const DET_SCORE_THRESHOLD: f32 = 0.5;
/// Input height of the recognition model.
const REC_HEIGHT: u32 = 48;

/// The loaded suite.
pub struct SuryaPredictor {
    detection: RefCell<Session>,
    recognition: RefCell<Session>,
    alphabet: Vec<String>,
}

impl SuryaPredictor {
    /// Loads the suite from an artifact directory.
    pub fn load(
        artifacts: &ModelArtifacts,
        options: &SuryaOcrOptions,
        accelerator: &AcceleratorOptions,
    ) -> OcrResult<Self> {
        let use_gpu = accelerator.wants_gpu(options.use_gpu);
        debug!(
            "loading suite from {} (languages {:?}, gpu {})",
            artifacts.dir().display(),
            options.lang,
            use_gpu
        );

        let detection = build_session(&artifacts.path(ModelFile::Detection), accelerator, use_gpu)?;
        let recognition =
            build_session(&artifacts.path(ModelFile::Recognition), accelerator, use_gpu)?;

        let dict_path = artifacts.path(ModelFile::Dictionary);
        let dict = std::fs::read_to_string(&dict_path).map_err(|e| {
            OcrError::capability_init(
                "suryaocr",
                &format!("reading character set {}", dict_path.display()),
                e,
            )
        })?;
        let alphabet: Vec<String> = dict.lines().map(String::from).collect();
        if alphabet.is_empty() {
            return Err(OcrError::capability_unavailable(
                "suryaocr",
                format!("character set {} is empty", dict_path.display()),
            ));
        }

        Ok(Self {
            detection: RefCell::new(detection),
            recognition: RefCell::new(recognition),
            alphabet,
        })
    }

    /// Detects text lines, returning `(bbox, score)` in `img`'s pixel space,
    /// sorted into reading order.
    fn detect(&self, img: &RgbImage) -> OcrResult<Vec<([f32; 4], f32)>> {
        let (width, height) = img.dimensions();
        let (target_w, target_h) = det_target_size(width, height);
        let input = image_to_tensor(img, target_w, target_h);

        let mut session = self.detection.borrow_mut();
        let tensor = TensorRef::from_array_view(input.view())?;
        let outputs = session.run(ort::inputs![tensor])?;
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;

        if shape.len() != 2 || shape[1] != 5 {
            return Err(OcrError::invalid_input(format!(
                "unexpected detection output shape: {shape:?}"
            )));
        }

        let ratio_x = width as f32 / target_w as f32;
        let ratio_y = height as f32 / target_h as f32;
        let mut boxes = Vec::new();
        for row in data.chunks_exact(5) {
            let score = row[4];
            if score < DET_SCORE_THRESHOLD {
                continue;
            }
            let bbox = [
                (row[0] * ratio_x).clamp(0.0, width as f32),
                (row[1] * ratio_y).clamp(0.0, height as f32),
                (row[2] * ratio_x).clamp(0.0, width as f32),
                (row[3] * ratio_y).clamp(0.0, height as f32),
            ];
            if bbox[2] - bbox[0] < 1.0 || bbox[3] - bbox[1] < 1.0 {
                continue;
            }
            boxes.push((bbox, score));
        }

        sort_reading_order(&mut boxes);
        Ok(boxes)
    }

    /// Recognizes one cropped text line.
    fn recognize_line(&self, crop: &RgbImage) -> OcrResult<(String, f32)> {
        let (width, height) = crop.dimensions();
        let target_w = rec_target_width(width, height);
        let input = image_to_tensor(crop, target_w, REC_HEIGHT);

        let mut session = self.recognition.borrow_mut();
        let tensor = TensorRef::from_array_view(input.view())?;
        let outputs = session.run(ort::inputs![tensor])?;
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;

        if shape.len() != 3 {
            return Err(OcrError::invalid_input(format!(
                "unexpected recognition output shape: {shape:?}"
            )));
        }
        let steps = shape[1] as usize;
        let classes = shape[2] as usize;
        let pred = ArrayView2::from_shape((steps, classes), &data[..steps * classes])?;

        Ok(ctc_greedy_decode(pred, &self.alphabet))
    }
}

impl RecognitionCapability for SuryaPredictor {
    fn recognize(&self, images: &[RgbImage]) -> OcrResult<Vec<RecognitionOutput>> {
        let mut results = Vec::with_capacity(images.len());
        for img in images {
            let mut text_lines = Vec::new();
            for (bbox, det_score) in self.detect(img)? {
                let Some(crop) = crop_box(img, bbox) else {
                    continue;
                };
                let (text, rec_confidence) = self.recognize_line(&crop)?;
                if text.is_empty() {
                    debug!("dropping unreadable line at {bbox:?} (det score {det_score:.3})");
                    continue;
                }
                text_lines.push(RecognizedLine {
                    bbox,
                    text,
                    confidence: rec_confidence,
                });
            }
            results.push(RecognitionOutput { text_lines });
        }
        Ok(results)
    }
}

/// Provider for the SuryaOCR suite.
///
/// All heavy work (artifact resolution, downloads, session construction)
/// happens in `initialize`, never at provider construction, so a disabled
/// engine carries no cost. Any initialization failure is reported as a
/// single `CapabilityUnavailable` error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuryaPredictorProvider;

impl CapabilityProvider for SuryaPredictorProvider {
    fn backend(&self) -> &'static str {
        SuryaOcrOptions::KIND
    }

    fn initialize(&self, ctx: &CapabilityContext<'_>) -> OcrResult<Box<dyn RecognitionCapability>> {
        let artifacts = ModelArtifacts::resolve(
            ctx.options.model_storage_directory.as_deref(),
            ctx.artifacts_path,
        )
        .map_err(|e| as_capability_failure("resolving model storage", e))?;

        artifacts
            .ensure_available(ctx.options.download_enabled)
            .map_err(|e| as_capability_failure("fetching model artifacts", e))?;

        let predictor = SuryaPredictor::load(&artifacts, ctx.options, ctx.accelerator)
            .map_err(|e| as_capability_failure("loading recognition sessions", e))?;
        Ok(Box::new(predictor))
    }
}

/// Folds any initialization error into the capability-unavailable contract.
fn as_capability_failure(context: &str, error: OcrError) -> OcrError {
    if error.is_capability_unavailable() {
        error
    } else {
        OcrError::capability_init(SuryaOcrOptions::KIND, context, error)
    }
}

fn build_session(path: &Path, accelerator: &AcceleratorOptions, use_gpu: bool) -> OcrResult<Session> {
    let builder = Session::builder()?
        .with_log_level(LogLevel::Error)?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(accelerator.num_threads)?;

    let builder = if use_gpu {
        match builder.with_execution_providers([CUDAExecutionProvider::default().build()]) {
            Ok(builder) => builder,
            Err(e) => {
                warn!("CUDA execution provider unavailable, using CPU: {e}");
                Session::builder()?
                    .with_log_level(LogLevel::Error)?
                    .with_optimization_level(GraphOptimizationLevel::Level3)?
                    .with_intra_threads(accelerator.num_threads)?
            }
        }
    } else {
        builder
    };

    builder.commit_from_file(path).map_err(|e| {
        OcrError::capability_init(
            SuryaOcrOptions::KIND,
            &format!("failed to create ONNX session for {}", path.display()),
            e,
        )
    })
}

/// Resizes `img` to exactly `width` x `height` and normalizes into an
/// NCHW tensor with each channel mapped to `[-1, 1]`.
fn image_to_tensor(img: &RgbImage, width: u32, height: u32) -> Array4<f32> {
    let resized = imageops::resize(img, width, height, imageops::FilterType::Triangle);
    let mut input = Array4::zeros((1, 3, height as usize, width as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        input[[0, 0, y as usize, x as usize]] = r as f32 / 255.0 * 2.0 - 1.0;
        input[[0, 1, y as usize, x as usize]] = g as f32 / 255.0 * 2.0 - 1.0;
        input[[0, 2, y as usize, x as usize]] = b as f32 / 255.0 * 2.0 - 1.0;
    }
    input
}

/// Detection input size: longest side capped, both sides stride-aligned.
fn det_target_size(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    let ratio = if longest > DET_MAX_SIDE {
        DET_MAX_SIDE as f32 / longest as f32
    } else {
        1.0
    };
    let align = |side: u32| {
        let scaled = (side as f32 * ratio).round() as u32;
        (scaled / DET_STRIDE * DET_STRIDE).max(DET_STRIDE)
    };
    (align(width), align(height))
}

/// Recognition input width preserving the crop's aspect ratio.
fn rec_target_width(width: u32, height: u32) -> u32 {
    if height == 0 {
        return REC_HEIGHT;
    }
    let target = (width as f32 / height as f32 * REC_HEIGHT as f32).round() as u32;
    target.max(16)
}

/// Sorts boxes top-to-bottom, then left-to-right.
fn sort_reading_order(boxes: &mut [([f32; 4], f32)]) {
    boxes.sort_by(|(a, _), (b, _)| {
        (a[1], a[0])
            .partial_cmp(&(b[1], b[0]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Clamped crop of `bbox` out of `img`. `None` when the clamped box is
/// degenerate.
fn crop_box(img: &RgbImage, bbox: [f32; 4]) -> Option<RgbImage> {
    let (width, height) = img.dimensions();
    let x0 = (bbox[0].floor().max(0.0) as u32).min(width);
    let y0 = (bbox[1].floor().max(0.0) as u32).min(height);
    let x1 = (bbox[2].ceil().max(0.0) as u32).min(width);
    let y1 = (bbox[3].ceil().max(0.0) as u32).min(height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Greedy CTC collapse: argmax per timestep, repeats and blanks (class 0)
/// removed, confidence averaged over the kept timesteps.
fn ctc_greedy_decode(pred: ArrayView2<'_, f32>, alphabet: &[String]) -> (String, f32) {
    let mut text = String::new();
    let mut probs = Vec::new();
    let mut previous = 0usize;

    for row in pred.outer_iter() {
        let Some((idx, &prob)) = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        else {
            continue;
        };
        if idx != 0 && idx != previous {
            if let Some(symbol) = alphabet.get(idx - 1) {
                text.push_str(symbol);
                probs.push(prob);
            }
        }
        previous = idx;
    }

    if probs.is_empty() {
        return (String::new(), 0.0);
    }
    let confidence = probs.iter().sum::<f32>() / probs.len() as f32;
    (text.trim().to_string(), confidence)
}
