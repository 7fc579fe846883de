//! The SuryaOCR engine: region selection, recognition, and the mapping of
//! recognition output back into page space.

use crate::core::config::{AcceleratorOptions, DebugConfig, SuryaOcrOptions};
use crate::core::errors::{OcrError, OcrResult};
use crate::core::registry::EngineInit;
use crate::core::traits::{CellSink, OcrEngine, RegionSelector};
use crate::domain::cells::TextCell;
use crate::domain::geometry::Rect;
use crate::domain::page::Page;
use crate::models::{
    CapabilityContext, CapabilityProvider, RecognitionCapability, SuryaPredictorProvider,
};
use crate::pipeline::postprocess::OverlapCellSink;
use crate::pipeline::regions::BitmapRegionSelector;
use crate::utils::visualization;
use std::path::Path;
use tracing::{debug, warn};

/// OCR engine backed by the SuryaOCR recognition suite.
///
/// Pages stream through [`SuryaOcrModel::process_pages`] one at a time; each
/// page is fully processed before the next is pulled. The recognition
/// capability is initialized exactly once, during construction, and only
/// when the engine is enabled.
pub struct SuryaOcrModel {
    enabled: bool,
    scale: u32,
    options: SuryaOcrOptions,
    predictor: Option<Box<dyn RecognitionCapability>>,
    region_selector: Box<dyn RegionSelector>,
    cell_sink: Box<dyn CellSink>,
    debug: DebugConfig,
}

impl std::fmt::Debug for SuryaOcrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuryaOcrModel")
            .field("enabled", &self.enabled)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl SuryaOcrModel {
    /// Upscale applied when rendering regions for recognition.
    /// 72 dpi pages render at 216 dpi; recognition output is divided by
    /// this before translation into page space.
    pub const SCALE: u32 = 3;

    /// Builds the engine.
    ///
    /// When `enabled`, the provider constructs the recognition capability
    /// here; failure surfaces as
    /// [`OcrError::CapabilityUnavailable`](crate::core::errors::OcrError)
    /// and the engine must not be used. When disabled, the provider is never
    /// touched and the engine passes pages through unchanged.
    pub fn new(
        enabled: bool,
        artifacts_path: Option<&Path>,
        options: SuryaOcrOptions,
        accelerator: &AcceleratorOptions,
        provider: &dyn CapabilityProvider,
    ) -> OcrResult<Self> {
        let predictor = if enabled {
            let ctx = CapabilityContext {
                artifacts_path,
                options: &options,
                accelerator,
            };
            Some(provider.initialize(&ctx)?)
        } else {
            None
        };

        Ok(Self {
            enabled,
            scale: Self::SCALE,
            options,
            predictor,
            region_selector: Box::new(BitmapRegionSelector::default()),
            cell_sink: Box::new(OverlapCellSink),
            debug: DebugConfig::default(),
        })
    }

    /// Replaces the region selection policy.
    pub fn with_region_selector(mut self, selector: Box<dyn RegionSelector>) -> Self {
        self.region_selector = selector;
        self
    }

    /// Replaces the cell merge policy.
    pub fn with_cell_sink(mut self, sink: Box<dyn CellSink>) -> Self {
        self.cell_sink = sink;
        self
    }

    /// Sets the debug/visualization configuration.
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Whether the engine will process pages.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The options the engine was built with.
    pub fn options(&self) -> &SuryaOcrOptions {
        &self.options
    }

    /// Processes a stream of pages lazily, one page per pull.
    pub fn process_pages<'a, I>(&'a self, pages: I) -> impl Iterator<Item = Page> + 'a
    where
        I: IntoIterator<Item = Page>,
        I::IntoIter: 'a,
    {
        pages.into_iter().map(move |page| self.process_page(page))
    }

    fn process_page(&self, mut page: Page) -> Page {
        let Some(predictor) = self.predictor.as_deref().filter(|_| self.enabled) else {
            return page;
        };
        let Some(backend) = page.backend.as_ref() else {
            return page;
        };
        if !backend.is_valid() {
            return page;
        }

        let ocr_rects = self.region_selector.ocr_regions(&page);
        let mut all_cells: Vec<TextCell> = Vec::new();

        for region in &ocr_rects {
            if region.area() == 0.0 {
                continue;
            }

            let img = match backend.page_image(self.scale, region) {
                Ok(img) => img,
                Err(e) => {
                    warn!(
                        "page {}: failed to render OCR region {region:?}: {e}",
                        page.page_no
                    );
                    continue;
                }
            };

            let outputs = match predictor.recognize(std::slice::from_ref(&img)) {
                Ok(outputs) => outputs,
                Err(e) => {
                    warn!("page {}: recognition failed for {region:?}: {e}", page.page_no);
                    continue;
                }
            };
            if outputs.is_empty() {
                warn!(
                    "page {}: recognition returned no result for {region:?}",
                    page.page_no
                );
                continue;
            }

            for line in outputs.iter().flat_map(|output| &output.text_lines) {
                let rect = Rect::from_ocr_frame(line.bbox, self.scale, region);
                all_cells.push(TextCell::from_ocr(
                    all_cells.len(),
                    line.text.clone(),
                    line.confidence,
                    rect,
                ));
            }
        }

        debug!(
            "page {}: {} OCR cells from {} regions",
            page.page_no,
            all_cells.len(),
            ocr_rects.len()
        );
        self.cell_sink.post_process_cells(all_cells, &mut page);

        if self.debug.visualize_ocr {
            if let Err(e) =
                visualization::save_ocr_debug(&page, &ocr_rects, &self.debug.output_dir)
            {
                warn!("page {}: visualization failed: {e}", page.page_no);
            }
        }

        page
    }
}

impl OcrEngine for SuryaOcrModel {
    fn kind(&self) -> &'static str {
        SuryaOcrOptions::KIND
    }

    fn process_pages<'a>(
        &'a self,
        pages: Box<dyn Iterator<Item = Page> + 'a>,
    ) -> Box<dyn Iterator<Item = Page> + 'a> {
        Box::new(pages.map(move |page| self.process_page(page)))
    }
}

/// Factory registered under [`SuryaOcrOptions::KIND`].
///
/// A `null` options payload selects the defaults; anything else must match
/// the [`SuryaOcrOptions`] schema exactly.
pub fn suryaocr_engine_factory(init: &EngineInit<'_>) -> OcrResult<Box<dyn OcrEngine>> {
    let options = if init.options.is_null() {
        SuryaOcrOptions::default()
    } else {
        serde_json::from_value(init.options.clone()).map_err(|e| OcrError::InvalidOptions {
            kind: SuryaOcrOptions::KIND.to_string(),
            source: e,
        })?
    };

    let model = SuryaOcrModel::new(
        init.enabled,
        init.artifacts_path,
        options,
        init.accelerator,
        &SuryaPredictorProvider,
    )?;
    Ok(Box::new(model))
}
