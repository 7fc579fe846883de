//! Behavioral tests for the SuryaOCR engine, driven through scripted
//! collaborators so no model files or network access are needed.

use image::RgbImage;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use suryaocr_plugin::models::{
    CapabilityContext, CapabilityProvider, RecognitionCapability, RecognitionOutput,
    RecognizedLine,
};
use suryaocr_plugin::prelude::*;

// --------------------------------------------------------------------------
// Scripted collaborators
// --------------------------------------------------------------------------

struct MockBackend {
    valid: bool,
}

impl PageBackend for MockBackend {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn page_image(&self, scale: u32, cropbox: &Rect) -> OcrResult<RgbImage> {
        let width = (cropbox.width().round() as u32 * scale).max(1);
        let height = (cropbox.height().round() as u32 * scale).max(1);
        Ok(RgbImage::new(width, height))
    }
}

struct ListSelector {
    rects: Vec<Rect>,
}

impl RegionSelector for ListSelector {
    fn ocr_regions(&self, _page: &Page) -> Vec<Rect> {
        self.rects.clone()
    }
}

/// Returns one scripted response per `recognize` call and counts the calls.
struct ScriptedCapability {
    calls: Rc<RefCell<usize>>,
    script: RefCell<VecDeque<Vec<RecognitionOutput>>>,
}

impl RecognitionCapability for ScriptedCapability {
    fn recognize(&self, images: &[RgbImage]) -> OcrResult<Vec<RecognitionOutput>> {
        assert_eq!(images.len(), 1, "engine must send single-image batches");
        *self.calls.borrow_mut() += 1;
        Ok(self.script.borrow_mut().pop_front().unwrap_or_default())
    }
}

struct ScriptedProvider {
    capability: RefCell<Option<Box<dyn RecognitionCapability>>>,
}

impl CapabilityProvider for ScriptedProvider {
    fn backend(&self) -> &'static str {
        "scripted"
    }

    fn initialize(
        &self,
        _ctx: &CapabilityContext<'_>,
    ) -> OcrResult<Box<dyn RecognitionCapability>> {
        self.capability
            .borrow_mut()
            .take()
            .ok_or_else(|| OcrError::capability_unavailable("scripted", "already initialized"))
    }
}

fn line(bbox: [f32; 4], text: &str) -> RecognizedLine {
    RecognizedLine {
        bbox,
        text: text.to_string(),
        confidence: 0.95,
    }
}

fn output(lines: Vec<RecognizedLine>) -> Vec<RecognitionOutput> {
    vec![RecognitionOutput { text_lines: lines }]
}

/// Builds an enabled engine whose capability plays back `script`, returning
/// the engine and the shared call counter.
fn scripted_model(
    regions: Vec<Rect>,
    script: Vec<Vec<RecognitionOutput>>,
) -> (SuryaOcrModel, Rc<RefCell<usize>>) {
    let calls = Rc::new(RefCell::new(0));
    let capability = ScriptedCapability {
        calls: Rc::clone(&calls),
        script: RefCell::new(script.into()),
    };
    let provider = ScriptedProvider {
        capability: RefCell::new(Some(Box::new(capability))),
    };
    let model = SuryaOcrModel::new(
        true,
        None,
        SuryaOcrOptions::default(),
        &AcceleratorOptions::default(),
        &provider,
    )
    .unwrap()
    .with_region_selector(Box::new(ListSelector { rects: regions }));
    (model, calls)
}

fn valid_page(page_no: usize) -> Page {
    Page::new(page_no, 200.0, 300.0).with_backend(Box::new(MockBackend { valid: true }))
}

// --------------------------------------------------------------------------
// Engine behavior
// --------------------------------------------------------------------------

#[test]
fn disabled_engine_passes_the_stream_through_unchanged() {
    let registry = ocr_engines();
    let engine = registry
        .create(
            SuryaOcrOptions::KIND,
            &EngineInit {
                enabled: false,
                artifacts_path: None,
                options: &serde_json::Value::Null,
                accelerator: &AcceleratorOptions::default(),
            },
        )
        .unwrap();

    let pages = vec![valid_page(0), Page::new(1, 50.0, 50.0), valid_page(2)];
    let out: Vec<Page> = engine.process_pages(Box::new(pages.into_iter())).collect();

    assert_eq!(out.len(), 3);
    for (i, page) in out.iter().enumerate() {
        assert_eq!(page.page_no, i);
        assert!(page.cells.is_empty());
    }
}

#[test]
fn invalid_backend_passes_the_page_through_without_cells() {
    let (model, calls) = scripted_model(
        vec![Rect::new(0.0, 0.0, 100.0, 100.0)],
        vec![output(vec![line([0.0, 0.0, 30.0, 10.0], "ghost")])],
    );

    let page = Page::new(0, 200.0, 300.0).with_backend(Box::new(MockBackend { valid: false }));
    let out: Vec<Page> = model.process_pages(vec![page]).collect();

    assert!(out[0].cells.is_empty());
    assert_eq!(*calls.borrow(), 0);

    let no_backend: Vec<Page> = model.process_pages(vec![Page::new(1, 10.0, 10.0)]).collect();
    assert!(no_backend[0].cells.is_empty());
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn zero_area_regions_never_reach_the_capability() {
    let (model, calls) = scripted_model(
        vec![
            Rect::new(10.0, 10.0, 10.0, 40.0), // l == r
            Rect::new(10.0, 20.0, 50.0, 20.0), // t == b
            Rect::new(0.0, 0.0, 100.0, 100.0),
        ],
        vec![output(vec![line([0.0, 0.0, 30.0, 10.0], "text")])],
    );

    let out: Vec<Page> = model.process_pages(vec![valid_page(0)]).collect();

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(out[0].cells.len(), 1);
}

#[test]
fn recognition_output_is_mapped_into_page_space() {
    let (model, _) = scripted_model(
        vec![Rect::new(50.0, 100.0, 150.0, 200.0)],
        vec![output(vec![line([30.0, 60.0, 90.0, 120.0], "Hello from Surya")])],
    );

    let out: Vec<Page> = model.process_pages(vec![valid_page(0)]).collect();

    let cell = &out[0].cells[0];
    assert_eq!(cell.rect, Rect::new(60.0, 120.0, 80.0, 140.0));
    assert_eq!(cell.text, "Hello from Surya");
    assert_eq!(cell.orig, "Hello from Surya");
    assert!(cell.from_ocr);
    assert_eq!(cell.confidence, 0.95);
}

#[test]
fn cell_indices_run_across_regions_without_reset() {
    let (model, _) = scripted_model(
        vec![
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 60.0, 100.0, 120.0),
        ],
        vec![
            output(vec![
                line([0.0, 0.0, 30.0, 10.0], "one"),
                line([0.0, 12.0, 30.0, 22.0], "two"),
            ]),
            output(vec![line([0.0, 0.0, 30.0, 10.0], "three")]),
        ],
    );

    let out: Vec<Page> = model.process_pages(vec![valid_page(0)]).collect();

    let indices: Vec<usize> = out[0].cells.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(out[0].cells[2].text, "three");
}

#[test]
fn empty_results_skip_the_region_but_not_the_page() {
    let (model, calls) = scripted_model(
        vec![
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 60.0, 100.0, 120.0),
        ],
        vec![
            Vec::new(), // capability returns no result for the first region
            output(vec![line([0.0, 0.0, 30.0, 10.0], "survivor")]),
        ],
    );

    let out: Vec<Page> = model.process_pages(vec![valid_page(0)]).collect();

    assert_eq!(*calls.borrow(), 2);
    assert_eq!(out[0].cells.len(), 1);
    assert_eq!(out[0].cells[0].text, "survivor");
    assert_eq!(out[0].cells[0].index, 0);
}

#[test]
fn indices_reset_per_page() {
    let (model, _) = scripted_model(
        vec![Rect::new(0.0, 0.0, 100.0, 50.0)],
        vec![
            output(vec![line([0.0, 0.0, 30.0, 10.0], "page0")]),
            output(vec![line([0.0, 0.0, 30.0, 10.0], "page1")]),
        ],
    );

    let out: Vec<Page> = model.process_pages(vec![valid_page(0), valid_page(1)]).collect();

    assert_eq!(out[0].cells[0].index, 0);
    assert_eq!(out[1].cells[0].index, 0);
}

#[test]
fn registration_key_matches_the_options_kind() {
    assert_eq!(SuryaOcrOptions::KIND, "suryaocr");

    let registry = ocr_engines();
    assert_eq!(registry.kinds(), vec![SuryaOcrOptions::KIND]);

    let engine = registry
        .create(
            "suryaocr",
            &EngineInit {
                enabled: false,
                artifacts_path: None,
                options: &serde_json::Value::Null,
                accelerator: &AcceleratorOptions::default(),
            },
        )
        .unwrap();
    assert_eq!(engine.kind(), SuryaOcrOptions::KIND);
}

#[test]
fn streaming_is_lazy_and_single_pass() {
    let (model, calls) = scripted_model(
        vec![Rect::new(0.0, 0.0, 100.0, 50.0)],
        vec![
            output(vec![line([0.0, 0.0, 30.0, 10.0], "a")]),
            output(vec![line([0.0, 0.0, 30.0, 10.0], "b")]),
        ],
    );

    let mut stream = model.process_pages(vec![valid_page(0), valid_page(1)]);

    let first = stream.next().unwrap();
    assert_eq!(first.cells[0].text, "a");
    // The second page has not been pulled, so it has not been recognized.
    assert_eq!(*calls.borrow(), 1);

    let second = stream.next().unwrap();
    assert_eq!(second.cells[0].text, "b");
    assert_eq!(*calls.borrow(), 2);
    assert!(stream.next().is_none());
}
