//! Debug visualization of OCR regions and cells.
//!
//! Renders the page once at native resolution, draws OCR regions and the
//! cells that survived post-processing as hollow rectangles, and writes one
//! PNG per page. Only reachable behind the `visualize_ocr` debug switch;
//! failures are reported to the caller and logged there, never fatal.

use crate::core::errors::{OcrError, OcrResult};
use crate::domain::geometry::Rect;
use crate::domain::page::Page;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;
use std::path::{Path, PathBuf};
use tracing::debug;

const REGION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const CELL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws `regions` and the page's OCR cells onto a rendering of the page.
pub fn draw_ocr_rects_and_cells(page: &Page, regions: &[Rect]) -> OcrResult<RgbImage> {
    let backend = page
        .backend
        .as_ref()
        .ok_or_else(|| OcrError::invalid_input("page has no backend to render"))?;
    let mut canvas = backend.page_image(1, &page.bounds())?;

    for region in regions {
        draw_rect(&mut canvas, region, REGION_COLOR);
    }
    for cell in page.cells.iter().filter(|cell| cell.from_ocr) {
        draw_rect(&mut canvas, &cell.rect, CELL_COLOR);
    }
    Ok(canvas)
}

/// Renders and writes the visualization for one page.
pub fn save_ocr_debug(page: &Page, regions: &[Rect], output_dir: &Path) -> OcrResult<PathBuf> {
    let canvas = draw_ocr_rects_and_cells(page, regions)?;
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("ocr_page_{:05}.png", page.page_no));
    canvas.save(&path).map_err(OcrError::ImageLoad)?;
    debug!("wrote OCR visualization {}", path.display());
    Ok(path)
}

fn draw_rect(canvas: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    let width = rect.width().round() as u32;
    let height = rect.height().round() as u32;
    if width == 0 || height == 0 {
        return;
    }
    draw_hollow_rect_mut(
        canvas,
        PixelRect::at(rect.l.round() as i32, rect.t.round() as i32).of_size(width, height),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::PageBackend;
    use crate::domain::cells::TextCell;

    struct SolidBackend;

    impl PageBackend for SolidBackend {
        fn is_valid(&self) -> bool {
            true
        }

        fn page_image(&self, scale: u32, cropbox: &Rect) -> OcrResult<RgbImage> {
            let width = (cropbox.width().round() as u32 * scale).max(1);
            let height = (cropbox.height().round() as u32 * scale).max(1);
            Ok(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
        }
    }

    #[test]
    fn visualization_marks_regions_and_cells() {
        let mut page = Page::new(3, 100.0, 80.0).with_backend(Box::new(SolidBackend));
        page.cells.push(TextCell::from_ocr(
            0,
            "x",
            0.9,
            Rect::new(10.0, 10.0, 30.0, 20.0),
        ));

        let canvas =
            draw_ocr_rects_and_cells(&page, &[Rect::new(5.0, 5.0, 50.0, 40.0)]).unwrap();
        assert_eq!(canvas.get_pixel(5, 5), &REGION_COLOR);
        assert_eq!(canvas.get_pixel(10, 10), &CELL_COLOR);
    }

    #[test]
    fn save_writes_one_png_per_page() {
        let tmp = tempfile::tempdir().unwrap();
        let page = Page::new(7, 20.0, 20.0).with_backend(Box::new(SolidBackend));
        let path = save_ocr_debug(&page, &[page.bounds()], tmp.path()).unwrap();
        assert!(path.ends_with("ocr_page_00007.png"));
        assert!(path.is_file());
    }

    #[test]
    fn pages_without_backend_cannot_be_visualized() {
        let page = Page::new(0, 10.0, 10.0);
        assert!(draw_ocr_rects_and_cells(&page, &[]).is_err());
    }
}
