//! Default cell post-processing.

use crate::core::traits::CellSink;
use crate::domain::cells::TextCell;
use crate::domain::page::Page;
use tracing::debug;

/// Folds OCR cells into a page, dropping any that land on text the page
/// already has programmatically.
///
/// An OCR cell whose rect intersects an existing non-OCR cell is discarded;
/// the programmatic text is authoritative. Survivors are appended in index
/// order. Hosts with richer merge policies supply their own [`CellSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapCellSink;

impl CellSink for OverlapCellSink {
    fn post_process_cells(&self, cells: Vec<TextCell>, page: &mut Page) {
        let total = cells.len();
        let kept: Vec<TextCell> = cells
            .into_iter()
            .filter(|cell| {
                !page
                    .cells
                    .iter()
                    .any(|existing| !existing.from_ocr && existing.rect.intersects(&cell.rect))
            })
            .collect();

        if kept.len() < total {
            debug!(
                "page {}: dropped {} OCR cells overlapping programmatic text",
                page.page_no,
                total - kept.len()
            );
        }
        page.cells.extend(kept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Rect;

    #[test]
    fn ocr_cells_overlapping_programmatic_text_are_dropped() {
        let mut page = Page::new(0, 100.0, 100.0);
        page.cells.push(TextCell {
            index: 0,
            text: "programmatic".to_string(),
            orig: "programmatic".to_string(),
            confidence: 1.0,
            from_ocr: false,
            rect: Rect::new(0.0, 0.0, 50.0, 10.0),
        });

        let cells = vec![
            TextCell::from_ocr(0, "shadowed", 0.9, Rect::new(10.0, 5.0, 40.0, 15.0)),
            TextCell::from_ocr(1, "kept", 0.9, Rect::new(0.0, 50.0, 50.0, 60.0)),
        ];
        OverlapCellSink.post_process_cells(cells, &mut page);

        assert_eq!(page.cells.len(), 2);
        assert_eq!(page.cells[1].text, "kept");
    }

    #[test]
    fn ocr_cells_do_not_shadow_each_other() {
        let mut page = Page::new(0, 100.0, 100.0);
        let cells = vec![
            TextCell::from_ocr(0, "first", 0.9, Rect::new(0.0, 0.0, 50.0, 10.0)),
            TextCell::from_ocr(1, "second", 0.9, Rect::new(10.0, 5.0, 60.0, 15.0)),
        ];
        OverlapCellSink.post_process_cells(cells, &mut page);
        assert_eq!(page.cells.len(), 2);
    }
}
