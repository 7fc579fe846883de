//! Default region selection.

use crate::core::traits::RegionSelector;
use crate::domain::geometry::Rect;
use crate::domain::page::Page;

/// Selects OCR regions from a page's embedded bitmap resources.
///
/// In full-page mode the whole page is one region. Otherwise each bitmap
/// rect is clipped to the page bounds and kept when it covers at least
/// `area_threshold` of the page; smaller bitmaps are not OCRed.
#[derive(Debug, Clone)]
pub struct BitmapRegionSelector {
    /// OCR the whole page regardless of bitmap coverage.
    pub force_full_page: bool,
    /// Minimum page-area fraction for a bitmap rect to be OCRed.
    pub area_threshold: f32,
}

impl Default for BitmapRegionSelector {
    fn default() -> Self {
        Self {
            force_full_page: false,
            area_threshold: 0.05,
        }
    }
}

impl BitmapRegionSelector {
    /// A selector that always OCRs the full page.
    pub fn full_page() -> Self {
        Self {
            force_full_page: true,
            ..Self::default()
        }
    }
}

impl RegionSelector for BitmapRegionSelector {
    fn ocr_regions(&self, page: &Page) -> Vec<Rect> {
        let bounds = page.bounds();
        if self.force_full_page {
            return vec![bounds];
        }

        let page_area = bounds.area();
        if page_area == 0.0 {
            return Vec::new();
        }

        page.bitmap_rects
            .iter()
            .map(|rect| rect.clip_to(&bounds))
            .filter(|rect| rect.area() / page_area >= self.area_threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_bitmaps(rects: Vec<Rect>) -> Page {
        let mut page = Page::new(0, 100.0, 100.0);
        page.bitmap_rects = rects;
        page
    }

    #[test]
    fn full_page_mode_yields_page_bounds() {
        let page = page_with_bitmaps(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let regions = BitmapRegionSelector::full_page().ocr_regions(&page);
        assert_eq!(regions, vec![Rect::from_size(100.0, 100.0)]);
    }

    #[test]
    fn small_bitmaps_are_filtered_out() {
        let page = page_with_bitmaps(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),  // 1% of the page
            Rect::new(0.0, 0.0, 40.0, 40.0),  // 16%
        ]);
        let regions = BitmapRegionSelector::default().ocr_regions(&page);
        assert_eq!(regions, vec![Rect::new(0.0, 0.0, 40.0, 40.0)]);
    }

    #[test]
    fn bitmaps_are_clipped_to_page_bounds() {
        let page = page_with_bitmaps(vec![Rect::new(50.0, 50.0, 200.0, 200.0)]);
        let regions = BitmapRegionSelector::default().ocr_regions(&page);
        assert_eq!(regions, vec![Rect::new(50.0, 50.0, 100.0, 100.0)]);
    }
}
