//! Reader segment helpers for Los Libros
//!
//! Browser-side building blocks for the annotation sidebar:
//! - Segment matching: which annotations belong to the displayed EPUB
//!   chapter, and whether that chapter passes the focus filters
//! - CFI and page range utilities used by the matching
//! - A modal dialog that uses native `<dialog>` where available and a
//!   styled overlay elsewhere
//!
//! Everything except the `web-sys` dialog host also builds for native
//! targets, which is where the unit tests run.

use wasm_bindgen::prelude::*;

pub mod cfi;
pub mod config;
pub mod error;
pub mod modal;
pub mod page_range;
pub mod segment;

// Re-export common types
pub use config::ModalConfig;
pub use error::{CfiParseError, ConfigError, DialogError};
pub use modal::{DialogProps, DialogView, ModalDialog};
pub use page_range::{page_range_overlap, RangeOverlap};
pub use segment::{
    annotation_matches_segment, segment_matches_focus_filters, Annotation, Filters, SegmentInfo,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Return true if an annotation belongs to the currently loaded segment.
#[wasm_bindgen(js_name = "annotationMatchesSegment")]
pub fn annotation_matches_segment_js(annotation: JsValue, segment: JsValue) -> Result<bool, JsValue> {
    let annotation: Annotation = serde_wasm_bindgen::from_value(annotation)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let segment: SegmentInfo = serde_wasm_bindgen::from_value(segment)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(annotation_matches_segment(&annotation, &segment))
}

/// Return true if the displayed segment matches the configured focus filters.
#[wasm_bindgen(js_name = "segmentMatchesFocusFilters")]
pub fn segment_matches_focus_filters_js(segment: JsValue, filters: JsValue) -> Result<bool, JsValue> {
    let segment: SegmentInfo = serde_wasm_bindgen::from_value(segment)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let filters: Filters = serde_wasm_bindgen::from_value(filters)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(segment_matches_focus_filters(&segment, &filters))
}

/// Indices of the annotations that belong to `segment`.
#[wasm_bindgen(js_name = "annotationsInSegment")]
pub fn annotations_in_segment_js(annotations: JsValue, segment: JsValue) -> Result<Vec<u32>, JsValue> {
    let annotations: Vec<Annotation> = serde_wasm_bindgen::from_value(annotations)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let segment: SegmentInfo = serde_wasm_bindgen::from_value(segment)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(annotations
        .iter()
        .enumerate()
        .filter(|(_, annotation)| annotation_matches_segment(annotation, &segment))
        .map(|(index, _)| index as u32)
        .collect())
}

#[wasm_bindgen(js_name = "stripCfiAssertions")]
pub fn strip_cfi_assertions_js(cfi: &str) -> String {
    cfi::strip_cfi_assertions(cfi)
}

#[wasm_bindgen(js_name = "cfiInRange")]
pub fn cfi_in_range_js(cfi: &str, start: &str, end: &str) -> bool {
    cfi::cfi_in_range(cfi, start, end)
}

/// Compare two CFIs: -1, 0 or 1, or `undefined` if either is invalid.
#[wasm_bindgen(js_name = "compareCfis")]
pub fn compare_cfis_js(a: &str, b: &str) -> Option<i32> {
    cfi::compare_cfis(a, b).map(|ordering| ordering as i32)
}

/// Compare two page ranges: `"Overlap"`, `"NoOverlap"` or `"Unknown"`.
#[wasm_bindgen(js_name = "pageRangeOverlap")]
pub fn page_range_overlap_js(range_a: &str, range_b: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&page_range_overlap(range_a, range_b))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_cfis_export() {
        assert_eq!(compare_cfis_js("/2", "/4"), Some(-1));
        assert_eq!(compare_cfis_js("/4", "/4[x]"), Some(0));
        assert_eq!(compare_cfis_js("/4", "nope"), None);
    }

    #[test]
    fn test_cfi_exports() {
        assert_eq!(strip_cfi_assertions_js("/6/4[chap01]!/4/2"), "/6/4!/4/2");
        assert!(cfi_in_range_js("/3", "/2", "/4"));
    }
}
