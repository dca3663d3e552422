//! Segment matching for segmented documents (EPUB chapters, page ranges)
//!
//! The sidebar uses these predicates to decide which annotations belong to
//! the segment a guest frame is showing, and whether that segment passes the
//! user's focus filters. For plain web pages and PDFs there is no segment
//! selector and everything matches.
//!
//! All types mirror the client's JSON (camelCase fields, `type`-tagged
//! selectors). Empty strings count as absent.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cfi::{self, cfi_in_range, split_cfi_range, strip_cfi_assertions};
use crate::page_range::{page_range_overlap, RangeOverlap};

/// The portion of a document currently displayed in a guest frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInfo {
    /// URL of the content document (absolute or relative to the book root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Bare CFI of the segment, e.g. `/6/4[chap01]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<String>,
    /// Page labels spanned by the segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageBounds>,
}

/// First and last page label of a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBounds {
    #[serde(deserialize_with = "page_label")]
    pub start: String,
    #[serde(deserialize_with = "page_label")]
    pub end: String,
}

impl PageBounds {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The `start-end` form understood by [`page_range_overlap`].
    pub fn to_range(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Page labels arrive as strings or as plain JSON numbers.
fn page_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(text) => text,
        Label::Integer(n) => n.to_string(),
        Label::Float(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Label::Float(n) => n.to_string(),
    })
}

/// An annotation, reduced to the fields segment matching looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default)]
    pub target: Vec<Target>,
}

/// What an annotation refers to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub source: String,
    #[serde(
        default,
        deserialize_with = "lenient_selectors",
        skip_serializing_if = "Option::is_none"
    )]
    pub selector: Option<Vec<Selector>>,
}

/// Selectors anchoring an annotation. Unknown types are kept as [`Selector::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    #[serde(rename = "EPUBContentSelector")]
    EpubContent(EpubContentSelector),

    #[serde(rename = "TextQuoteSelector")]
    TextQuote {
        exact: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suffix: Option<String>,
    },

    #[serde(rename = "TextPositionSelector")]
    TextPosition { start: u64, end: u64 },

    #[serde(rename = "RangeSelector", rename_all = "camelCase")]
    Range {
        start_container: String,
        start_offset: u64,
        end_container: String,
        end_offset: u64,
    },

    #[serde(rename = "FragmentSelector", rename_all = "camelCase")]
    Fragment {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conforms_to: Option<String>,
    },

    #[serde(rename = "PageSelector")]
    Page {
        index: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },

    #[serde(other)]
    Other,
}

/// Identifies the EPUB content document an annotation was made in.
/// Carries a URL, a CFI, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpubContentSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientSelector {
    Known(Selector),
    Malformed(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientSelectorList {
    Items(Vec<LenientSelector>),
    Malformed(IgnoredAny),
}

/// A selector that fails to deserialize becomes [`Selector::Other`], and a
/// `selector` field that is not a list counts as missing.
fn lenient_selectors<'de, D>(deserializer: D) -> Result<Option<Vec<Selector>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientSelectorList>::deserialize(deserializer)? {
        Some(LenientSelectorList::Items(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    LenientSelector::Known(selector) => selector,
                    LenientSelector::Malformed(_) => {
                        tracing::debug!("Ignoring malformed annotation selector");
                        Selector::Other
                    }
                })
                .collect(),
        ),
        Some(LenientSelectorList::Malformed(_)) => {
            tracing::debug!("Ignoring annotation selector field that is not a list");
            None
        }
        None => None,
    })
}

impl Annotation {
    /// The segment selector of the first target, if there is one.
    pub fn epub_content_selector(&self) -> Option<&EpubContentSelector> {
        self.target
            .first()?
            .selector
            .as_deref()?
            .iter()
            .find_map(|selector| match selector {
                Selector::EpubContent(epub) => Some(epub),
                _ => None,
            })
    }
}

/// A single focus filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Machine value, e.g. `"/6/4-/6/10"` or `"5-12"`
    pub value: String,
    /// Label shown in the filter UI
    #[serde(default)]
    pub display: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
        }
    }
}

/// The user's configured focus filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<FilterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<FilterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<FilterOption>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Return true if an annotation belongs to the segment currently displayed.
///
/// Annotations without an EPUB content selector match every segment. The URL
/// comparison is exact: both URLs must use the same absolute/relative form.
pub fn annotation_matches_segment(annotation: &Annotation, segment: &SegmentInfo) -> bool {
    let Some(selector) = annotation.epub_content_selector() else {
        return true;
    };

    let url_matches = match (present(&segment.url), present(&selector.url)) {
        (Some(segment_url), Some(selector_url)) => segment_url == selector_url,
        _ => false,
    };
    let cfi_matches = match (present(&segment.cfi), present(&selector.cfi)) {
        (Some(segment_cfi), Some(selector_cfi)) => {
            strip_cfi_assertions(selector_cfi) == strip_cfi_assertions(segment_cfi)
        }
        _ => false,
    };

    url_matches || cfi_matches
}

/// Return true if the displayed segment satisfies the focus filters.
///
/// A CFI filter takes precedence over a page filter. Without applicable
/// filter data the segment passes.
pub fn segment_matches_focus_filters(segment: &SegmentInfo, filters: &Filters) -> bool {
    if let (Some(segment_cfi), Some(filter)) = (present(&segment.cfi), filters.cfi.as_ref()) {
        let (start, end) = split_cfi_range(&filter.value);
        if [segment_cfi, start, end]
            .iter()
            .any(|value| cfi::try_parse(value).is_none())
        {
            tracing::warn!(
                segment = segment_cfi,
                filter = %filter.value,
                "Ignoring CFI focus filter that cannot be parsed"
            );
            return true;
        }
        return cfi_in_range(segment_cfi, start, end);
    }

    if let (Some(pages), Some(filter)) = (segment.pages.as_ref(), filters.page.as_ref()) {
        let overlap = page_range_overlap(&pages.to_range(), &filter.value);
        tracing::debug!(
            segment = %pages.to_range(),
            filter = %filter.value,
            ?overlap,
            "Compared segment pages with focus filter"
        );
        return overlap == RangeOverlap::Overlap;
    }

    true
}

/// Keep only the annotations that belong to `segment`.
pub fn annotations_in_segment<'a>(
    annotations: &'a [Annotation],
    segment: &'a SegmentInfo,
) -> impl Iterator<Item = &'a Annotation> + 'a {
    annotations
        .iter()
        .filter(move |annotation| annotation_matches_segment(annotation, segment))
}
