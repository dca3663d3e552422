//! CFI (Canonical Fragment Identifier) utilities
//!
//! Parsing, ordering and normalisation of EPUB CFIs as used by the sidebar's
//! segment matching.
//!
//! ```text
//! epubcfi(/6/4[chap01]!/4/2/1:42)
//!         │  │       │ │ │ │ └── character offset 42
//!         │  │       │ │ │ └──── text chunk (odd index)
//!         │  │       │ │ └────── element (even index)
//!         │  │       │ └──────── body
//!         │  │       └────────── indirection into the content document
//!         │  └────────────────── spine item, with an id assertion
//!         └───────────────────── spine element
//! ```
//!
//! Segment descriptors and focus filters usually carry the bare form
//! (`/6/4[chap01]`) without the `epubcfi(...)` wrapper; both are accepted.

mod comparator;
mod parser;
mod types;

pub use types::{Assertion, CharacterOffset, Cfi, CfiPath, CfiRange, CfiStep, StepKind};

pub use parser::{parse, try_parse, CfiParseError};

pub use comparator::{
    cfi_in_range, compare, compare_cfis, compare_paths, split_cfi_range, strip_cfi_assertions,
};
