//! CFI (Canonical Fragment Identifier) types
//!
//! A CFI locates a point (or a range) inside an EPUB publication, e.g.
//! `epubcfi(/6/4[chap01ref]!/4/2/1:12)`. The sidebar also passes around bare
//! step paths without the `epubcfi(...)` wrapper, e.g. `/6/4[chap01]!/4/2`.
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed CFI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cfi {
    /// Steps shared by the whole location (or the common parent of a range)
    pub path: CfiPath,
    /// Start and end, relative to `path`, when this is a range
    pub range: Option<CfiRange>,
    /// Whether the source string used the `epubcfi(...)` wrapper
    pub wrapped: bool,
}

/// A sequence of steps with an optional terminal offset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CfiPath {
    pub steps: Vec<CfiStep>,
    pub character_offset: Option<CharacterOffset>,
    pub temporal_offset: Option<f64>,
    pub spatial_offset: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfiRange {
    pub start: CfiPath,
    pub end: CfiPath,
}

/// One `/N` or `!` step, with any assertion attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfiStep {
    pub kind: StepKind,
    pub assertion: Option<Assertion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Child index; even for elements, odd for text chunks
    Index(u32),
    /// `!`, stepping into the referenced content document
    Indirection,
}

/// Bracketed assertion following a step or an offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assertion {
    /// `[chap01]`
    Id(String),
    /// `[before,after;s=b]`
    Text {
        prefix: Option<String>,
        suffix: Option<String>,
        parameters: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOffset {
    pub offset: u32,
    pub assertion: Option<Assertion>,
}

impl Cfi {
    /// The point a CFI starts at: the shared path extended by the range start.
    pub fn start_position(&self) -> CfiPath {
        match &self.range {
            None => self.path.clone(),
            Some(range) => self.path.joined(&range.start),
        }
    }
}

impl CfiPath {
    pub fn with_steps(steps: Vec<CfiStep>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Append `tail` to this path. The offsets of `tail` win.
    pub fn joined(&self, tail: &CfiPath) -> CfiPath {
        let mut steps = self.steps.clone();
        steps.extend(tail.steps.iter().cloned());
        CfiPath {
            steps,
            character_offset: tail.character_offset.clone(),
            temporal_offset: tail.temporal_offset,
            spatial_offset: tail.spatial_offset,
        }
    }
}

impl CfiStep {
    pub fn index(n: u32) -> Self {
        Self {
            kind: StepKind::Index(n),
            assertion: None,
        }
    }

    pub fn index_with_id(n: u32, id: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Index(n),
            assertion: Some(Assertion::Id(id.into())),
        }
    }

    pub fn indirection() -> Self {
        Self {
            kind: StepKind::Indirection,
            assertion: None,
        }
    }
}

/// Escape the characters that are special inside an assertion.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for ch in text.chars() {
        if matches!(ch, '^' | '[' | ']' | ',' | ';' | '=') {
            write!(f, "^")?;
        }
        write!(f, "{}", ch)?;
    }
    Ok(())
}

impl fmt::Display for Cfi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wrapped {
            write!(f, "epubcfi(")?;
        }
        write!(f, "{}", self.path)?;
        if let Some(range) = &self.range {
            write!(f, ",{},{}", range.start, range.end)?;
        }
        if self.wrapped {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for CfiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        if let Some(offset) = &self.character_offset {
            write!(f, ":{}", offset.offset)?;
            if let Some(assertion) = &offset.assertion {
                write!(f, "{}", assertion)?;
            }
        }
        if let Some(seconds) = self.temporal_offset {
            write!(f, "~{}", seconds)?;
        }
        if let Some((x, y)) = self.spatial_offset {
            write!(f, "@{}:{}", x, y)?;
        }
        Ok(())
    }
}

impl fmt::Display for CfiStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StepKind::Index(n) => write!(f, "/{}", n)?,
            StepKind::Indirection => write!(f, "!")?,
        }
        if let Some(assertion) = &self.assertion {
            write!(f, "{}", assertion)?;
        }
        Ok(())
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        match self {
            Assertion::Id(id) => write_escaped(f, id)?,
            Assertion::Text {
                prefix,
                suffix,
                parameters,
            } => {
                if let Some(prefix) = prefix {
                    write_escaped(f, prefix)?;
                }
                write!(f, ",")?;
                if let Some(suffix) = suffix {
                    write_escaped(f, suffix)?;
                }
                for (key, value) in parameters {
                    write!(f, ";")?;
                    write_escaped(f, key)?;
                    write!(f, "=")?;
                    write_escaped(f, value)?;
                }
            }
        }
        write!(f, "]")
    }
}
