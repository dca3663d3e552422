//! CFI ordering, assertion stripping and range containment
//!
//! Ordering follows document order and ignores assertions, so a CFI with
//! `[chap01]` markers sorts the same as its stripped form.

use std::cmp::Ordering;

use super::parser::parse;
use super::types::*;

fn compare_steps(a: &CfiStep, b: &CfiStep) -> Ordering {
    match (a.kind, b.kind) {
        (StepKind::Index(x), StepKind::Index(y)) => x.cmp(&y),
        (StepKind::Indirection, StepKind::Indirection) => Ordering::Equal,
        (StepKind::Indirection, StepKind::Index(_)) => Ordering::Less,
        (StepKind::Index(_), StepKind::Indirection) => Ordering::Greater,
    }
}

/// Document order of two paths. A path that is a prefix of another sorts first.
pub fn compare_paths(a: &CfiPath, b: &CfiPath) -> Ordering {
    let steps = a
        .steps
        .iter()
        .zip(&b.steps)
        .map(|(x, y)| compare_steps(x, y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.steps.len().cmp(&b.steps.len()));
    if steps.is_ne() {
        return steps;
    }

    let offset_a = a.character_offset.as_ref().map(|o| o.offset);
    let offset_b = b.character_offset.as_ref().map(|o| o.offset);
    offset_a.cmp(&offset_b)
}

/// Document order of two parsed CFIs, using the start of any range.
pub fn compare(a: &Cfi, b: &Cfi) -> Ordering {
    compare_paths(&a.start_position(), &b.start_position())
}

/// Compare two CFI strings. `None` if either fails to parse.
pub fn compare_cfis(a: &str, b: &str) -> Option<Ordering> {
    let a = parse(a).ok()?;
    let b = parse(b).ok()?;
    Some(compare(&a, &b))
}

/// True if `cfi` lies between `start` and `end`, both inclusive.
///
/// Unparseable input never matches.
pub fn cfi_in_range(cfi: &str, start: &str, end: &str) -> bool {
    match (parse(cfi), parse(start), parse(end)) {
        (Ok(cfi), Ok(start), Ok(end)) => {
            compare(&cfi, &start).is_ge() && compare(&cfi, &end).is_le()
        }
        _ => false,
    }
}

/// Remove every `[...]` assertion from a CFI string.
///
/// Works on the raw text, so it also handles strings the parser would
/// reject. `^` escapes inside an assertion are honoured; everything outside
/// assertions is kept as-is.
pub fn strip_cfi_assertions(cfi: &str) -> String {
    if !cfi.contains('[') {
        return cfi.to_string();
    }

    let mut out = String::with_capacity(cfi.len());
    let mut in_assertion = false;
    let mut escaped = false;
    for ch in cfi.chars() {
        if in_assertion {
            if escaped {
                escaped = false;
            } else if ch == '^' {
                escaped = true;
            } else if ch == ']' {
                in_assertion = false;
            }
        } else if ch == '[' && !escaped {
            in_assertion = true;
        } else {
            escaped = ch == '^' && !escaped;
            out.push(ch);
        }
    }
    out
}

/// Split a `start-end` range value on its delimiter.
///
/// The delimiter is the first `-` outside an assertion, so ids such as
/// `[chap-01]` survive. A value without a delimiter is a single point.
/// Any further `-` stays in the end bound, so `/2-/4-/6` yields an end of
/// `/4-/6` that does not parse and the focus filter is then ignored.
pub fn split_cfi_range(value: &str) -> (&str, &str) {
    let mut in_assertion = false;
    let mut escaped = false;
    for (idx, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '^' => escaped = true,
            '[' => in_assertion = true,
            ']' => in_assertion = false,
            '-' if !in_assertion => return (&value[..idx], &value[idx + 1..]),
            _ => {}
        }
    }
    (value, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_within_chapter() {
        assert_eq!(
            compare_cfis("epubcfi(/6/4!/4/2/1:10)", "epubcfi(/6/4!/4/2/1:20)"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_ordering_across_chapters_and_depth() {
        assert_eq!(compare_cfis("/6/4!/4/2", "/6/6!/4/2"), Some(Ordering::Less));
        assert_eq!(compare_cfis("/6/4!/4/2/1", "/6/4!/4/2"), Some(Ordering::Greater));
        assert_eq!(compare_cfis("/10", "/9"), Some(Ordering::Greater));
    }

    #[test]
    fn test_ordering_ignores_assertions_and_wrapper() {
        assert_eq!(
            compare_cfis("epubcfi(/6/4[chap01]!/4/2)", "/6/4!/4/2"),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_compare_invalid() {
        assert_eq!(compare_cfis("invalid", "/6/4"), None);
    }

    #[test]
    fn test_range_uses_start() {
        assert_eq!(
            compare_cfis("epubcfi(/6/4!/4/2,/1:5,/1:90)", "epubcfi(/6/4!/4/2/1:6)"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_in_range_inclusive() {
        assert!(cfi_in_range("/3", "/2", "/4"));
        assert!(cfi_in_range("/2", "/2", "/4"));
        assert!(cfi_in_range("/4", "/2", "/4"));
        assert!(cfi_in_range("/4/2/1:7", "/4", "/6"));
        assert!(!cfi_in_range("/5", "/2", "/4"));
        assert!(!cfi_in_range("/1", "/2", "/4"));
        assert!(!cfi_in_range("garbage", "/2", "/4"));
    }

    #[test]
    fn test_strip_assertions() {
        assert_eq!(strip_cfi_assertions("/6/4[chap01]!/4/2"), "/6/4!/4/2");
        assert_eq!(
            strip_cfi_assertions("/6/4[a^]b]!/4[x,y;s=b]/2:3[,z]"),
            "/6/4!/4/2:3"
        );
        assert_eq!(strip_cfi_assertions("/6/4!/4/2"), "/6/4!/4/2");
        assert_eq!(strip_cfi_assertions(""), "");
    }

    #[test]
    fn test_split_range() {
        assert_eq!(split_cfi_range("/2-/4"), ("/2", "/4"));
        assert_eq!(split_cfi_range("/6/4[chap-01]-/6/6"), ("/6/4[chap-01]", "/6/6"));
        assert_eq!(split_cfi_range("/6/8"), ("/6/8", "/6/8"));
        assert_eq!(split_cfi_range("/2-/4-/6"), ("/2", "/4-/6"));
        assert!(crate::cfi::try_parse("/4-/6").is_none());
    }
}
