//! Node annotations in extended Newick comments.
//!
//! Two conventions are recognised:
//! * BEAST style: `[&key=value,key=value]`, where values may contain
//!   `{...}` lists with commas
//! * NHX style: `[&&NHX:key=value:key=value]`
//!
//! Values are captured by [AnnotationValue] as `i64`, `f64`, or `String`.
//! Any other comment is not an annotation.

use std::collections::HashMap;

const NHX_PREFIX: &str = "&&NHX";
const BEAST_PREFIX: char = '&';

// =#========================================================================#=
// ANNOTATION VALUE
// =#========================================================================$=
/// Enum to encapsulate a parsed annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// For floating point values
    Float(f64),
    /// For integer values
    Int(i64),
    /// For strings
    String(String),
}

impl AnnotationValue {
    /// Reads a raw value as integer, else float, else string.
    fn from_raw(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            AnnotationValue::Int(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            AnnotationValue::Float(v)
        } else {
            AnnotationValue::String(raw.to_string())
        }
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(v) => Some(*v),
            AnnotationValue::Int(v) => Some(*v as f64),
            AnnotationValue::String(_) => None,
        }
    }
}

impl From<f64> for AnnotationValue {
    fn from(v: f64) -> Self {
        AnnotationValue::Float(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::String(v.to_string())
    }
}

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the annotation block of a comment.
///
/// # Returns
/// * `None` - if the comment does not start with `&`
/// * `Some(map)` - key-value pairs; entries without `=` or with an empty
///   key are skipped, later duplicates win
pub(crate) fn parse_annotations(comment: &str) -> Option<HashMap<String, AnnotationValue>> {
    let comment = comment.trim();

    let entries: Vec<&str> = if let Some(body) = comment.strip_prefix(NHX_PREFIX) {
        body.split(':').collect()
    } else if let Some(body) = comment.strip_prefix(BEAST_PREFIX) {
        split_top_level(body)
    } else {
        return None;
    };

    let mut annotations = HashMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        annotations.insert(key.to_string(), AnnotationValue::from_raw(value.trim()));
    }

    Some(annotations)
}

/// Splits at commas that are not inside `{...}`.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
