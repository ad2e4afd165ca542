//! Best-effort decoding of model output into an [`AnalysisResult`].
//!
//! Models are told to reply with a bare JSON object but regularly wrap it in
//! prose or code fences, truncate it, or return something else entirely.
//! [`decode`] never fails: anything it cannot understand becomes
//! [`AnalysisResult::fallback`], so one bad reply can't stall a batch.

use crate::types::AnalysisResult;
use serde_json::{Map, Value};
use std::ops::Range;

/// Maximum number of tags kept per post.
pub const MAX_TAGS: usize = 6;

/// Confidence assigned when the model returned a bare list of tags.
const BARE_TAGS_CONFIDENCE: f32 = 0.5;

/// Decode raw model text into a result, falling back on any failure.
pub fn decode(raw: &str) -> AnalysisResult {
    match try_decode(raw) {
        Some(result) => result,
        None => {
            tracing::debug!(
                "Could not decode model output ({} chars), using fallback",
                raw.len()
            );
            AnalysisResult::fallback()
        }
    }
}

fn try_decode(raw: &str) -> Option<AnalysisResult> {
    // Prefer the object span; only look at arrays when there is no usable object.
    let object = find_balanced(raw, 0, '{', '}');
    if let Some(span) = object.clone() {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(&raw[span]) {
            if let Some(result) = from_object(&obj) {
                return Some(result);
            }
        }
    }

    // An array inside a rejected (or unterminated) object is part of that
    // object, not a reply of its own.
    let object = object.or_else(|| raw.find('{').map(|start| start..raw.len()));
    let mut span = find_balanced(raw, 0, '[', ']')?;
    if let Some(object) = object {
        if object.contains(&span.start) {
            span = find_balanced(raw, object.end, '[', ']')?;
        }
    }

    match serde_json::from_str::<Value>(&raw[span]).ok()? {
        Value::Array(items) => from_array(&items),
        _ => None,
    }
}

/// Locate the first balanced `open ... close` span at or after `from`,
/// skipping over JSON strings.
fn find_balanced(text: &str, from: usize, open: char, close: char) -> Option<Range<usize>> {
    let start = from + text.get(from..)?.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(start..start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn from_object(obj: &Map<String, Value>) -> Option<AnalysisResult> {
    let tags = normalize_tags(obj.get("tags")?.as_array()?)?;

    let confidence = obj.get("confidence")?.as_f64()?;
    if !confidence.is_finite() {
        return None;
    }

    let suggested_collection = obj
        .get("suggestedCollection")
        .or_else(|| obj.get("suggested_collection"))
        .and_then(non_blank);

    Some(AnalysisResult {
        tags,
        suggested_collection,
        mood: obj.get("mood").and_then(non_blank),
        confidence: confidence.clamp(0.0, 1.0) as f32,
    })
}

fn from_array(items: &[Value]) -> Option<AnalysisResult> {
    match items.first()? {
        Value::Object(obj) => from_object(obj),
        Value::String(_) => Some(AnalysisResult {
            tags: normalize_tags(items)?,
            suggested_collection: None,
            mood: None,
            confidence: BARE_TAGS_CONFIDENCE,
        }),
        _ => None,
    }
}

/// Lowercase and hyphenate tags, dropping blanks and duplicates.
///
/// Returns `None` if no usable tag remains.
fn normalize_tags(values: &[Value]) -> Option<Vec<String>> {
    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    for tag in values.iter().filter_map(Value::as_str).map(normalize_tag) {
        if tags.len() == MAX_TAGS {
            break;
        }
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    (!tags.is_empty()).then_some(tags)
}

/// Normalize a single tag: "Home Cooking" and "home_cooking" become "home-cooking".
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
