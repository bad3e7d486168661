//! Highlight spans for search hits.
//!
//! The search endpoint returns highlights as `{path, score, texts: [{value,
//! type: "hit" | "text"}]}`. Those are flattened into [`HighlightTextSpan`]s,
//! merging adjacent pieces with the same state and numbering the hits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightTextSpan {
    pub text: String,
    pub is_highlighted: bool,
    pub index: u64,
}

/// Highlighted fragments of one document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHighlight {
    pub path: String,
    pub score: f64,
    pub spans: Vec<HighlightTextSpan>,
}

pub fn parse_highlights(raw: &Value) -> Vec<FieldHighlight> {
    let Some(items) = raw.as_array() else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| {
            let path = item.get("path").and_then(Value::as_str)?.to_string();
            let score = item.get("score").and_then(Value::as_f64).unwrap_or(0.0);
            let texts = item.get("texts").and_then(Value::as_array).map(|t| t.as_slice()).unwrap_or(&[]);
            let pieces = texts.iter().filter_map(|text| {
                let value = text.get("value").and_then(Value::as_str)?;
                let is_hit = text.get("type").and_then(Value::as_str) == Some("hit");
                Some((value, is_hit))
            });
            Some(FieldHighlight { path, score, spans: decompose_into_spans(pieces) })
        })
        .collect()
}

pub fn decompose_into_spans<'a>(pieces: impl IntoIterator<Item = (&'a str, bool)>) -> Vec<HighlightTextSpan> {
    let mut spans: Vec<HighlightTextSpan> = Vec::new();
    for (text, highlighted) in pieces {
        if text.is_empty() {
            continue;
        }
        if let Some(last) = spans.last_mut() {
            if last.is_highlighted == highlighted {
                last.text.push_str(text);
                continue;
            }
        }
        spans.push(HighlightTextSpan { text: text.to_string(), is_highlighted: highlighted, index: 0 });
    }

    let mut index = 0;
    for span in spans.iter_mut() {
        if span.is_highlighted {
            span.index = index;
            index += 1;
        }
    }
    spans
}
