//! Search result records and parsing of raw discovery hits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text_highlight::{FieldHighlight, parse_highlights};

/// A search hit normalized for display. Every optional field of the raw
/// document falls back to an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchResultRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub creator: Vec<String>,
    pub contributor: Vec<String>,
    pub date_created: String,
    pub date_modified: String,
    pub date_published: String,
    pub keywords: Vec<String>,
    pub funding: Vec<String>,
    pub license: String,
    pub content_type: String,
    pub sharing_status: String,
    pub spatial_coverage: Option<Value>,
    pub temporal_coverage: Option<TemporalCoverage>,
    pub highlights: Vec<FieldHighlight>,
    pub score: f64,
    pub pagination_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemporalCoverage {
    pub start_date: String,
    pub end_date: String,
}

/// Parse the search endpoint's response body: a JSON array of raw hits.
pub fn parse_search_hits(body: &Value) -> Result<Vec<SearchResultRecord>, String> {
    let Some(hits) = body.as_array() else {
        return Err(format!("expected an array of search hits, got {}", value_kind(body)));
    };
    Ok(hits.iter().map(SearchResultRecord::from_raw_hit).collect())
}

impl SearchResultRecord {
    pub fn from_raw_hit(hit: &Value) -> Self {
        let empty = Value::Null;
        let doc = hit.get("document").and_then(|d| d.get(0)).unwrap_or(&empty);

        Self {
            id: str_field(doc, "_id"),
            name: str_field(doc, "name"),
            url: str_field(doc, "url"),
            description: str_field(doc, "description"),
            creator: names(doc.get("creator")),
            contributor: names(doc.get("contributor")),
            date_created: str_field(doc, "dateCreated"),
            date_modified: str_field(doc, "dateModified"),
            date_published: str_field(doc, "datePublished"),
            keywords: names(doc.get("keywords")),
            funding: funding(doc.get("funding")),
            license: license(doc.get("license")),
            content_type: str_field(doc, "additionalType"),
            sharing_status: str_field(doc, "creativeWorkStatus"),
            spatial_coverage: doc.get("spatialCoverage").filter(|v| !v.is_null()).cloned(),
            temporal_coverage: doc.get("temporalCoverage").and_then(temporal_coverage),
            highlights: hit.get("highlights").map(parse_highlights).unwrap_or_default(),
            score: hit.get("score").and_then(Value::as_f64).unwrap_or(0.0),
            pagination_token: hit.get("paginationToken").and_then(Value::as_str).unwrap_or_default().to_string(),
        }
    }
}

fn str_field(doc: &Value, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Flatten a list of `string | {name}` entries into names.
fn names(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(|s| s.to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn funding(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| {
            let funder = item.get("funder");
            let funder = match funder {
                Some(Value::Array(funders)) => funders.first(),
                other => other,
            };
            funder
                .and_then(|f| f.get("name"))
                .or_else(|| item.get("name"))
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        })
        .collect()
}

fn license(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj.get("text").or_else(|| obj.get("name")).and_then(Value::as_str).unwrap_or_default().to_string(),
        _ => String::new(),
    }
}

fn temporal_coverage(raw: &Value) -> Option<TemporalCoverage> {
    let start_date = str_field(raw, "startDate");
    let end_date = str_field(raw, "endDate");
    if start_date.is_empty() && end_date.is_empty() {
        return None;
    }
    Some(TemporalCoverage { start_date, end_date })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn full_hit_is_normalized() {
        let hit = json!({
            "document": [{
                "_id": "abc123",
                "name": "Logan River streamflow",
                "url": "https://example.org/resource/abc123",
                "description": "Daily streamflow",
                "creator": [{"name": "Jane Doe"}, {"name": ""}, "John Roe", 42],
                "contributor": [{"name": "Ann Lee"}],
                "dateCreated": "2019-04-01T00:00:00Z",
                "dateModified": "2020-01-01T00:00:00Z",
                "datePublished": "2020-02-01T00:00:00Z",
                "keywords": ["hydrology", {"name": "streamflow"}, {"label": "ignored"}],
                "funding": [{"name": "Grant 1", "funder": {"name": "NSF"}}, {"name": "Grant 2", "funder": [{"name": "USGS"}]}, {"name": "Unnamed funder grant"}],
                "license": {"text": "CC-BY", "url": "https://creativecommons.org"},
                "additionalType": "CSV Data",
                "creativeWorkStatus": "Public",
                "spatialCoverage": {"geo": {"latitude": 41.7, "longitude": -111.8}},
                "temporalCoverage": {"startDate": "2001-01-01", "endDate": "2002-01-01"}
            }],
            "highlights": [{"path": "name", "score": 3.0, "texts": [{"value": "Logan", "type": "hit"}]}],
            "score": 7.25,
            "paginationToken": "tok-1"
        });

        let record = SearchResultRecord::from_raw_hit(&hit);
        assert_eq!(record.id, "abc123");
        assert_eq!(record.creator, vec!["Jane Doe".to_string(), "John Roe".to_string()]);
        assert_eq!(record.contributor, vec!["Ann Lee".to_string()]);
        assert_eq!(record.keywords, vec!["hydrology".to_string(), "streamflow".to_string()]);
        assert_eq!(record.funding, vec!["NSF".to_string(), "USGS".to_string(), "Unnamed funder grant".to_string()]);
        assert_eq!(record.license, "CC-BY");
        assert_eq!(record.content_type, "CSV Data");
        assert_eq!(record.sharing_status, "Public");
        assert_eq!(
            record.temporal_coverage,
            Some(TemporalCoverage { start_date: "2001-01-01".into(), end_date: "2002-01-01".into() })
        );
        assert!(record.spatial_coverage.is_some());
        assert_eq!(record.highlights.len(), 1);
        assert_eq!(record.score, 7.25);
        assert_eq!(record.pagination_token, "tok-1");
    }

    #[test]
    fn missing_fields_fall_back_to_empty() {
        let record = SearchResultRecord::from_raw_hit(&json!({"document": []}));
        assert_eq!(record, SearchResultRecord::default());

        let record = SearchResultRecord::from_raw_hit(&json!({
            "document": [{"creator": "not a list", "license": "MIT", "temporalCoverage": {}}],
            "paginationToken": 5
        }));
        assert!(record.creator.is_empty());
        assert_eq!(record.license, "MIT");
        assert_eq!(record.temporal_coverage, None);
        assert_eq!(record.pagination_token, "");
    }

    #[test]
    fn body_must_be_an_array() {
        assert_eq!(parse_search_hits(&json!([])).map(|v| v.len()), Ok(0));
        let err = parse_search_hits(&json!({"error": "boom"})).unwrap_err();
        assert!(err.contains("an object"), "{err}");
    }
}
