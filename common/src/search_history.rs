//! Search history: remembered inputs used for autocomplete suggestions.
//!
//! Entries are keyed by their text; logging the same text again replaces the
//! entry (new kind, new timestamp) instead of adding a second one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::search_const::MAX_RECENT_HINTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryType {
    Term,
    Creator,
    Subject,
    Funder,
    Database,
}

impl HistoryType {
    pub const ALL: [HistoryType; 5] =
        [HistoryType::Term, HistoryType::Creator, HistoryType::Subject, HistoryType::Funder, HistoryType::Database];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::Term => "term",
            HistoryType::Creator => "creator",
            HistoryType::Subject => "subject",
            HistoryType::Funder => "funder",
            HistoryType::Database => "database",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub key: String,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    #[serde(rename = "type")]
    pub kind: HistoryType,
}

/// A history record as persisted. Records written before typed history
/// existed have no `type`, and unknown types may appear after a downgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHistoryRecord {
    pub key: String,
    #[serde(default)]
    pub date: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHistory {
    entries: IndexMap<String, SearchHistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted records, coercing unrecognized types to
    /// [`HistoryType::Term`]. This is the only place records are migrated.
    pub fn from_stored(records: Vec<StoredHistoryRecord>) -> Self {
        let mut history = Self::new();
        for record in records {
            let kind = match record.kind.as_deref().and_then(HistoryType::parse) {
                Some(kind) => kind,
                None => {
                    tracing::debug!(key = %record.key, stored_type = ?record.kind, "migrating history record to term");
                    HistoryType::Term
                }
            };
            history.insert(SearchHistoryEntry { key: record.key, date: record.date, kind });
        }
        history
    }

    pub fn to_stored(&self) -> Vec<StoredHistoryRecord> {
        self.entries
            .values()
            .map(|entry| StoredHistoryRecord {
                key: entry.key.clone(),
                date: entry.date,
                kind: Some(entry.kind.as_str().to_string()),
            })
            .collect()
    }

    pub fn log(&mut self, key: impl Into<String>, kind: HistoryType) {
        self.log_at(key, kind, chrono::Utc::now().timestamp_millis());
    }

    pub fn log_at(&mut self, key: impl Into<String>, kind: HistoryType, date: i64) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        self.insert(SearchHistoryEntry { key, date, kind });
    }

    /// Suggestions of `kind` for the input `text`.
    ///
    /// With empty input: the most recent entries, newest first, at most
    /// [`MAX_RECENT_HINTS`]. Otherwise every entry containing `text`
    /// (case-insensitive) that is longer than it, in insertion order, so an
    /// exact match of what was typed is never suggested.
    pub fn search_hints(&self, text: &str, kind: HistoryType) -> Vec<SearchHistoryEntry> {
        let of_kind = self.entries.values().filter(|entry| entry.kind == kind);

        if text.is_empty() {
            let mut recent: Vec<SearchHistoryEntry> = of_kind.cloned().collect();
            recent.sort_by(|a, b| b.date.cmp(&a.date));
            recent.truncate(MAX_RECENT_HINTS);
            return recent;
        }

        let needle = text.to_lowercase();
        let needle_len = text.chars().count();
        of_kind
            .filter(|entry| entry.key.chars().count() > needle_len && entry.key.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn delete_hint(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&SearchHistoryEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SearchHistoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: SearchHistoryEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }
}
