//! Faceted search filters.
//!
//! A [`Filter`] is one independently enable-able constraint (a year range, a
//! content type list, a creator name...). It maps to backend query
//! parameters through [`Filter::query_params`] and to the browser route
//! through [`Filter::route_params`] / [`Filter::load_from_route`].
//!
//! The value is either held by the filter itself or delegated to closures,
//! which lets a filter act as a view over state owned by another store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::query_string::{QueryParams, QueryValue};
use crate::route_query::{RouteParams, RouteQuery, RouteValue};
use crate::search_const::{MIN_YEAR, max_year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Range,
    SelectOne,
    SelectMultiple,
    Number,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub hint: Option<String>,
    pub icon: Option<String>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into(), hint: None, icon: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// The value of a filter. Which variant is used is fixed by the [`FilterKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Range([i64; 2]),
    Multiple(Vec<String>),
    Text(Option<String>),
    Number(Option<f64>),
}

impl FilterValue {
    /// Mirrors how the page treats values as present or absent: ranges and
    /// lists always count (even empty ones), scalars only when non-empty and
    /// non-zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Range(_) => true,
            FilterValue::Multiple(_) => true,
            FilterValue::Text(text) => text.as_deref().is_some_and(|t| !t.is_empty()),
            FilterValue::Number(n) => n.is_some_and(|n| n != 0.0 && !n.is_nan()),
        }
    }

    /// Reshape `self` to the variant expected by `kind`. A range filter given
    /// anything but a range falls back to `initial_range`.
    fn coerce(self, kind: FilterKind, initial_range: [i64; 2]) -> FilterValue {
        match (kind, self) {
            (FilterKind::Range, FilterValue::Range(range)) => FilterValue::Range(range),
            (FilterKind::Range, _) => FilterValue::Range(initial_range),

            (FilterKind::SelectMultiple, FilterValue::Multiple(items)) => FilterValue::Multiple(items),
            (FilterKind::SelectMultiple, FilterValue::Text(text)) => FilterValue::Multiple(text.into_iter().collect()),
            (FilterKind::SelectMultiple, _) => FilterValue::Multiple(vec![]),

            (FilterKind::Number, FilterValue::Number(n)) => FilterValue::Number(n),
            (FilterKind::Number, FilterValue::Text(text)) => {
                FilterValue::Number(text.and_then(|t| t.trim().parse::<f64>().ok()))
            }
            (FilterKind::Number, _) => FilterValue::Number(None),

            (FilterKind::SelectOne | FilterKind::String, FilterValue::Text(text)) => FilterValue::Text(text),
            (FilterKind::SelectOne | FilterKind::String, FilterValue::Number(n)) => {
                FilterValue::Text(n.map(|n| n.to_string()))
            }
            (FilterKind::SelectOne | FilterKind::String, FilterValue::Multiple(items)) => {
                FilterValue::Text(items.into_iter().next())
            }
            (FilterKind::SelectOne | FilterKind::String, FilterValue::Range(_)) => FilterValue::Text(None),
        }
    }
}

pub type ValueGetter = Arc<dyn Fn() -> FilterValue + Send + Sync>;
pub type ValueSetter = Arc<dyn Fn(FilterValue) + Send + Sync>;
pub type ValueClear = Arc<dyn Fn() + Send + Sync>;

/// Where a filter's value lives.
#[derive(Clone)]
pub enum ValueSource {
    Inline(FilterValue),
    Delegated {
        get: ValueGetter,
        set: ValueSetter,
        clear: Option<ValueClear>,
    },
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Inline(value) => f.debug_tuple("Inline").field(value).finish(),
            ValueSource::Delegated { clear, .. } => f
                .debug_struct("Delegated")
                .field("has_clear", &clear.is_some())
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Filter {
    /// Base name of the backend query parameter.
    pub name: String,
    /// Short key used in the browser route.
    pub url_label: String,
    pub kind: FilterKind,
    pub min: i64,
    pub max: i64,
    pub options: Vec<FilterOption>,
    pub is_enabled: bool,
    initial_range: [i64; 2],
    source: ValueSource,
}

impl Filter {
    pub fn new(kind: FilterKind, name: impl Into<String>, url_label: impl Into<String>) -> Self {
        let min = MIN_YEAR;
        let max = max_year();
        let initial_range = [min, max];
        let mut filter = Self {
            name: name.into(),
            url_label: url_label.into(),
            kind,
            min,
            max,
            options: vec![],
            is_enabled: false,
            initial_range,
            source: ValueSource::Inline(FilterValue::Range(initial_range)),
        };
        filter.source = ValueSource::Inline(filter.zero_value());
        filter
    }

    pub fn range(name: impl Into<String>, url_label: impl Into<String>) -> Self {
        Self::new(FilterKind::Range, name, url_label)
    }

    pub fn select_one(name: impl Into<String>, url_label: impl Into<String>) -> Self {
        Self::new(FilterKind::SelectOne, name, url_label)
    }

    pub fn select_multiple(name: impl Into<String>, url_label: impl Into<String>) -> Self {
        Self::new(FilterKind::SelectMultiple, name, url_label)
    }

    pub fn number(name: impl Into<String>, url_label: impl Into<String>) -> Self {
        Self::new(FilterKind::Number, name, url_label)
    }

    pub fn string(name: impl Into<String>, url_label: impl Into<String>) -> Self {
        Self::new(FilterKind::String, name, url_label)
    }

    /// Set the range bounds; the initial (cleared) range becomes `[min, max]`.
    pub fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self.initial_range = [min, max];
        if let ValueSource::Inline(FilterValue::Range(_)) = self.source {
            self.source = ValueSource::Inline(FilterValue::Range(self.initial_range));
        }
        self
    }

    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    /// Store the value elsewhere. Without a `clear` callback, clearing writes
    /// the zero value through `set`.
    pub fn delegated(mut self, get: ValueGetter, set: ValueSetter, clear: Option<ValueClear>) -> Self {
        self.source = ValueSource::Delegated { get, set, clear };
        self
    }

    pub fn initial_range(&self) -> [i64; 2] {
        self.initial_range
    }

    pub fn value(&self) -> FilterValue {
        let value = match &self.source {
            ValueSource::Inline(value) => value.clone(),
            ValueSource::Delegated { get, .. } => get(),
        };
        value.coerce(self.kind, self.initial_range)
    }

    pub fn set_value(&mut self, value: FilterValue) {
        let value = value.coerce(self.kind, self.initial_range);
        match &mut self.source {
            ValueSource::Inline(current) => *current = value,
            ValueSource::Delegated { set, .. } => set(value),
        }
    }

    /// Selected values of a select-multiple filter; empty for other kinds.
    pub fn selected(&self) -> Vec<String> {
        match self.value() {
            FilterValue::Multiple(items) => items,
            _ => vec![],
        }
    }

    pub fn is_active(&self) -> bool {
        match self.kind {
            FilterKind::Range => self.is_enabled,
            FilterKind::SelectMultiple => self.is_enabled && !self.selected().is_empty(),
            _ => self.value().is_truthy(),
        }
    }

    pub fn enable(&mut self) {
        self.is_enabled = true;
    }

    pub fn disable(&mut self) {
        self.is_enabled = false;
    }

    pub fn toggle(&mut self) {
        self.is_enabled = !self.is_enabled;
    }

    pub fn clear(&mut self) {
        let zero = self.zero_value();
        match &mut self.source {
            ValueSource::Inline(current) => *current = zero,
            ValueSource::Delegated { clear: Some(clear), .. } => clear(),
            ValueSource::Delegated { set, clear: None, .. } => set(zero),
        }
        self.disable();
    }

    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if !self.is_enabled {
            return params;
        }
        let value = self.value();
        if !value.is_truthy() {
            return params;
        }
        match value {
            FilterValue::Range([start, end]) => {
                params.insert(format!("{}Start", self.name), QueryValue::Int(start));
                params.insert(format!("{}End", self.name), QueryValue::Int(end));
            }
            FilterValue::Multiple(items) => {
                params.insert(self.name.clone(), QueryValue::List(items));
            }
            FilterValue::Text(text) => {
                params.insert(self.name.clone(), text.into());
            }
            FilterValue::Number(n) => {
                params.insert(self.name.clone(), n.into());
            }
        }
        params
    }

    pub fn route_params(&self) -> RouteParams {
        let route_value = if self.is_enabled {
            match self.value() {
                FilterValue::Range([start, end]) => Some(RouteValue::Many(vec![start.to_string(), end.to_string()])),
                FilterValue::Multiple(items) => Some(RouteValue::Many(items)),
                FilterValue::Text(text) => text.map(RouteValue::Single),
                FilterValue::Number(n) => n.map(|n| RouteValue::Single(n.to_string())),
            }
        } else {
            None
        };
        let mut params = RouteParams::new();
        params.insert(self.url_label.clone(), route_value);
        params
    }

    /// Enable the filter and take its value from the route, if the route
    /// carries this filter's key. Otherwise the filter is left untouched.
    pub fn load_from_route(&mut self, query: &RouteQuery) {
        let Some(raw) = query.get(&self.url_label) else {
            return;
        };
        self.enable();
        let value = match self.kind {
            FilterKind::Range => {
                let parts = raw.to_list();
                let bound = |i: usize| {
                    parts
                        .get(i)
                        .and_then(|p| p.trim().parse::<f64>().ok())
                        .filter(|n| n.is_finite())
                        .map(|n| n as i64)
                        .unwrap_or(self.initial_range[i])
                };
                FilterValue::Range([bound(0), bound(1)])
            }
            FilterKind::SelectMultiple => FilterValue::Multiple(raw.to_list()),
            FilterKind::Number => FilterValue::Number(raw.first().and_then(|s| s.trim().parse::<f64>().ok())),
            FilterKind::SelectOne | FilterKind::String => {
                FilterValue::Text(Some(raw.first().unwrap_or_default().to_string()))
            }
        };
        self.set_value(value);
    }

    fn zero_value(&self) -> FilterValue {
        match self.kind {
            FilterKind::Range => FilterValue::Range(self.initial_range),
            FilterKind::SelectMultiple => FilterValue::Multiple(vec![]),
            FilterKind::Number => FilterValue::Number(None),
            FilterKind::SelectOne | FilterKind::String => FilterValue::Text(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route_query::route_query_from_pairs;

    #[test]
    fn range_value_stays_a_pair() {
        let mut filter = Filter::range("publicationYear", "py").with_bounds(1950, 2020);
        assert_eq!(filter.initial_range(), [1950, 2020]);
        assert_eq!(filter.value(), FilterValue::Range([1950, 2020]));

        filter.set_value(FilterValue::Text(Some("nonsense".into())));
        assert_eq!(filter.value(), FilterValue::Range([1950, 2020]));

        filter.set_value(FilterValue::Range([1990, 2000]));
        filter.clear();
        assert_eq!(filter.value(), FilterValue::Range(filter.initial_range()));
        assert!(!filter.is_enabled);

        filter.load_from_route(&route_query_from_pairs(vec![("py", "1999")]));
        assert_eq!(filter.value(), FilterValue::Range([1999, 2020]));
    }

    #[test]
    fn disabled_range_emits_nothing() {
        let mut filter = Filter::range("publicationYear", "py").with_bounds(1950, 2020);
        assert!(filter.query_params().is_empty());
        assert_eq!(filter.route_params().get("py"), Some(&None));

        filter.enable();
        let params = filter.query_params();
        assert_eq!(params.get("publicationYearStart"), Some(&QueryValue::Int(1950)));
        assert_eq!(params.get("publicationYearEnd"), Some(&QueryValue::Int(2020)));
        assert_eq!(
            filter.route_params().get("py"),
            Some(&Some(RouteValue::Many(vec!["1950".into(), "2020".into()])))
        );
    }

    #[test]
    fn range_route_values_parse_as_numbers() {
        let mut filter = Filter::range("dataCoverage", "dc").with_bounds(1900, 2024);
        filter.load_from_route(&route_query_from_pairs(vec![("dc", "1980"), ("dc", "x")]));
        assert!(filter.is_active());
        assert_eq!(filter.value(), FilterValue::Range([1980, 2024]));
    }

    #[test]
    fn select_multiple_coerces_single_route_value() {
        let mut filter = Filter::select_multiple("contentType", "ct");
        filter.load_from_route(&route_query_from_pairs(vec![("ct", "x")]));
        let expected = Some(RouteValue::Many(vec!["x".to_string()]));
        assert_eq!(filter.route_params().get("ct"), Some(&expected));

        let mut query = RouteQuery::new();
        query.insert("ct".into(), RouteValue::Many(vec!["x".into()]));
        filter.load_from_route(&query);
        assert_eq!(filter.route_params().get("ct"), Some(&expected));
    }

    #[test]
    fn select_multiple_needs_values_to_be_active() {
        let mut filter = Filter::select_multiple("contentType", "ct");
        filter.enable();
        assert!(!filter.is_active());
        filter.set_value(FilterValue::Multiple(vec!["CSV Data".into()]));
        assert!(filter.is_active());
        filter.disable();
        assert!(!filter.is_active());
        assert!(filter.query_params().is_empty());
    }

    #[test]
    fn scalar_filters_follow_their_value() {
        let mut filter = Filter::string("creatorName", "an");
        assert!(!filter.is_active());
        filter.load_from_route(&route_query_from_pairs(vec![("an", "")]));
        assert!(filter.is_enabled);
        assert!(!filter.is_active());
        assert!(filter.query_params().is_empty());
        assert_eq!(filter.route_params().get("an"), Some(&Some(RouteValue::Single(String::new()))));

        filter.set_value(FilterValue::Text(Some("Tarboton".into())));
        assert!(filter.is_active());
        assert_eq!(filter.query_params().get("creatorName"), Some(&QueryValue::Str("Tarboton".into())));
    }

    #[test]
    fn number_filter_parses_route() {
        let mut filter = Filter::number("minScore", "ms");
        filter.load_from_route(&route_query_from_pairs(vec![("ms", "2.5")]));
        assert_eq!(filter.value(), FilterValue::Number(Some(2.5)));
        assert_eq!(filter.query_params().get("minScore"), Some(&QueryValue::Float(2.5)));

        filter.load_from_route(&route_query_from_pairs(vec![("ms", "abc")]));
        assert_eq!(filter.value(), FilterValue::Number(None));
        assert!(!filter.is_active());
    }

    #[test]
    fn missing_route_key_leaves_filter_alone() {
        let mut filter = Filter::select_one("availability", "a");
        filter.load_from_route(&route_query_from_pairs(vec![("q", "rain")]));
        assert!(!filter.is_enabled);
        assert_eq!(filter.value(), FilterValue::Text(None));
    }

    #[test]
    fn toggle_flips_enabled() {
        let mut filter = Filter::string("subject", "sj");
        filter.toggle();
        assert!(filter.is_enabled);
        filter.toggle();
        assert!(!filter.is_enabled);
    }

    #[test]
    fn delegated_value_reads_and_writes_through() {
        let shared = Arc::new(Mutex::new([2000_i64, 2010_i64]));
        let cleared = Arc::new(Mutex::new(false));

        let get_state = shared.clone();
        let set_state = shared.clone();
        let clear_state = shared.clone();
        let clear_flag = cleared.clone();
        let mut filter = Filter::range("creationDate", "cd").with_bounds(1900, 2024).delegated(
            Arc::new(move || FilterValue::Range(*get_state.lock().unwrap())),
            Arc::new(move |value: FilterValue| {
                if let FilterValue::Range(range) = value {
                    *set_state.lock().unwrap() = range;
                }
            }),
            Some(Arc::new(move || {
                *clear_state.lock().unwrap() = [1900, 2024];
                *clear_flag.lock().unwrap() = true;
            })),
        );

        assert_eq!(filter.value(), FilterValue::Range([2000, 2010]));
        filter.load_from_route(&route_query_from_pairs(vec![("cd", "2001"), ("cd", "2002")]));
        assert_eq!(*shared.lock().unwrap(), [2001, 2002]);

        filter.clear();
        assert!(*cleared.lock().unwrap());
        assert!(!filter.is_enabled);
        assert_eq!(filter.value(), FilterValue::Range([1900, 2024]));
    }

    #[test]
    fn delegated_without_clear_resets_through_setter() {
        let shared = Arc::new(Mutex::new(vec!["a".to_string()]));
        let get_state = shared.clone();
        let set_state = shared.clone();
        let mut filter = Filter::select_multiple("contentType", "ct").delegated(
            Arc::new(move || FilterValue::Multiple(get_state.lock().unwrap().clone())),
            Arc::new(move |value: FilterValue| {
                if let FilterValue::Multiple(items) = value {
                    *set_state.lock().unwrap() = items;
                }
            }),
            None,
        );
        filter.enable();
        assert!(filter.is_active());
        filter.clear();
        assert!(shared.lock().unwrap().is_empty());
    }

    #[test]
    fn content_type_scenario() {
        let mut filter = Filter::select_multiple("contentType", "ct");
        assert!(!filter.is_enabled);

        filter.load_from_route(&route_query_from_pairs(vec![("ct", "CSV Data")]));
        assert!(filter.is_active());
        assert_eq!(filter.value(), FilterValue::Multiple(vec!["CSV Data".into()]));

        let mut expected = QueryParams::new();
        expected.insert("contentType".into(), QueryValue::List(vec!["CSV Data".into()]));
        assert_eq!(filter.query_params(), expected);
    }
}
