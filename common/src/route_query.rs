//! Route (browser URL) query model shared by filters and the search page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query_string::{self, QueryParams, QueryValue};

/// A parsed route query value. The router hands back a single string for a
/// key that appears once and a list when it repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteValue {
    Single(String),
    Many(Vec<String>),
}

impl RouteValue {
    pub fn first(&self) -> Option<&str> {
        match self {
            RouteValue::Single(s) => Some(s.as_str()),
            RouteValue::Many(items) => items.first().map(|s| s.as_str()),
        }
    }

    pub fn to_list(&self) -> Vec<String> {
        match self {
            RouteValue::Single(s) => vec![s.clone()],
            RouteValue::Many(items) => items.clone(),
        }
    }
}

impl From<&str> for RouteValue {
    fn from(value: &str) -> Self {
        RouteValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for RouteValue {
    fn from(value: Vec<&str>) -> Self {
        RouteValue::Many(value.into_iter().map(|s| s.to_string()).collect())
    }
}

/// The query object as parsed by the router.
pub type RouteQuery = BTreeMap<String, RouteValue>;

/// Route updates produced by filters. `None` drops the key from the URL.
pub type RouteParams = BTreeMap<String, Option<RouteValue>>;

/// Build a route query from `key=value` pairs; repeated keys collect into a list.
pub fn route_query_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RouteQuery
where
    K: Into<String>,
    V: Into<String>,
{
    let mut query = RouteQuery::new();
    for (key, value) in pairs {
        let key = key.into();
        let value = value.into();
        let merged = match query.remove(&key) {
            None => RouteValue::Single(value),
            Some(RouteValue::Single(prev)) => RouteValue::Many(vec![prev, value]),
            Some(RouteValue::Many(mut prev)) => {
                prev.push(value);
                RouteValue::Many(prev)
            }
        };
        query.insert(key, merged);
    }
    query
}

/// Apply filter route updates the way the router does: `None` removes the key.
pub fn apply_route_params(query: &mut RouteQuery, params: RouteParams) {
    for (key, value) in params {
        match value {
            Some(value) => {
                query.insert(key, value);
            }
            None => {
                query.remove(&key);
            }
        }
    }
}

/// Render a route query as a URL query string.
pub fn route_query_string(query: &RouteQuery) -> String {
    let params: QueryParams = query
        .iter()
        .map(|(key, value)| {
            let value = match value {
                RouteValue::Single(s) => QueryValue::Str(s.clone()),
                RouteValue::Many(items) => QueryValue::List(items.clone()),
            };
            (key.clone(), value)
        })
        .collect();
    query_string::encode(&params)
}
