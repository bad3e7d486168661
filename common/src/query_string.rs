//! Query string encoding for discovery API requests.
//!
//! Scalars with a falsy value (`""`, `0`, `NaN`, `false`, null) are omitted,
//! so `0` cannot be sent and reads the same as "unset". List values are
//! written as one `key=value` pair per element.

use indexmap::IndexMap;

/// Parameters in the order they will be written.
pub type QueryParams = IndexMap<String, QueryValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
    Null,
}

impl QueryValue {
    pub fn is_falsy(&self) -> bool {
        match self {
            QueryValue::Str(s) => s.is_empty(),
            QueryValue::Int(i) => *i == 0,
            QueryValue::Float(f) => *f == 0.0 || f.is_nan(),
            QueryValue::Bool(b) => !*b,
            QueryValue::Null => true,
            // an empty list is still a value, it just writes nothing
            QueryValue::List(_) => false,
        }
    }

    fn scalar_text(&self) -> String {
        match self {
            QueryValue::Str(s) => s.clone(),
            QueryValue::Int(i) => i.to_string(),
            QueryValue::Float(f) => f.to_string(),
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::List(items) => items.join(","),
            QueryValue::Null => String::new(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

/// Encode parameters as `a=1&b=x&list=v1&list=v2`: the scalar block first,
/// then the repeated-key block for list values.
pub fn encode(params: &QueryParams) -> String {
    let mut scalars = Vec::new();
    let mut repeated = Vec::new();

    for (key, value) in params {
        match value {
            QueryValue::List(items) => {
                for item in items {
                    repeated.push(format!("{}={}", urlencoding::encode(key), urlencoding::encode(item)));
                }
            }
            scalar if scalar.is_falsy() => continue,
            scalar => {
                scalars.push(format!("{}={}", urlencoding::encode(key), urlencoding::encode(&scalar.scalar_text())));
            }
        }
    }

    scalars.extend(repeated);
    scalars.join("&")
}
