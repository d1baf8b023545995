//! Query parameter mapping and rendering.
//!
//! # Design
//! Pairs are stored in insertion order so rendering is deterministic.
//! Inserting a key that is already present replaces its value in place,
//! keeping the original position, so a key never renders twice. Absent values
//! are kept in the mapping but omitted from the rendering, which lets
//! callers thread `Option`s straight through without filtering first.

use url::form_urlencoded;

/// A scalar query parameter value, or its absence.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Absent,
}

impl QueryValue {
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(i) => Some(i.to_string()),
            QueryValue::Float(x) => Some(x.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Absent => None,
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

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
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

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

/// An ordered mapping of query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Bulk constructor. Later duplicates overwrite earlier ones in place,
    /// exactly as repeated [`push`](Query::push) calls would.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        let mut query = Self::new();
        for (key, value) in pairs {
            query.push(key, value);
        }
        query
    }

    /// Insert a pair, replacing the value in place if the key exists.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<QueryValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// True when no pairs are stored. A pair with an absent value still
    /// counts as stored; it only disappears from the rendering.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render to `key1=value1&key2=value2&...` in insertion order.
    ///
    /// Absent values are omitted, keys and values are percent-encoded with
    /// `application/x-www-form-urlencoded` rules. An empty mapping (or one
    /// holding only absent values) renders as the empty string.
    pub fn render(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            if let Some(value) = value.render() {
                serializer.append_pair(key, &value);
            }
        }
        serializer.finish()
    }
}
