//! Argument bag handed over by the hosting runtime, with typed accessors.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Flat key/value parameters of one invocation. Consumed once, never persisted.
#[derive(Clone, Debug, Default)]
pub struct ArgumentBag {
    params: Map<String, Value>,
}

impl ArgumentBag {
    pub fn new(params: Map<String, Value>) -> Self {
        ArgumentBag { params }
    }

    /// Non-object input yields an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(params) => ArgumentBag { params },
            _ => ArgumentBag::default(),
        }
    }

    /// Builds a bag from `key=value` pairs; entries without `=` are skipped and later keys win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Map::new();
        for pair in pairs {
            if let Some((k, v)) = pair.as_ref().split_once('=') {
                params.insert(k.to_string(), Value::String(v.to_string()));
            }
        }
        ArgumentBag { params }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Exact key first, then a case-insensitive match. Nulls count as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params
            .get(key)
            .or_else(|| {
                self.params
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .filter(|v| !v.is_null())
    }

    /// String form of a scalar value (numbers and booleans are rendered).
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `Ok(None)` when absent, `Err(raw)` when present but not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, String> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(other.to_string()),
        }
    }

    /// `Ok(None)` when absent, `Err(raw)` when present but not a UUID.
    pub fn get_uuid(&self, key: &str) -> Result<Option<Uuid>, String> {
        match self.get_str(key) {
            None => Ok(None),
            Some(s) => Uuid::parse_str(s.trim()).map(Some).map_err(|_| s),
        }
    }

    /// True when the value equals `expected`, ignoring case. `TRUE` also matches a JSON `true`.
    pub fn flag(&self, key: &str, expected: &str) -> bool {
        self.get_str(key)
            .map(|v| v.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }
}

impl From<Map<String, Value>> for ArgumentBag {
    fn from(params: Map<String, Value>) -> Self {
        ArgumentBag::new(params)
    }
}
