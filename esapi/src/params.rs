//! Caller arguments and query-parameter filtering

use crate::error::{Error, Result};
use crate::utils::{is_blank, listify_with};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query parameters accepted by every action.
pub const COMMON_QUERY_PARAMS: &[&str] = &["pretty", "human", "error_trace", "filter_path", "format"];

/// Reserved key holding the request body.
pub const BODY: &str = "body";

/// Reserved key holding per-request HTTP headers.
pub const HEADERS: &str = "headers";

/// Filtered query parameters, keyed by parameter name.
pub type QueryParams = Map<String, Value>;

/// Keyed arguments for one action call.
///
/// Holds the reserved keys (`index`, `body`, `headers`, other path parts)
/// alongside the action's optional parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` carries a non-blank value.
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !is_blank(v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Serialize a typed argument struct into the generic mapping.
    pub fn from_serialize<T: Serialize>(args: &T) -> Result<Self> {
        Self::try_from(serde_json::to_value(args)?)
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Arguments {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::invalid_shape(
                "arguments",
                format!("expected a mapping, got {}", other),
            )),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Keep only the arguments named in `allowed` whose values are not blank.
///
/// Unrecognised keys are dropped without error so that newer server-side
/// parameters never break older callers. The input is left untouched.
pub fn validate_and_extract_params<S: AsRef<str>>(
    arguments: &Map<String, Value>,
    allowed: &[S],
) -> QueryParams {
    arguments
        .iter()
        .filter(|(key, value)| allowed.iter().any(|a| a.as_ref() == key.as_str()) && !is_blank(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Like [`validate_and_extract_params`] without the allow-list: every
/// non-blank argument passes.
pub fn extract_params(arguments: &Map<String, Value>) -> QueryParams {
    arguments
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Render query parameter values as strings; sequences become comma lists.
pub fn render_query_params(params: &QueryParams) -> Result<BTreeMap<String, String>> {
    params
        .iter()
        .map(|(key, value)| {
            let rendered = listify_with(value, false).map_err(|reason| Error::invalid_shape(key.as_str(), reason))?;
            Ok((key.clone(), rendered))
        })
        .collect()
}

/// Render the reserved `headers` argument as a string map.
pub fn render_headers(value: Option<&Value>) -> Result<BTreeMap<String, String>> {
    match value {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, v)| {
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| Error::invalid_shape(HEADERS, format!("'{}': {}", name, e)))?;
                let rendered = crate::utils::scalar_to_string(v).ok_or_else(|| {
                    Error::invalid_shape(HEADERS, format!("header '{}' must be a scalar", name))
                })?;
                HeaderValue::from_str(&rendered)
                    .map_err(|e| Error::invalid_shape(HEADERS, format!("'{}': {}", name, e)))?;
                Ok((name.clone(), rendered))
            })
            .collect(),
        Some(other) => Err(Error::invalid_shape(
            HEADERS,
            format!("expected a mapping of header names to values, got {}", other),
        )),
    }
}
