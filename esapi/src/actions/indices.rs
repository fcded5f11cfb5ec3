use super::{typed_arguments, ExpandWildcards};
use crate::client::Client;
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The `indices` namespace, borrowed from a [`Client`]
#[derive(Debug, Clone, Copy)]
pub struct Indices<'a> {
    client: &'a Client,
}

/// Arguments for `indices.flush`
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlushArgs {
    /// Index names; empty flushes every index
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<String>,
    /// Flush even if there are no uncommitted changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    /// Block until a concurrent flush finishes instead of skipping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_if_ongoing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unavailable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_indices: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand_wildcards: Vec<ExpandWildcards>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Arguments for `indices.refresh`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshArgs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unavailable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_indices: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand_wildcards: Vec<ExpandWildcards>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Arguments for `indices.exists`
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicesExistsArgs {
    /// Required
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unavailable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_indices: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand_wildcards: Vec<ExpandWildcards>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_settings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_defaults: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'a> Indices<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Flush one or more indices.
    pub async fn flush(&self, args: &FlushArgs) -> Result<Value> {
        self.client
            .perform("indices.flush", &typed_arguments(args, &args.extra)?)
            .await
    }

    /// Refresh one or more indices.
    pub async fn refresh(&self, args: &RefreshArgs) -> Result<Value> {
        self.client
            .perform("indices.refresh", &typed_arguments(args, &args.extra)?)
            .await
    }

    /// Whether all of the given indices exist.
    pub async fn exists(&self, args: &IndicesExistsArgs) -> Result<bool> {
        self.client
            .exists("indices.exists", &typed_arguments(args, &args.extra)?)
            .await
    }
}
