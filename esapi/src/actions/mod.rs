//! Typed entry points over the generic engine
//!
//! Each argument struct serialises into [`Arguments`] and runs through
//! [`Client::perform`], so typed and untyped calls share one code path.
//! `extra` carries parameters the struct does not know about yet; it may not
//! set `index`, `body` or `headers`, which belong to the typed fields.

mod indices;

pub use indices::{FlushArgs, Indices, IndicesExistsArgs, RefreshArgs};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::params::{Arguments, BODY, HEADERS};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Which indices a wildcard expression may expand to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandWildcards {
    Open,
    Closed,
    Hidden,
    None,
    All,
}

/// Search operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    QueryThenFetch,
    DfsQueryThenFetch,
}

/// Arguments for `rank_eval`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankEvalArgs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unavailable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_indices: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand_wildcards: Vec<ExpandWildcards>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    /// Search requests, document ratings and metric definition (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys only the typed fields may set
const TYPED_KEYS: &[&str] = &["index", BODY, HEADERS];

/// Serialize typed arguments, refusing `extra` entries that would shadow a
/// typed field.
pub(crate) fn typed_arguments<T: Serialize>(args: &T, extra: &Map<String, Value>) -> Result<Arguments> {
    if let Some(key) = extra.keys().find(|k| TYPED_KEYS.contains(&k.as_str())) {
        return Err(Error::invalid_shape(
            key.as_str(),
            "set through the typed field, not `extra`",
        ));
    }
    Arguments::from_serialize(args)
}

impl Client {
    /// Evaluate the quality of ranked search results over a set of queries.
    pub async fn rank_eval(&self, args: &RankEvalArgs) -> Result<Value> {
        self.perform("rank_eval", &typed_arguments(args, &args.extra)?).await
    }

    /// Basic information about the cluster
    pub async fn info(&self) -> Result<Value> {
        self.perform("info", &Arguments::new()).await
    }

    /// Whether the cluster answers at all
    pub async fn ping(&self) -> Result<bool> {
        self.exists("ping", &Arguments::new()).await
    }

    /// Index-level actions
    pub fn indices(&self) -> Indices<'_> {
        Indices::new(self)
    }
}
