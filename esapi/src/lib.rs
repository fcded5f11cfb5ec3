//! esapi: Elasticsearch REST API binding
//!
//! Every API action is a row in a declarative table (`api/actions.yaml`):
//! method, path templates, path parts, accepted query parameters and body
//! requirement. One generic engine turns keyed arguments into a request and
//! hands it to a [`Transport`].
//!
//! # Calling convention
//!
//! - `index` (and other path parts such as `id`) select and fill the path
//!   template, e.g. `{index}/_flush` or `_flush`.
//! - `body` is forwarded untouched; actions that require one fail with
//!   [`Error::MissingRequiredArgument`] before any request is made.
//! - `headers` are sent as HTTP headers.
//! - Everything else is filtered against the action's registered parameters.
//!   Unknown keys and blank values are dropped silently.
//!
//! ```no_run
//! # async fn demo() -> esapi::Result<()> {
//! use esapi::{Arguments, Client, ClientConfig};
//!
//! let client = Client::from_config(&ClientConfig::default())?;
//! let args = Arguments::new().with("index", vec!["logs", "metrics"]).with("force", true);
//! let body = client.perform("indices.flush", &args).await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod registry;
pub mod transport;
pub mod utils;

pub use actions::{ExpandWildcards, FlushArgs, Indices, IndicesExistsArgs, RankEvalArgs, RefreshArgs, SearchType};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::ReqwestTransport;
pub use params::{validate_and_extract_params, Arguments, QueryParams};
pub use registry::{ActionDescriptor, ActionRegistry, BodyRequirement, PartKind};
pub use transport::{HttpMethod, Request, Response, Transport, TransportError};
pub use utils::listify;
