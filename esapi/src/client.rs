//! The generic action engine
//!
//! [`Client::perform`] runs any action in the registry: it checks required
//! arguments, renders the path, filters parameters and hands the resulting
//! [`Request`] to the transport.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::ReqwestTransport;
use crate::params::{
    extract_params, render_headers, render_query_params, validate_and_extract_params, Arguments,
    BODY, HEADERS,
};
use crate::registry::{self, ActionDescriptor, ActionRegistry, BodyRequirement};
use crate::transport::{Request, Response, Transport};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Entry point for calling actions against a cluster
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    registry: Arc<ActionRegistry>,
    skip_parameter_validation: bool,
}

impl Client {
    /// Client over the built-in action table
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::with_registry(transport, registry::builtin()?))
    }

    /// Client over a custom action table
    pub fn with_registry(transport: Arc<dyn Transport>, registry: Arc<ActionRegistry>) -> Self {
        Self {
            transport,
            registry,
            skip_parameter_validation: false,
        }
    }

    /// Build a reqwest-backed client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        let registry = match &config.actions_file {
            Some(path) => Arc::new(ActionRegistry::from_file(path)?),
            None => registry::builtin()?,
        };
        Ok(Self::with_registry(transport, registry)
            .skip_parameter_validation(config.skip_parameter_validation))
    }

    /// Forward every non-reserved argument instead of filtering against the
    /// action's registered parameters.
    pub fn skip_parameter_validation(mut self, skip: bool) -> Self {
        self.skip_parameter_validation = skip;
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    fn descriptor(&self, action: &str) -> Result<&ActionDescriptor> {
        self.registry
            .get(action)
            .ok_or_else(|| Error::UnknownAction(action.to_string()))
    }

    /// Compose the request for `action` without sending it.
    ///
    /// The caller's arguments are only read; all extraction happens on a copy.
    pub fn build_request(&self, action: &str, arguments: &Arguments) -> Result<Request> {
        let descriptor = self.descriptor(action)?;

        // Required body comes first, ahead of every other check
        let body_supplied = arguments.get(BODY).is_some_and(|b| !b.is_null());
        if descriptor.body() == BodyRequirement::Required && !body_supplied {
            return Err(Error::MissingRequiredArgument(BODY.to_string()));
        }

        let headers = render_headers(arguments.get(HEADERS))?;

        let mut arguments = arguments.clone();
        arguments.remove(HEADERS);
        let body = match descriptor.body() {
            BodyRequirement::None => {
                arguments.remove(BODY);
                None
            }
            BodyRequirement::Optional | BodyRequirement::Required => {
                arguments.remove(BODY).filter(|b| !b.is_null())
            }
        };

        let (method, path) = descriptor.resolve(&arguments, body.is_some())?;

        let options: serde_json::Map<String, Value> = arguments
            .into_map()
            .into_iter()
            .filter(|(key, _)| !descriptor.is_reserved(key))
            .collect();
        let params = if self.skip_parameter_validation {
            extract_params(&options)
        } else {
            validate_and_extract_params(&options, descriptor.accepted_params())
        };

        Ok(Request {
            method,
            path,
            params: render_query_params(&params)?,
            body,
            headers,
        })
    }

    async fn send(&self, action: &str, arguments: &Arguments) -> Result<Response> {
        let request = self.build_request(action, arguments)?;
        debug!(
            action,
            method = %request.method,
            path = %request.path,
            params = request.params.len(),
            "performing request"
        );
        Ok(self.transport.perform_request(request).await?)
    }

    /// Run `action` and return the response body unchanged.
    pub async fn perform(&self, action: &str, arguments: &Arguments) -> Result<Value> {
        Ok(self.send(action, arguments).await?.into_body())
    }

    /// Run a HEAD action and report whether the target exists.
    pub async fn exists(&self, action: &str, arguments: &Arguments) -> Result<bool> {
        let descriptor = self.descriptor(action)?;
        if !descriptor.is_head() {
            return Err(Error::invalid_shape(
                "action",
                format!("'{}' is not a HEAD action", action),
            ));
        }
        let response = self.send(action, arguments).await?;
        Ok(response.status == 200)
    }

    /// Run `action` and return the full response.
    pub async fn perform_raw(&self, action: &str, arguments: &Arguments) -> Result<Response> {
        self.send(action, arguments).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("actions", &self.registry.len())
            .field("skip_parameter_validation", &self.skip_parameter_validation)
            .finish()
    }
}

