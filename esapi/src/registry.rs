//! Action descriptors and the registry holding them
//!
//! Every action is described by data, not code: its HTTP method, the path
//! templates it can render, the path parts it consumes, the optional query
//! parameters it accepts and whether it takes a body. The built-in table is
//! `api/actions.yaml`, parsed once on first use and read-only afterwards.
//!
//! # Table format
//!
//! ```yaml
//! indices.flush:
//!   method: POST
//!   paths:
//!     - path: "{index}/_flush"
//!     - path: "_flush"
//!   parts:
//!     index: list
//!   params: [force, wait_if_ongoing]
//!   body: none          # none | optional | required
//! ```

use crate::error::{Error, Result};
use crate::params::{Arguments, COMMON_QUERY_PARAMS};
use crate::transport::HttpMethod;
use crate::utils::{escape, listify_with, scalar_to_string};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// The action table shipped with the crate
pub const BUILTIN_ACTIONS: &str = include_str!("../api/actions.yaml");

/// How a path part is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Scalar or sequence, comma-joined (index names)
    List,
    /// Single escaped value (document ids)
    String,
}

/// Whether an action takes a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRequirement {
    #[default]
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Part(String),
}

/// One path template such as `{index}/_flush`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    segments: Vec<Segment>,
    method: Option<HttpMethod>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let template = template.trim_start_matches('/');
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let close = rest[open..].find('}').ok_or_else(|| {
                Error::Registry(format!("unclosed '{{' in path template '{}'", template))
            })? + open;
            let name = &rest[open + 1..close];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(Error::Registry(format!(
                    "invalid part name '{}' in path template '{}'",
                    name, template
                )));
            }
            segments.push(Segment::Part(name.to_string()));
            rest = &rest[close + 1..];
        }
        if rest.contains('}') {
            return Err(Error::Registry(format!(
                "unmatched '}}' in path template '{}'",
                template
            )));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            method: None,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Method override for this path, if any
    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// Names of the parts this template consumes, in order
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Part(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn matches(&self, arguments: &Arguments) -> bool {
        self.parts().all(|p| arguments.is_present(p))
    }

    fn render(&self, arguments: &Arguments, kinds: &BTreeMap<String, PartKind>) -> Result<String> {
        let mut path = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Part(name) => {
                    let value = arguments
                        .get(name)
                        .ok_or_else(|| Error::MissingRequiredArgument(name.clone()))?;
                    let rendered = match kinds.get(name).copied().unwrap_or(PartKind::String) {
                        PartKind::List => listify_with(value, true)
                            .map_err(|reason| Error::invalid_shape(name.as_str(), reason))?,
                        PartKind::String => scalar_to_string(value).map(|s| escape(&s)).ok_or_else(|| {
                            Error::invalid_shape(name.as_str(), "expected a single scalar value")
                        })?,
                    };
                    path.push_str(&rendered);
                }
            }
        }
        Ok(path)
    }
}

/// Immutable description of one API action
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    name: String,
    description: Option<String>,
    documentation: Option<String>,
    method: HttpMethod,
    method_with_body: Option<HttpMethod>,
    paths: Vec<PathTemplate>,
    parts: BTreeMap<String, PartKind>,
    required_parts: Vec<String>,
    params: Vec<String>,
    accepted: Vec<String>,
    body: BodyRequirement,
}

impl ActionDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `indices` for `indices.flush`, `None` for top-level actions
    pub fn namespace(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(ns, _)| ns)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn method_with_body(&self) -> Option<HttpMethod> {
        self.method_with_body
    }

    /// Templates ordered from most to least specific
    pub fn paths(&self) -> &[PathTemplate] {
        &self.paths
    }

    pub fn parts(&self) -> &BTreeMap<String, PartKind> {
        &self.parts
    }

    /// Parts present in every template; the action cannot run without them
    pub fn required_parts(&self) -> &[String] {
        &self.required_parts
    }

    /// The action's own registered parameters
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Registered parameters plus the common query parameters
    pub fn accepted_params(&self) -> &[String] {
        &self.accepted
    }

    pub fn body(&self) -> BodyRequirement {
        self.body
    }

    pub fn is_head(&self) -> bool {
        self.method == HttpMethod::Head
    }

    /// Keys consumed by the action itself rather than sent as parameters
    pub fn is_reserved(&self, key: &str) -> bool {
        key == crate::params::BODY || key == crate::params::HEADERS || self.parts.contains_key(key)
    }

    /// Pick the most specific template whose parts are all supplied.
    pub fn select_path(&self, arguments: &Arguments) -> Result<&PathTemplate> {
        if let Some(missing) = self.required_parts.iter().find(|p| !arguments.is_present(p)) {
            return Err(Error::MissingRequiredArgument(missing.clone()));
        }
        self.paths.iter().find(|p| p.matches(arguments)).ok_or_else(|| {
            let wanted = self
                .paths
                .last()
                .and_then(|p| p.parts().find(|part| !arguments.is_present(part)))
                .unwrap_or_default();
            Error::MissingRequiredArgument(wanted.to_string())
        })
    }

    /// Render the selected template and resolve the method.
    pub fn resolve(&self, arguments: &Arguments, has_body: bool) -> Result<(HttpMethod, String)> {
        let template = self.select_path(arguments)?;
        let path = template.render(arguments, &self.parts)?;
        let method = match (has_body, self.method_with_body) {
            (true, Some(m)) => m,
            _ => template.method().unwrap_or(self.method),
        };
        Ok((method, path))
    }
}

// -- YAML deserialization types -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_with_body: Option<HttpMethod>,
    pub paths: Vec<PathDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parts: BTreeMap<String, PartKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "is_no_body")]
    pub body: BodyRequirement,
}

fn is_no_body(body: &BodyRequirement) -> bool {
    *body == BodyRequirement::None
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathDef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}

impl ActionDef {
    /// Validate and freeze into a descriptor
    pub fn into_descriptor(self, name: &str) -> Result<ActionDescriptor> {
        if self.paths.is_empty() {
            return Err(Error::Registry(format!("action '{}' has no paths", name)));
        }

        let mut paths = Vec::with_capacity(self.paths.len());
        for def in &self.paths {
            let mut template = PathTemplate::parse(&def.path)?;
            template.method = def.method;
            if let Some(part) = template.parts().find(|p| !self.parts.contains_key(*p)) {
                return Err(Error::Registry(format!(
                    "action '{}': path '{}' uses undeclared part '{}'",
                    name, def.path, part
                )));
            }
            paths.push(template);
        }
        // Most specific first; stable so the table order breaks ties
        paths.sort_by_key(|p| std::cmp::Reverse(p.parts().count()));

        let required_parts = self
            .parts
            .keys()
            .filter(|part| paths.iter().all(|p| p.parts().any(|q| q == part.as_str())))
            .cloned()
            .collect();

        let mut params: Vec<String> = Vec::with_capacity(self.params.len());
        for p in self.params {
            if !params.contains(&p) {
                params.push(p);
            }
        }
        let mut accepted = params.clone();
        for common in COMMON_QUERY_PARAMS {
            if !accepted.iter().any(|p| p == common) {
                accepted.push(common.to_string());
            }
        }

        Ok(ActionDescriptor {
            name: name.to_string(),
            description: self.description,
            documentation: self.documentation,
            method: self.method,
            method_with_body: self.method_with_body,
            paths,
            parts: self.parts,
            required_parts,
            params,
            accepted,
            body: self.body,
        })
    }
}

/// Registry of all known actions, keyed by name
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, ActionDescriptor>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Each name may be registered once.
    pub fn register(&mut self, descriptor: ActionDescriptor) -> Result<()> {
        if self.actions.contains_key(descriptor.name()) {
            return Err(Error::Registry(format!(
                "action '{}' registered twice",
                descriptor.name()
            )));
        }
        self.actions.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    /// Registered parameter names for an action; empty if it is unknown.
    pub fn params(&self, name: &str) -> &[String] {
        self.actions.get(name).map(|d| d.params()).unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Build a registry from a YAML action table.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let defs: BTreeMap<String, ActionDef> = serde_yaml::from_str(content)?;
        let mut registry = Self::new();
        for (name, def) in defs {
            registry.register(def.into_descriptor(&name)?)?;
        }
        trace!(actions = registry.len(), "loaded action table");
        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Registry(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }
}

static BUILTIN: OnceLock<std::result::Result<Arc<ActionRegistry>, String>> = OnceLock::new();

/// The built-in registry, parsed on first use and shared afterwards.
pub fn builtin() -> Result<Arc<ActionRegistry>> {
    BUILTIN
        .get_or_init(|| {
            ActionRegistry::from_yaml(BUILTIN_ACTIONS)
                .map(Arc::new)
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(Error::Registry)
}
