use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use esapi::registry::{ActionDef, ActionRegistry, PathDef};
use esapi::{BodyRequirement, HttpMethod, PartKind};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "xtask", about = "esapi build tasks")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate the action table from Elasticsearch rest-api-spec JSON files
    Codegen(CodegenArgs),
}

#[derive(Parser)]
struct CodegenArgs {
    /// Directory containing the rest-api-spec `api/*.json` files
    #[arg(long)]
    spec_dir: PathBuf,

    /// Output file (default: esapi/api/actions.yaml in the workspace)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only generate actions whose name matches one of these (exact or `ns.*`)
    #[arg(long = "only", value_delimiter = ',')]
    only: Vec<String>,

    /// Fail if the output file differs instead of writing it
    #[arg(long)]
    check: bool,
}

fn workspace_root() -> Result<PathBuf> {
    // xtask lives at <root>/xtask
    if let Ok(dir) = env::var("CARGO_MANIFEST_DIR") {
        let root = PathBuf::from(dir)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(root);
    }
    let mut dir = env::current_dir()?;
    loop {
        if dir.join("Cargo.toml").exists() && dir.join("xtask").is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            bail!("could not locate workspace root");
        }
    }
}

// ---------------------------------------------------------------------------
// rest-api-spec format
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SpecEndpoint {
    #[serde(default)]
    documentation: Option<SpecDocumentation>,
    url: SpecUrl,
    #[serde(default)]
    params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    body: Option<SpecBody>,
}

#[derive(Deserialize)]
struct SpecDocumentation {
    url: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct SpecUrl {
    paths: Vec<SpecPath>,
}

#[derive(Deserialize)]
struct SpecPath {
    path: String,
    methods: Vec<String>,
    #[serde(default)]
    parts: BTreeMap<String, SpecPart>,
}

#[derive(Deserialize)]
struct SpecPart {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct SpecBody {
    #[serde(default)]
    required: bool,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn parse_method(name: &str, raw: &str) -> Result<HttpMethod> {
    raw.parse::<HttpMethod>()
        .map_err(|e| anyhow::anyhow!("{}: {}", name, e))
}

fn convert(name: &str, endpoint: SpecEndpoint) -> Result<ActionDef> {
    let first = endpoint
        .url
        .paths
        .first()
        .with_context(|| format!("{}: no paths", name))?;
    let first_method = first
        .methods
        .first()
        .with_context(|| format!("{}: path {} lists no methods", name, first.path))?;
    let method = parse_method(name, first_method)?;

    let body = match &endpoint.body {
        None => BodyRequirement::None,
        Some(b) if b.required => BodyRequirement::Required,
        Some(_) => BodyRequirement::Optional,
    };

    let method_with_body = if method == HttpMethod::Get
        && body != BodyRequirement::None
        && first.methods.iter().any(|m| m.eq_ignore_ascii_case("POST"))
    {
        Some(HttpMethod::Post)
    } else {
        None
    };

    let mut parts = BTreeMap::new();
    let mut paths = Vec::with_capacity(endpoint.url.paths.len());
    for p in &endpoint.url.paths {
        for (part, spec) in &p.parts {
            let kind = match spec.kind.as_deref() {
                Some("list") => PartKind::List,
                _ => PartKind::String,
            };
            parts.entry(part.clone()).or_insert(kind);
        }
        let path_method = match p.methods.first() {
            Some(m) => Some(parse_method(name, m)?),
            None => None,
        };
        paths.push(PathDef {
            path: p.path.trim_start_matches('/').to_string(),
            method: path_method.filter(|m| *m != method),
        });
    }

    let documentation = endpoint.documentation.unwrap_or(SpecDocumentation {
        url: None,
        description: None,
    });

    Ok(ActionDef {
        description: documentation.description,
        documentation: documentation.url,
        method,
        method_with_body,
        paths,
        parts,
        params: endpoint.params.keys().cloned().collect(),
        body,
    })
}

fn wanted(name: &str, only: &[String]) -> bool {
    only.is_empty()
        || only.iter().any(|o| match o.strip_suffix(".*") {
            Some(ns) => name.strip_prefix(ns).is_some_and(|rest| rest.starts_with('.')),
            None => o == name,
        })
}

fn load_spec_dir(dir: &Path, only: &[String]) -> Result<BTreeMap<String, ActionDef>> {
    let mut actions = BTreeMap::new();

    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|e| e == "json");
        let is_common = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'));
        if !is_json || is_common {
            continue;
        }

        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let endpoints: BTreeMap<String, SpecEndpoint> =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        for (name, endpoint) in endpoints {
            if wanted(&name, only) {
                let def = convert(&name, endpoint)?;
                actions.insert(name, def);
            }
        }
    }

    Ok(actions)
}

fn render(actions: &BTreeMap<String, ActionDef>) -> Result<String> {
    let yaml = serde_yaml::to_string(actions).context("serializing action table")?;
    Ok(format!(
        "# Generated by `cargo xtask codegen`; edit the upstream spec, not this file.\n\n{}",
        yaml
    ))
}

fn run_codegen(args: CodegenArgs) -> Result<()> {
    let actions = load_spec_dir(&args.spec_dir, &args.only)?;
    if actions.is_empty() {
        bail!("no endpoints found in {}", args.spec_dir.display());
    }

    let rendered = render(&actions)?;
    // Whatever we write must load
    ActionRegistry::from_yaml(&rendered).context("generated table does not load")?;

    let output = match args.output {
        Some(p) => p,
        None => workspace_root()?.join("esapi/api/actions.yaml"),
    };

    if args.check {
        let current = fs::read_to_string(&output).unwrap_or_default();
        if current != rendered {
            bail!("{} is out of date; run `cargo xtask codegen`", output.display());
        }
        eprintln!("=> {} is up to date ({} actions)", output.display(), actions.len());
        return Ok(());
    }

    fs::write(&output, rendered).with_context(|| format!("writing {}", output.display()))?;
    eprintln!("=> wrote {} actions to {}", actions.len(), output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Cmd::Codegen(args) => run_codegen(args),
    }
}
