use anyhow::{Context, Result};
use esapi::{Arguments, Client};
use serde_json::{Map, Value};
use std::io::Read;

/// Parse `KEY=VALUE` pairs; values are JSON when they parse, strings
/// otherwise. A repeated key collects its values into a list.
pub fn parse_arguments(pairs: &[String]) -> Result<Arguments> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Argument '{}' is not KEY=VALUE", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Argument '{}' has an empty key", pair);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        match map.remove(key) {
            None => {
                map.insert(key.to_string(), value);
            }
            Some(Value::Array(mut items)) => {
                items.push(value);
                map.insert(key.to_string(), Value::Array(items));
            }
            Some(previous) => {
                map.insert(key.to_string(), Value::Array(vec![previous, value]));
            }
        }
    }
    Ok(Arguments::from(map))
}

/// Parse `NAME:VALUE` header pairs
pub fn parse_headers(pairs: &[String]) -> Result<Map<String, Value>> {
    pairs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once(':')
                .with_context(|| format!("Header '{}' is not NAME:VALUE", pair))?;
            Ok((name.trim().to_string(), Value::String(value.trim().to_string())))
        })
        .collect()
}

fn read_body(source: &str) -> Result<Value> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read body from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read body file {:?}", source))?
    };
    serde_json::from_str(&text).context("Body is not valid JSON")
}

/// Run one action and print the response body
pub async fn run_call(
    client: &Client,
    action: &str,
    args: &[String],
    body: Option<&str>,
    headers: &[String],
    dry_run: bool,
) -> Result<()> {
    let mut arguments = parse_arguments(args)?;
    if let Some(source) = body {
        arguments.insert("body", read_body(source)?);
    }
    if !headers.is_empty() {
        arguments.insert("headers", Value::Object(parse_headers(headers)?));
    }

    if dry_run {
        let request = client.build_request(action, &arguments)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let is_head = client.registry().get(action).is_some_and(|d| d.is_head());
    if is_head {
        let found = client.exists(action, &arguments).await?;
        println!("{}", found);
        return Ok(());
    }

    let response = client
        .perform(action, &arguments)
        .await
        .with_context(|| format!("{} failed", action))?;
    match response {
        Value::String(text) => print!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}
