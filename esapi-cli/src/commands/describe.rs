use anyhow::Result;
use esapi::{ActionRegistry, BodyRequirement};

/// Print everything the table knows about one action
pub fn run_describe(registry: &ActionRegistry, action: &str) -> Result<()> {
    let Some(descriptor) = registry.get(action) else {
        anyhow::bail!(
            "Unknown action '{}'. Run `esapi actions` to list known actions.",
            action
        );
    };

    println!();
    println!("{}", descriptor.name());
    println!("--------------------------------------------------------------------------------");
    if let Some(description) = descriptor.description() {
        println!("  {}", description);
    }
    if let Some(url) = descriptor.documentation() {
        println!("  See: {}", url);
    }
    println!();

    match descriptor.method_with_body() {
        Some(m) => println!("  Method:   {} ({} with body)", descriptor.method(), m),
        None => println!("  Method:   {}", descriptor.method()),
    }

    println!("  Paths:");
    for path in descriptor.paths() {
        let method = path.method().unwrap_or(descriptor.method());
        println!("    {:<6} /{}", method, path.as_str());
    }

    if !descriptor.parts().is_empty() {
        println!("  Parts:");
        for (name, kind) in descriptor.parts() {
            let required = if descriptor.required_parts().contains(name) {
                " (required)"
            } else {
                ""
            };
            println!("    {:<20} {:?}{}", name, kind, required);
        }
    }

    let body = match descriptor.body() {
        BodyRequirement::None => "not accepted",
        BodyRequirement::Optional => "optional",
        BodyRequirement::Required => "required",
    };
    println!("  Body:     {}", body);

    if !descriptor.params().is_empty() {
        println!("  Params:");
        for param in descriptor.params() {
            println!("    {}", param);
        }
    }
    println!();

    Ok(())
}
