use esapi::ActionRegistry;

/// Print action names, optionally limited to one namespace
pub fn run_actions(registry: &ActionRegistry, namespace: Option<&str>) {
    for descriptor in registry.iter() {
        if namespace.is_some() && descriptor.namespace() != namespace {
            continue;
        }
        println!("{:<24} {}", descriptor.name(), descriptor.method());
    }
}
