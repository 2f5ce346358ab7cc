//! Registered domain listing.

use edgpt_core::DomainRegistry;

/// Print each registered domain with its landing template and brand name.
#[allow(clippy::print_stdout)]
pub fn list() {
    let registry = DomainRegistry::builtin();
    let default_key = registry.default_brand().key.clone();

    println!("Registered domains:");
    for entry in registry.entries() {
        let marker = if entry.key() == default_key { " (default)" } else { "" };
        println!(
            "  {} -> {} ({}){marker}",
            entry.key(),
            entry.template(),
            entry.brand().name
        );
    }
}
