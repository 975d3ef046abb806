//! Basic usage example for libdrui.
//!
//! Lists every repository of a registry with its tags and the platform of
//! the default tag.
//!
//! Run with: DRUI_REGISTRY_ENDPOINT=http://localhost:5000 cargo run --example basic_usage

use libdrui::{Config, Lookup, Registry, RequestContext, default_tag};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::default();
    config.apply_env();
    if config.registry.endpoint.is_none() {
        config.registry.endpoint = Some("http://localhost:5000".to_string());
    }

    let registry = Registry::from_config(&config)?;
    let ctx = RequestContext::default();
    println!("Registry: {}\n", registry.registry_url());

    for repo in registry.repositories(&ctx).await? {
        let Lookup::Found(tags) = registry.tags(&ctx, &repo).await? else {
            println!("{} (empty)", repo);
            continue;
        };
        println!("{}: {}", repo, tags.join(", "));

        let Some(tag) = default_tag(&tags) else {
            continue;
        };
        if let Lookup::Found(manifest) = registry.manifest(&ctx, &repo, tag, None).await? {
            println!(
                "  {}:{} {}/{} {}",
                repo,
                tag,
                manifest.os().unwrap_or("?"),
                manifest.architecture().unwrap_or("?"),
                manifest.digest
            );
        }
    }

    Ok(())
}
