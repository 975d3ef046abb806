use super::connect;
use crate::context::{AppContext, VerbosityLevel};
use crate::format;

/// Validates the given credentials against the registry
pub async fn run(ctx: &AppContext) -> Result<String, String> {
    let Some(credentials) = ctx.credentials() else {
        return Err("No credentials given. Pass --username or set DRUI_USERNAME.".to_string());
    };

    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Logging in as {}...", credentials.username()),
    );

    let (registry, request_ctx) = connect(ctx).await?;
    let provider = request_ctx
        .session()
        .provider()
        .map(|p| p.to_string())
        .unwrap_or_default();

    Ok(format!(
        "Logged in to {} as {} ({})",
        registry.registry_url(),
        credentials.username(),
        provider
    ))
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
