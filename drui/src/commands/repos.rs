use super::{connect, describe_error};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};

/// Keeps repositories whose name starts with `prefix`
pub fn filter_by_prefix(repositories: Vec<String>, prefix: Option<&str>) -> Vec<String> {
    match prefix {
        Some(prefix) => repositories
            .into_iter()
            .filter(|repo| repo.starts_with(prefix))
            .collect(),
        None => repositories,
    }
}

/// Lists repositories, optionally only those under `prefix`
pub async fn run(ctx: &AppContext, prefix: Option<&str>) -> Result<String, String> {
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        "Listing repositories from registry...",
    );

    let (registry, request_ctx) = connect(ctx).await?;
    let repositories = registry
        .repositories(&request_ctx)
        .await
        .map_err(|e| describe_error(&e))?;
    let repositories = filter_by_prefix(repositories, prefix);

    if repositories.is_empty() && ctx.format == OutputFormat::Pretty {
        return Ok("No repositories found.".to_string());
    }
    format::format_lines(&repositories, ctx.format)
}

#[cfg(test)]
#[path = "repos_tests.rs"]
mod tests;
