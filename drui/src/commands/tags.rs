use super::{connect, describe_error};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};
use libdrui::Lookup;

/// Lists the tags of `image` in version order
pub async fn run(ctx: &AppContext, image: &str) -> Result<String, String> {
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Listing tags for image: {}", image),
    );

    let (registry, request_ctx) = connect(ctx).await?;
    let tags = registry
        .tags(&request_ctx, image)
        .await
        .map_err(|e| describe_error(&e))?;

    match tags {
        Lookup::Found(tags) if !tags.is_empty() || ctx.format != OutputFormat::Pretty => {
            format::format_lines(&tags, ctx.format)
        }
        Lookup::NotFound if ctx.format != OutputFormat::Pretty => {
            format::format_lines(&[], ctx.format)
        }
        _ => Ok(format!("Repository {} is empty.", image)),
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
