use super::{confirm, connect, describe_error};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use std::io::BufRead;

/// Deletes the manifest behind `image:tag`
///
/// Refused when `disable_delete` is set. Without `force` the user is asked
/// to confirm on `input`; other tags of the same manifest are deleted too.
pub async fn run(
    ctx: &AppContext,
    image: &str,
    tag: &str,
    force: bool,
    input: &mut impl BufRead,
) -> Result<String, String> {
    if ctx.config.disable_delete {
        return Err("Deleting is disabled by configuration (disable_delete).".to_string());
    }

    if !force && !confirm(&format!("Delete image '{}:{}'?", image, tag), input)? {
        return Ok("Aborted.".to_string());
    }

    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Deleting image '{}:{}'...", image, tag),
    );

    let (registry, request_ctx) = connect(ctx).await?;
    let deleted = registry
        .delete(&request_ctx, image, tag)
        .await
        .map_err(|e| describe_error(&e))?;

    if deleted {
        Ok(format!("{}:{} successfully deleted", image, tag))
    } else {
        Err(format!("{}:{} not found", image, tag))
    }
}

#[cfg(test)]
#[path = "delete_tests.rs"]
mod tests;
