use super::{connect, describe_error};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, Formattable};
use chrono::{DateTime, Local};
use libdrui::{Lookup, ResolvedManifest, default_tag};
use serde::Serialize;

/// An image tag as shown by `drui show`
#[derive(Debug, Serialize)]
pub struct ImageView {
    pub image: String,
    pub tag: String,
    /// `docker pull` reference for this tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull: Option<String>,
    pub tags: Vec<String>,
    pub manifest: ResolvedManifest,
}

impl Formattable for ImageView {
    fn format_pretty(&self) -> String {
        let manifest = &self.manifest;
        let mut output = String::new();

        output.push_str(&format!("Image: {}:{}\n", self.image, self.tag));
        if let Some(pull) = &self.pull {
            output.push_str(&format!("Pull: docker pull {}\n", pull));
        }
        if let Some(created) = manifest.created() {
            let local: DateTime<Local> = created.with_timezone(&Local);
            output.push_str(&format!("Created: {}\n", local.format("%Y-%m-%d %H:%M:%S %Z")));
        }
        output.push_str(&format!("Digest: {}\n", manifest.digest));
        if let Some(id) = &manifest.id {
            output.push_str(&format!("ID: {}\n", id));
        }
        if let Some(media_type) = manifest.media_type() {
            output.push_str(&format!("Type: {}\n", media_type));
        }
        if let (Some(os), Some(arch)) = (manifest.os(), manifest.architecture()) {
            output.push_str(&format!("Platform: {}/{}\n", os, arch));
        }
        output.push_str(&format!("Size: {}\n", format::format_bytes(manifest.total_size())));
        output.push_str(&format!("Layers: {}\n", manifest.layers().len()));

        if let Some(entries) = &manifest.manifests {
            let platforms: Vec<String> = entries
                .iter()
                .filter_map(|entry| entry.platform.as_ref())
                .map(|p| match &p.variant {
                    Some(variant) => format!("{}/{}/{}", p.os, p.architecture, variant),
                    None => format!("{}/{}", p.os, p.architecture),
                })
                .collect();
            output.push_str(&format!("Platforms: {}\n", platforms.join(", ")));
        }

        if let Some(labels) = manifest.labels().filter(|labels| !labels.is_empty()) {
            output.push_str("Labels:\n");
            for (key, value) in labels {
                let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                output.push_str(&format!("  {}={}\n", key, value));
            }
        }

        output.push_str(&format!("Tags: {}", self.tags.join(", ")));
        output
    }
}

/// Shows `image:tag`; without a tag, the repository's default tag
pub async fn run(
    ctx: &AppContext,
    image: &str,
    tag: Option<&str>,
    digest: Option<&str>,
) -> Result<String, String> {
    let (registry, request_ctx) = connect(ctx).await?;

    let tags = registry
        .tags(&request_ctx, image)
        .await
        .map_err(|e| describe_error(&e))?
        .found()
        .unwrap_or_default();

    let tag = match tag.or_else(|| default_tag(&tags)) {
        Some(tag) => tag.to_string(),
        None => return Ok(format!("Repository {} is empty.", image)),
    };

    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Resolving manifest for {}:{}", image, tag),
    );

    let manifest = match registry
        .manifest(&request_ctx, image, &tag, digest)
        .await
        .map_err(|e| describe_error(&e))?
    {
        Lookup::Found(manifest) => manifest,
        Lookup::NotFound => return Err(format!("{}:{} not found", image, tag)),
    };

    let view = ImageView {
        pull: ctx
            .config
            .pull_host()
            .map(|host| format!("{}/{}:{}", host, image, tag)),
        image: image.to_string(),
        tag,
        tags,
        manifest,
    };
    format::format_output(&view, ctx.format)
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
