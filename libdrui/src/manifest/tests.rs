use super::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::instrument::WithSubscriber;

const CONFIG_DIGEST: &str =
    "sha256:1111111111111111111111111111111111111111111111111111111111111111";
const AMD64_DIGEST: &str =
    "sha256:2222222222222222222222222222222222222222222222222222222222222222";
const ARM64_DIGEST: &str =
    "sha256:3333333333333333333333333333333333333333333333333333333333333333";
const MANIFEST_DIGEST: &str =
    "sha256:4444444444444444444444444444444444444444444444444444444444444444";

fn image_manifest() -> Value {
    json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 1000,
            "digest": CONFIG_DIGEST
        },
        "layers": [
            {
                "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
                "size": 2000,
                "digest": "sha256:5555555555555555555555555555555555555555555555555555555555555555"
            },
            {
                "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
                "size": 3000,
                "digest": "sha256:6666666666666666666666666666666666666666666666666666666666666666"
            }
        ]
    })
}

fn manifest_list() -> Value {
    json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json",
        "manifests": [
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 528,
                "digest": AMD64_DIGEST,
                "platform": { "architecture": "amd64", "os": "linux" }
            },
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 528,
                "digest": ARM64_DIGEST,
                "platform": { "architecture": "arm64", "os": "linux", "variant": "v8" }
            }
        ]
    })
}

fn image_config() -> Value {
    json!({
        "architecture": "amd64",
        "os": "linux",
        "created": "2024-03-01T12:30:00.123456789Z",
        "config": {
            "Labels": { "maintainer": "ops@example.com" }
        }
    })
}

async fn mock_blob(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", format!("/v2/a/b/blobs/{}", CONFIG_DIGEST).as_str())
        .with_status(200)
        .with_header("Docker-Content-Digest", CONFIG_DIGEST)
        .with_body(image_config().to_string())
        .create_async()
        .await
}

async fn resolve(
    server: &Server,
    tag: &str,
    digest: Option<&str>,
) -> Result<Lookup<ResolvedManifest>> {
    let client = Client::new(&server.url()).unwrap();
    ManifestResolver::new(&client)
        .resolve(&RequestContext::default(), "a/b", tag, digest)
        .await
}

#[tokio::test]
async fn test_resolve_single_manifest() {
    let mut server = Server::new_async().await;
    let manifest = server
        .mock("GET", "/v2/a/b/manifests/1.0")
        .match_header("accept", Matcher::Regex("manifest.list.v2".to_string()))
        .with_status(200)
        .with_header("Docker-Content-Digest", MANIFEST_DIGEST)
        .with_body(image_manifest().to_string())
        .expect(2)
        .create_async()
        .await;
    let blob = mock_blob(&mut server).await;

    let resolved = resolve(&server, "1.0", None).await.unwrap().found().unwrap();

    manifest.assert_async().await;
    blob.assert_async().await;
    assert_eq!(resolved.digest, MANIFEST_DIGEST);
    assert_eq!(resolved.id.as_deref(), Some(CONFIG_DIGEST));
    assert_eq!(resolved.manifests, None);
    assert_eq!(resolved.config.digest, CONFIG_DIGEST);
    assert_eq!(resolved.manifest.get("schemaVersion"), Some(&json!(2)));
    assert_eq!(resolved.architecture(), Some("amd64"));
}

#[tokio::test]
async fn test_resolve_index_follows_first_entry() {
    let mut server = Server::new_async().await;
    let index = server
        .mock("GET", "/v2/a/b/manifests/latest")
        .with_status(200)
        .with_body(manifest_list().to_string())
        .expect(1)
        .create_async()
        .await;
    let amd64 = server
        .mock("GET", format!("/v2/a/b/manifests/{}", AMD64_DIGEST).as_str())
        .with_status(200)
        .with_header("Docker-Content-Digest", AMD64_DIGEST)
        .with_body(image_manifest().to_string())
        .expect(1)
        .create_async()
        .await;
    let arm64 = server
        .mock("GET", format!("/v2/a/b/manifests/{}", ARM64_DIGEST).as_str())
        .expect(0)
        .create_async()
        .await;
    let _blob = mock_blob(&mut server).await;

    let resolved = resolve(&server, "latest", None).await.unwrap().found().unwrap();

    index.assert_async().await;
    amd64.assert_async().await;
    arm64.assert_async().await;
    assert_eq!(resolved.digest, AMD64_DIGEST);

    let manifests = resolved.manifests.unwrap();
    assert_eq!(manifests.len(), 2);
    assert_eq!(manifests[0].digest, AMD64_DIGEST);
    assert_eq!(
        manifests[1].platform.as_ref().unwrap().variant.as_deref(),
        Some("v8")
    );
}

#[tokio::test]
async fn test_resolve_index_first_entry_beats_digest_parameter() {
    let mut server = Server::new_async().await;
    let _index = server
        .mock("GET", "/v2/a/b/manifests/latest")
        .with_status(200)
        .with_body(manifest_list().to_string())
        .create_async()
        .await;
    let amd64 = server
        .mock("GET", format!("/v2/a/b/manifests/{}", AMD64_DIGEST).as_str())
        .with_status(200)
        .with_header("Docker-Content-Digest", AMD64_DIGEST)
        .with_body(image_manifest().to_string())
        .expect(1)
        .create_async()
        .await;
    let arm64 = server
        .mock("GET", format!("/v2/a/b/manifests/{}", ARM64_DIGEST).as_str())
        .expect(0)
        .create_async()
        .await;
    let _blob = mock_blob(&mut server).await;

    let resolved = resolve(&server, "latest", Some(ARM64_DIGEST))
        .await
        .unwrap()
        .found()
        .unwrap();

    amd64.assert_async().await;
    arm64.assert_async().await;
    assert_eq!(resolved.digest, AMD64_DIGEST);
    assert_eq!(resolved.manifests.map(|m| m.len()), Some(2));
}

#[tokio::test]
async fn test_resolve_digest_parameter_replaces_tag() {
    let mut server = Server::new_async().await;
    let tag = server
        .mock("GET", "/v2/a/b/manifests/1.0")
        .with_status(200)
        .with_body(image_manifest().to_string())
        .expect(1)
        .create_async()
        .await;
    let by_digest = server
        .mock("GET", format!("/v2/a/b/manifests/{}", MANIFEST_DIGEST).as_str())
        .with_status(200)
        .with_header("Docker-Content-Digest", MANIFEST_DIGEST)
        .with_body(image_manifest().to_string())
        .expect(1)
        .create_async()
        .await;
    let _blob = mock_blob(&mut server).await;

    let resolved = resolve(&server, "1.0", Some(MANIFEST_DIGEST))
        .await
        .unwrap()
        .found()
        .unwrap();

    tag.assert_async().await;
    by_digest.assert_async().await;
    assert_eq!(resolved.digest, MANIFEST_DIGEST);
    assert_eq!(resolved.manifests, None);
}

#[tokio::test]
async fn test_resolve_missing_tag_is_not_found() {
    let mut server = Server::new_async().await;
    let manifest = server
        .mock("GET", "/v2/a/b/manifests/nope")
        .with_status(404)
        .with_body(r#"{"errors":[{"code":"MANIFEST_UNKNOWN"}]}"#)
        .expect(2)
        .create_async()
        .await;

    let result = resolve(&server, "nope", None).await.unwrap();

    manifest.assert_async().await;
    assert!(result.is_not_found());
}

#[tokio::test]
async fn test_resolve_manifest_without_config_is_not_found() {
    let mut server = Server::new_async().await;
    let _manifest = server
        .mock("GET", "/v2/a/b/manifests/old")
        .with_status(200)
        .with_body(json!({ "schemaVersion": 1, "name": "a/b", "fsLayers": [] }).to_string())
        .create_async()
        .await;
    let blob = server
        .mock("GET", Matcher::Regex("^/v2/a/b/blobs/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let result = resolve(&server, "old", None).await.unwrap();

    blob.assert_async().await;
    assert!(result.is_not_found());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_resolve_manifest_without_config_logs_warning() {
    let mut server = Server::new_async().await;
    let _manifest = server
        .mock("GET", "/v2/a/b/manifests/old")
        .with_status(200)
        .with_body(json!({ "schemaVersion": 1, "name": "a/b", "fsLayers": [] }).to_string())
        .create_async()
        .await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = resolve(&server, "old", None)
        .with_subscriber(subscriber)
        .await
        .unwrap();

    assert!(result.is_not_found());
    let output = logs.contents();
    assert!(output.contains("WARN"), "{}", output);
    assert!(output.contains("Unknown manifest"), "{}", output);
}

#[tokio::test]
async fn test_resolve_digest_falls_back_to_body_hash() {
    let mut server = Server::new_async().await;
    let body = image_manifest().to_string();
    let _manifest = server
        .mock("GET", "/v2/a/b/manifests/1.0")
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;
    let _blob = mock_blob(&mut server).await;

    let resolved = resolve(&server, "1.0", None).await.unwrap().found().unwrap();

    assert_eq!(
        resolved.digest,
        Digest::sha256(body.as_bytes()).unwrap().to_string()
    );
}

#[tokio::test]
async fn test_resolve_blob_error_propagates() {
    let mut server = Server::new_async().await;
    let _manifest = server
        .mock("GET", "/v2/a/b/manifests/1.0")
        .with_status(200)
        .with_body(image_manifest().to_string())
        .create_async()
        .await;
    let _blob = server
        .mock("GET", format!("/v2/a/b/blobs/{}", CONFIG_DIGEST).as_str())
        .with_status(500)
        .create_async()
        .await;

    let err = resolve(&server, "1.0", None).await.unwrap_err();

    assert!(matches!(err, DruiError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_resolve_first_fetch_error_propagates() {
    let mut server = Server::new_async().await;
    let _manifest = server
        .mock("GET", "/v2/a/b/manifests/1.0")
        .with_status(401)
        .create_async()
        .await;

    let err = resolve(&server, "1.0", None).await.unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_resolve_index_missing_entry_is_not_found() {
    let mut server = Server::new_async().await;
    let _index = server
        .mock("GET", "/v2/a/b/manifests/latest")
        .with_status(200)
        .with_body(manifest_list().to_string())
        .create_async()
        .await;
    let _amd64 = server
        .mock("GET", format!("/v2/a/b/manifests/{}", AMD64_DIGEST).as_str())
        .with_status(404)
        .create_async()
        .await;

    let result = resolve(&server, "latest", None).await.unwrap();

    assert!(result.is_not_found());
}

#[test]
fn test_resolved_manifest_accessors() {
    let manifest = image_manifest();
    let resolved = ResolvedManifest {
        digest: MANIFEST_DIGEST.to_string(),
        id: Some(CONFIG_DIGEST.to_string()),
        manifests: None,
        config: serde_json::from_value(manifest["config"].clone()).unwrap(),
        manifest: manifest.as_object().unwrap().clone(),
        image_config: image_config().as_object().unwrap().clone(),
    };

    assert_eq!(
        resolved.media_type(),
        Some("application/vnd.docker.distribution.manifest.v2+json")
    );
    assert_eq!(resolved.os(), Some("linux"));
    assert_eq!(
        resolved.created().unwrap().to_rfc3339(),
        "2024-03-01T12:30:00.123456789+00:00"
    );
    assert_eq!(
        resolved.labels().unwrap().get("maintainer"),
        Some(&json!("ops@example.com"))
    );
    assert_eq!(resolved.layers().len(), 2);
    assert_eq!(resolved.total_size(), 6000);
}

#[test]
fn test_resolved_manifest_serializes_sections_separately() {
    let manifest = image_manifest();
    let resolved = ResolvedManifest {
        digest: MANIFEST_DIGEST.to_string(),
        id: None,
        manifests: None,
        config: serde_json::from_value(manifest["config"].clone()).unwrap(),
        manifest: manifest.as_object().unwrap().clone(),
        image_config: image_config().as_object().unwrap().clone(),
    };

    let value = serde_json::to_value(&resolved).unwrap();
    assert_eq!(value["digest"], json!(MANIFEST_DIGEST));
    assert_eq!(value["config"]["digest"], json!(CONFIG_DIGEST));
    assert_eq!(value["image_config"]["config"]["Labels"]["maintainer"], json!("ops@example.com"));
}
