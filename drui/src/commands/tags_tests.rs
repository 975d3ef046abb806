use super::*;
use crate::context::CliOverrides;
use crate::format::ColorChoice;
use libdrui::Config;
use mockito::Server;

fn context(endpoint: String, format: OutputFormat) -> AppContext {
    AppContext::from_config(
        Config::default(),
        CliOverrides {
            endpoint: Some(endpoint),
            ..CliOverrides::default()
        },
        ColorChoice::Never,
        VerbosityLevel::Normal,
        format,
    )
}

#[tokio::test]
async fn test_tags_sorted_output() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/v2/a/b/tags/list")
        .with_status(200)
        .with_body(r#"{"name":"a/b","tags":["latest","2.0","1.0"]}"#)
        .create_async()
        .await;

    let output = run(&context(server.url(), OutputFormat::Pretty), "a/b")
        .await
        .unwrap();

    assert_eq!(output, "1.0\n2.0\nlatest");
}

#[tokio::test]
async fn test_tags_missing_repository() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/v2/a/b/tags/list")
        .with_status(404)
        .create_async()
        .await;

    let output = run(&context(server.url(), OutputFormat::Pretty), "a/b")
        .await
        .unwrap();

    assert_eq!(output, "Repository a/b is empty.");
}

#[tokio::test]
async fn test_tags_null_as_json_is_empty_list() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/v2/a/b/tags/list")
        .with_status(200)
        .with_body(r#"{"name":"a/b","tags":null}"#)
        .create_async()
        .await;

    let output = run(&context(server.url(), OutputFormat::Json), "a/b")
        .await
        .unwrap();

    let parsed: Vec<String> = serde_json::from_str(&output).unwrap();
    assert!(parsed.is_empty());
}

#[tokio::test]
async fn test_tags_yaml() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/v2/a/b/tags/list")
        .with_status(200)
        .with_body(r#"{"name":"a/b","tags":["v2","v10"]}"#)
        .create_async()
        .await;

    let output = run(&context(server.url(), OutputFormat::Yaml), "a/b")
        .await
        .unwrap();

    assert_eq!(output, "- v2\n- v10");
}
