//! Integration tests for registering the shared download client.

mod common;

use arrlink::arr::http_client;
use arrlink::configure::{register_download_client, Outcome};
use assert_matches::assert_matches;
use common::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn existing_client(id: i64, name: &str, host: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "enable": true,
        "protocol": "torrent",
        "priority": 1,
        "removeCompletedDownloads": true,
        "removeFailedDownloads": true,
        "implementation": "QBittorrent",
        "implementationName": "qBittorrent",
        "configContract": "QBittorrentSettings",
        "fields": [
            {"name": "host", "value": host},
            {"name": "port", "value": 8080},
            {"name": "category", "value": "wrong"}
        ],
        "tags": []
    })
}

#[tokio::test]
async fn creates_client_with_fixed_fields() {
    let server = MockServer::start().await;
    let ctx = context_with(&server, &["sonarr-4k"]);

    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient"))
        .and(header("X-Api-Key", "sonarr-4k-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([existing_client(1, "Transmission", "transmission")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/downloadclient"))
        .and(header("X-Api-Key", "sonarr-4k-key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = register_download_client(&ctx, &http_client().unwrap(), "sonarr-4k").await;
    assert_eq!(outcome, Outcome::Created);

    let posts = requests_to(&server, "POST", "/api/v3/downloadclient").await;
    let payload = body_json(&posts[0]);
    assert_eq!(payload["name"], "Decypharr");
    assert_eq!(payload["enable"], true);
    assert_eq!(payload["protocol"], "torrent");
    assert_eq!(payload["priority"], 1);
    assert_eq!(payload["implementation"], "qBittorrent");
    assert_eq!(payload["implementationName"], "qBittorrent");
    assert_eq!(payload["configContract"], "QBittorrentSettings");
    assert_eq!(field(&payload, "host"), "decypharr.media.svc.cluster.local");
    assert_eq!(*field(&payload, "port"), 8282);
    assert_eq!(field(&payload, "username"), "chris");
    assert_eq!(field(&payload, "password"), "hunter2");
    assert_eq!(*field(&payload, "useSsl"), false);
    assert_eq!(field(&payload, "category"), "sonarr-4k");
}

#[tokio::test]
async fn lidarr_uses_v1() {
    let server = MockServer::start().await;
    let ctx = context_with(&server, &["lidarr"]);

    Mock::given(method("GET"))
        .and(path("/api/v1/downloadclient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/downloadclient"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        register_download_client(&ctx, &http_client().unwrap(), "lidarr").await,
        Outcome::Created
    );
}

/// Known limitation: an existing entry is never reconciled, whatever its
/// fields say.
#[tokio::test]
async fn existing_client_is_not_touched_even_when_drifted() {
    let server = MockServer::start().await;
    let ctx = context_with(&server, &["radarr"]);

    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([existing_client(5, "decypharr", "somewhere-else")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(
        register_download_client(&ctx, &http_client().unwrap(), "radarr").await,
        Outcome::Unchanged
    );
}

#[tokio::test]
async fn create_failure_is_reported() {
    let server = MockServer::start().await;
    let ctx = context_with(&server, &["radarr-4k"]);

    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"[{"errorMessage":"Unable to connect to qBittorrent"}]"#),
        )
        .mount(&server)
        .await;

    assert_matches!(
        register_download_client(&ctx, &http_client().unwrap(), "radarr-4k").await,
        Outcome::Failed(ref msg) if msg.contains("Unable to connect to qBittorrent")
    );
}

#[tokio::test]
async fn list_failure_stops_before_create() {
    let server = MockServer::start().await;
    let ctx = context_with(&server, &["sonarr"]);

    Mock::given(method("GET"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    assert_matches!(
        register_download_client(&ctx, &http_client().unwrap(), "sonarr").await,
        Outcome::Failed(_)
    );
}

#[tokio::test]
async fn skips_without_credentials() {
    let server = MockServer::start().await;
    let client = http_client().unwrap();

    let ctx = context_with(&server, &[]);
    assert_matches!(
        register_download_client(&ctx, &client, "sonarr").await,
        Outcome::Skipped(_)
    );

    let mut ctx = context_with(&server, &["sonarr"]);
    ctx.download_client = None;
    assert_matches!(
        register_download_client(&ctx, &client, "sonarr").await,
        Outcome::Skipped(ref reason) if reason.contains("Decypharr")
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}
