//! End-to-end runs of every phase against one mock server.

mod common;

use arrlink::apps::{APPS, AUTOMATION_APPS};
use arrlink::arr::http_client;
use arrlink::configure::{configure_all, probe_app, Outcome, Phase, RunOptions};
use arrlink::context::load_context;
use arrlink::secrets::MapSecrets;
use assert_matches::assert_matches;
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn secrets_without(missing: &[&str]) -> MapSecrets {
    let mut secrets = MapSecrets::new();
    for app in APPS.iter().filter(|a| !missing.contains(&a.name)) {
        secrets.insert(&app.secret_item(), app.secret_field, &key_for(app.name));
    }
    secrets
        .with("decypharr-auth", "json", r#"{"api_token": "tok", "username": "chris"}"#)
        .with("decypharr-auth", "password", "hunter2")
}

async fn mount_empty_stack(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v[13]/system/status$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"appName": "Arr", "version": "4.0"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/applications/testall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v[13]/downloadclient$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn one_missing_credential_does_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_empty_stack(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/applications"))
        .respond_with(ResponseTemplate::new(201))
        .expect(5)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(ResponseTemplate::new(201))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/downloadclient"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (ctx, failures) = load_context(mock_config(&server), &secrets_without(&["sonarr-4k"]));
    assert_eq!(failures.len(), 1);

    let client = http_client().unwrap();
    let summary = configure_all(&ctx, &client, &failures, RunOptions::default()).await;

    assert_matches!(
        summary.outcome(Phase::Credentials, "sonarr-4k"),
        Some(Outcome::Failed(_))
    );
    assert!(summary.outcome(Phase::Peer, "sonarr-4k").is_none());
    assert!(summary.outcome(Phase::DownloadClient, "sonarr-4k").is_none());

    for app in AUTOMATION_APPS.iter().filter(|a| **a != "sonarr-4k") {
        assert_eq!(summary.outcome(Phase::Probe, app), Some(&Outcome::Passed), "{app}");
        assert_eq!(summary.outcome(Phase::Peer, app), Some(&Outcome::Created), "{app}");
        assert_eq!(
            summary.outcome(Phase::DownloadClient, app),
            Some(&Outcome::Created),
            "{app}"
        );
    }
    assert_eq!(summary.failure_count(), 1);

    let created: Vec<String> = requests_to(&server, "POST", "/api/v1/applications")
        .await
        .iter()
        .map(|r| body_json(r)["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(created, vec!["sonarr", "sonarr-anime", "radarr", "radarr-4k", "lidarr"]);
}

#[tokio::test]
async fn missing_prowlarr_key_still_registers_download_clients() {
    let server = MockServer::start().await;
    mount_empty_stack(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/applications"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/v[13]/downloadclient$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(6)
        .mount(&server)
        .await;

    let (ctx, failures) = load_context(mock_config(&server), &secrets_without(&["prowlarr"]));
    let client = http_client().unwrap();
    let summary = configure_all(&ctx, &client, &failures, RunOptions::default()).await;

    for app in AUTOMATION_APPS {
        assert_matches!(summary.outcome(Phase::Peer, app), Some(Outcome::Skipped(_)));
        assert_eq!(
            summary.outcome(Phase::DownloadClient, app),
            Some(&Outcome::Created)
        );
    }
}

#[tokio::test]
async fn probe_failure_does_not_gate_registration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v[13]/system/status$"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    mount_empty_stack(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/applications"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/downloadclient"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context_with(&server, &["prowlarr", "radarr"]);
    ctx.download_client = Some(arrlink::context::DownloadClientAuth {
        api_token: "tok".into(),
        username: "chris".into(),
        password: None,
    });

    let client = http_client().unwrap();
    let summary = configure_all(&ctx, &client, &[], RunOptions { force_update: true }).await;

    assert_matches!(summary.outcome(Phase::Probe, "radarr"), Some(Outcome::Failed(_)));
    assert_eq!(summary.outcome(Phase::Peer, "radarr"), Some(&Outcome::Created));
    assert_eq!(
        summary.outcome(Phase::DownloadClient, "radarr"),
        Some(&Outcome::Created)
    );
}

#[tokio::test]
async fn status_200_with_plain_body_counts_as_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_with(&server, &["radarr"]);
    assert!(probe_app(&ctx, &http_client().unwrap(), "radarr").await);
}

#[tokio::test]
async fn status_error_code_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/status"))
        .respond_with(ResponseTemplate::new(503).set_body_string("starting"))
        .mount(&server)
        .await;

    let ctx = context_with(&server, &["prowlarr"]);
    assert!(!probe_app(&ctx, &http_client().unwrap(), "prowlarr").await);
}
