//! Shared test harness for integration tests.
//!
//! Every app in the stack is pointed at one [`MockServer`]; the apps are told
//! apart by API version and path (`/api/v1/applications`,
//! `/api/v3/downloadclient`, ...) and by the `X-Api-Key` header.

#![allow(dead_code)]

use arrlink::apps::APPS;
use arrlink::config::Config;
use arrlink::context::{DownloadClientAuth, StackContext};
use serde_json::{json, Value};
use wiremock::{MockServer, Request};

/// API key the harness loads for `app`.
pub fn key_for(app: &str) -> String {
    format!("{}-key", app)
}

/// Config with every app overridden to the mock server.
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    for app in APPS.iter() {
        config.overrides.insert(app.name.to_string(), server.uri());
    }
    config
}

/// Context with keys for `apps` and download client credentials.
pub fn context_with(server: &MockServer, apps: &[&str]) -> StackContext {
    let mut ctx = StackContext::new(mock_config(server));
    for app in apps {
        assert!(ctx.insert_key(app, key_for(app)), "unknown app {app}");
    }
    ctx.download_client = Some(DownloadClientAuth {
        api_token: "decypharr-token".to_string(),
        username: "chris".to_string(),
        password: Some("hunter2".to_string()),
    });
    ctx
}

/// A Prowlarr application entry as Prowlarr returns it.
pub fn prowlarr_entry(id: i64, name: &str, implementation: &str, api_key: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "syncLevel": "fullSync",
        "implementation": implementation,
        "implementationName": implementation,
        "configContract": format!("{}Settings", implementation),
        "infoLink": "https://wiki.servarr.com/prowlarr/supported#sonarr",
        "fields": [
            {"order": 0, "name": "prowlarrUrl", "label": "Prowlarr Server", "value": "http://old-prowlarr:9696"},
            {"order": 1, "name": "baseUrl", "label": "Sonarr Server", "value": "http://old:8989"},
            {"order": 2, "name": "apiKey", "label": "ApiKey", "value": api_key},
            {"order": 3, "name": "syncCategories", "label": "Sync Categories", "value": [5000]},
            {"order": 4, "name": "syncRejectBlocklistedTorrentHashesWhileGrabbing", "value": false}
        ],
        "tags": []
    })
}

/// Requests the server saw with the given method and path.
pub async fn requests_to(server: &MockServer, method: &str, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method && r.url.path() == path)
        .collect()
}

pub fn body_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body is JSON")
}

/// Value of the named field in a `{fields: [{name, value}]}` payload.
pub fn field<'a>(payload: &'a Value, name: &str) -> &'a Value {
    payload["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .find(|f| f["name"] == name)
        .map(|f| &f["value"])
        .unwrap_or_else(|| panic!("field {name} missing"))
}
