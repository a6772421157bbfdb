//! Registration of the shared download client with each automation app.
//!
//! Entries are only ever created. An existing entry with the client's name
//! is left alone even when its host, credentials or category have drifted.

use super::Outcome;
use crate::apps;
use crate::arr::{ArrApi, DownloadClientResource, Field};
use crate::context::StackContext;
use reqwest::Client;
use serde_json::Value;

/// Download client entry `app` should hold.
///
/// The client speaks the qBittorrent API; the category is the app's own name
/// so each app only sees its own downloads.
pub fn desired_download_client(ctx: &StackContext, app: &str) -> Option<DownloadClientResource> {
    let auth = ctx.download_client.as_ref()?;
    let dc = &ctx.config.download_client;

    Some(DownloadClientResource {
        id: None,
        name: dc.name.clone(),
        enable: true,
        protocol: "torrent".to_string(),
        priority: 1,
        remove_completed_downloads: true,
        remove_failed_downloads: true,
        implementation: "qBittorrent".to_string(),
        implementation_name: "qBittorrent".to_string(),
        config_contract: "QBittorrentSettings".to_string(),
        fields: vec![
            Field::new("host", dc.host(&ctx.config.namespace)),
            Field::new("port", dc.port),
            Field::new("username", auth.username.as_str()),
            Field::new(
                "password",
                auth.password.clone().map(Value::from).unwrap_or(Value::Null),
            ),
            Field::new("useSsl", false),
            Field::new("category", app),
        ],
        tags: Vec::new(),
    })
}

/// Ensure `app` has the shared download client registered.
pub async fn register_download_client(ctx: &StackContext, client: &Client, app: &str) -> Outcome {
    let client_name = &ctx.config.download_client.name;

    let Some(identity) = ctx.identity(app) else {
        tracing::warn!("No API key for {}, skipping {}", app, client_name);
        return Outcome::Skipped(format!("no API key for {}", app));
    };

    let Some(desired) = desired_download_client(ctx, app) else {
        tracing::warn!("No credentials for {}, skipping {}", client_name, app);
        return Outcome::Skipped(format!("no credentials for {}", client_name));
    };

    let api = ArrApi::for_app(client.clone(), identity);

    match api.list_download_clients().await {
        Ok(existing) => {
            if let Some(found) = existing
                .iter()
                .find(|c| apps::names_match(&c.name, client_name))
            {
                tracing::info!(
                    "{} already exists in {} (ID: {})",
                    client_name,
                    app,
                    found.id.unwrap_or_default()
                );
                return Outcome::Unchanged;
            }
        }
        Err(e) => {
            tracing::error!("Error checking existing download clients in {}: {}", app, e);
            return Outcome::Failed(e.to_string());
        }
    }

    tracing::info!(
        "Configuring {} for {} with host {}:{}, username {}",
        client_name,
        app,
        ctx.config.download_client.host(&ctx.config.namespace),
        ctx.config.download_client.port,
        ctx.download_client
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or_default()
    );

    match api.create_download_client(&desired).await {
        Ok(()) => {
            tracing::info!("Added {} to {}", client_name, app);
            Outcome::Created
        }
        Err(e) => {
            tracing::error!("Failed to add {} to {}: {}", client_name, app, e);
            Outcome::Failed(e.to_string())
        }
    }
}
