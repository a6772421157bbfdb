use crate::arr::ArrApi;
use crate::context::StackContext;
use crate::Error;
use reqwest::Client;

/// Check that an app answers its status endpoint with the loaded key.
///
/// Diagnostic only; the result never gates later phases.
pub async fn probe_app(ctx: &StackContext, client: &Client, app: &str) -> bool {
    let Some(identity) = ctx.identity(app) else {
        return false;
    };

    let api = ArrApi::for_app(client.clone(), identity);
    match api.system_status().await {
        Ok(status) => {
            tracing::info!(
                "Connected to {} ({} {})",
                app,
                status.app_name.as_deref().unwrap_or(app),
                status.version.as_deref().unwrap_or("unknown version")
            );
            true
        }
        Err(Error::Status { status, body }) => {
            tracing::warn!(
                "Failed to connect to {}: HTTP {} (URL: {})",
                app,
                status,
                api.url("/system/status")
            );
            if !body.is_empty() {
                tracing::warn!("  Response: {}", truncate(&body, 200));
            }
            false
        }
        Err(e) => {
            tracing::warn!("Connection error for {}: {}", app, e);
            false
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
