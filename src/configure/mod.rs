//! The configuration run: probe, peer registration, download clients.

pub mod download_clients;
pub mod peers;
pub mod probe;
mod summary;

pub use download_clients::register_download_client;
pub use peers::{register_peer, test_all, test_one};
pub use probe::probe_app;
pub use summary::{Outcome, Phase, RunSummary, SummaryEntry};

use crate::apps::{AGGREGATOR, AUTOMATION_APPS};
use crate::context::{LoadFailure, StackContext};
use reqwest::Client;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Accepted for compatibility; registration already updates on any key
    /// mismatch.
    pub force_update: bool,
}

/// Run every phase after credential loading against the loaded context.
///
/// Never aborts: each app's failure is recorded and the next app proceeds.
pub async fn configure_all(
    ctx: &StackContext,
    client: &Client,
    load_failures: &[LoadFailure],
    options: RunOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for failure in load_failures {
        summary.record(
            Phase::Credentials,
            &failure.app,
            Outcome::Failed(failure.reason.clone()),
        );
    }

    tracing::info!("=== Testing API Connections ===");
    for app in std::iter::once(AGGREGATOR).chain(AUTOMATION_APPS) {
        if !ctx.has_key(app) {
            continue;
        }
        let outcome = if probe_app(ctx, client, app).await {
            Outcome::Passed
        } else {
            Outcome::Failed("status check failed".to_string())
        };
        summary.record(Phase::Probe, app, outcome);
    }

    tracing::info!("=== Configuring Prowlarr Applications ===");
    if options.force_update {
        tracing::info!("Force update mode: Will update API keys even if old keys still work");
    }

    for app in AUTOMATION_APPS {
        if !ctx.has_key(app) {
            continue;
        }
        let outcome = register_peer(ctx, client, app).await;
        summary.record(Phase::Peer, app, outcome);
    }

    if ctx.has_key(AGGREGATOR) {
        test_all(ctx, client).await;
    }

    tracing::info!("=== Configuring Download Clients ===");
    for app in AUTOMATION_APPS {
        if !ctx.has_key(app) {
            continue;
        }
        let outcome = register_download_client(ctx, client, app).await;
        summary.record(Phase::DownloadClient, app, outcome);
    }

    tracing::info!("=== Configuration Complete ===");
    summary
}
