//! Credential loading and the per-run context passed to every operation.

use crate::apps::{self, APPS};
use crate::config::Config;
use crate::secrets::SecretProvider;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// One application's credential and addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub api_key: String,
    /// User-facing `https://{app}.{domain}` address.
    pub external_url: String,
    /// Cluster-local address, used for app-to-app links.
    pub internal_url: String,
    /// Address this tool sends its own API calls to.
    pub api_url: String,
}

/// Credentials of the shared download client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadClientAuth {
    pub api_token: String,
    pub username: String,
    pub password: Option<String>,
}

/// A credential that could not be loaded.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub app: String,
    pub reason: String,
}

/// Everything a run knows, built once by [`load_context`].
#[derive(Debug, Clone)]
pub struct StackContext {
    pub config: Config,
    identities: BTreeMap<String, AppIdentity>,
    pub download_client: Option<DownloadClientAuth>,
}

impl StackContext {
    /// A context with no credentials loaded.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            identities: BTreeMap::new(),
            download_client: None,
        }
    }

    /// Register an app's key, deriving its addresses from the config.
    ///
    /// Returns `false` for names outside the known stack.
    pub fn insert_key(&mut self, app: &str, api_key: impl Into<String>) -> bool {
        let Some(spec) = apps::find_app(app) else {
            return false;
        };

        let identity = AppIdentity {
            name: spec.name.to_string(),
            api_key: api_key.into(),
            external_url: self.config.external_url(spec.name),
            internal_url: self.config.internal_url(spec.name, spec.port),
            api_url: self.config.api_url(spec.name, spec.port),
        };
        self.identities.insert(spec.name.to_string(), identity);
        true
    }

    /// Fetch one app's key from the secret store and register it.
    pub fn load_key(&mut self, secrets: &dyn SecretProvider, app: &str) -> Result<()> {
        let spec = apps::find_app(app).ok_or_else(|| Error::NotFound {
            kind: "app",
            name: app.to_string(),
        })?;
        let key = secrets.get_field(&spec.secret_item(), spec.secret_field)?;
        tracing::info!("Loaded API key for {} ({} chars)", spec.name, key.len());
        self.insert_key(spec.name, key);
        Ok(())
    }

    pub fn identity(&self, app: &str) -> Option<&AppIdentity> {
        self.identities.get(app)
    }

    pub fn has_key(&self, app: &str) -> bool {
        self.identities.contains_key(app)
    }

    pub fn loaded_apps(&self) -> impl Iterator<Item = &str> {
        self.identities.keys().map(String::as_str)
    }
}

/// Load every app's credential from the secret store.
///
/// Failures are logged and returned alongside the context; an app without a
/// key is skipped for the rest of the run.
pub fn load_context(config: Config, secrets: &dyn SecretProvider) -> (StackContext, Vec<LoadFailure>) {
    let mut ctx = StackContext::new(config);
    let mut failures = Vec::new();

    for spec in APPS.iter() {
        if let Err(e) = ctx.load_key(secrets, spec.name) {
            tracing::warn!("Failed to load API key for {}: {}", spec.name, e);
            failures.push(LoadFailure {
                app: spec.name.to_string(),
                reason: e.to_string(),
            });
        }
    }

    match load_download_client(&ctx.config, secrets) {
        Ok(auth) => {
            tracing::info!(
                "Loaded credentials for {} (user {}, password {} chars)",
                ctx.config.download_client.host_app,
                auth.username,
                auth.password.as_deref().map(str::len).unwrap_or(0)
            );
            ctx.download_client = Some(auth);
        }
        Err(reason) => {
            tracing::warn!(
                "Failed to load credentials for {}: {}",
                ctx.config.download_client.host_app,
                reason
            );
            failures.push(LoadFailure {
                app: ctx.config.download_client.host_app.clone(),
                reason,
            });
        }
    }

    (ctx, failures)
}

fn load_download_client(
    config: &Config,
    secrets: &dyn SecretProvider,
) -> std::result::Result<DownloadClientAuth, String> {
    let dc = &config.download_client;

    let document = secrets
        .get_json_field(&dc.item, &dc.json_field)
        .map_err(|e| e.to_string())?;

    let api_token = document
        .get("api_token")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{}/{} has no api_token", dc.item, dc.json_field))?
        .to_string();

    let username = document
        .get("username")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(&dc.default_username)
        .to_string();

    let password = match secrets.get_field(&dc.item, &dc.password_field) {
        Ok(password) => Some(password),
        Err(e) => {
            tracing::warn!("No download client password: {}", e);
            None
        }
    };

    Ok(DownloadClientAuth {
        api_token,
        username,
        password,
    })
}
