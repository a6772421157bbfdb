use crate::apps;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Kubernetes namespace the stack runs in.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Domain serving the external HTTPRoutes (`https://{app}.{domain}`).
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Talk to the apps through their external URLs instead of the
    /// cluster-local service addresses.
    #[serde(default = "default_use_external_urls")]
    pub use_external_urls: bool,

    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default)]
    pub download_client: DownloadClientConfig,

    /// Per-app base URL used for this tool's own API calls.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

fn default_namespace() -> String {
    "media".to_string()
}

fn default_domain() -> String {
    "chillincool.net".to_string()
}

fn default_use_external_urls() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            domain: default_domain(),
            use_external_urls: default_use_external_urls(),
            secrets: SecretsConfig::default(),
            download_client: DownloadClientConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Cluster-local address of an app's service.
    pub fn internal_url(&self, app: &str, port: u16) -> String {
        format!("http://{}.{}.svc.cluster.local:{}", app, self.namespace, port)
    }

    /// User-facing address of an app.
    pub fn external_url(&self, app: &str) -> String {
        format!("https://{}.{}", app, self.domain)
    }

    /// Override for an app, keys compared case-insensitively.
    pub fn override_for(&self, app: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(name, _)| apps::names_match(name, app))
            .map(|(_, url)| url.as_str())
    }

    /// Address this tool uses to reach an app's API.
    pub fn api_url(&self, app: &str, port: u16) -> String {
        if let Some(url) = self.override_for(app) {
            return url.trim_end_matches('/').to_string();
        }
        if self.use_external_urls {
            self.external_url(app)
        } else {
            self.internal_url(app, port)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// 1Password CLI (`op`).
    #[default]
    OnePassword,
    /// Environment variables.
    Env,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub backend: SecretBackend,

    /// 1Password vault holding the app items.
    #[serde(default = "default_vault")]
    pub vault: String,

    #[serde(default = "default_op_binary")]
    pub op_binary: String,

    /// Prefix for the env backend: `{PREFIX}_{ITEM}_{FIELD}`.
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

fn default_vault() -> String {
    "talos".to_string()
}

fn default_op_binary() -> String {
    "op".to_string()
}

fn default_env_prefix() -> String {
    "ARRLINK".to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackend::default(),
            vault: default_vault(),
            op_binary: default_op_binary(),
            env_prefix: default_env_prefix(),
        }
    }
}

/// The download client registered with every automation app.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadClientConfig {
    /// Entry name inside the *arr apps.
    #[serde(default = "default_client_name")]
    pub name: String,

    /// Service name of the client inside the namespace.
    #[serde(default = "default_host_app")]
    pub host_app: String,

    #[serde(default = "default_client_port")]
    pub port: u16,

    /// Secret store item with the client's credentials.
    #[serde(default = "default_client_item")]
    pub item: String,

    /// Field holding a JSON document with `api_token` and `username`.
    #[serde(default = "default_json_field")]
    pub json_field: String,

    #[serde(default = "default_password_field")]
    pub password_field: String,

    /// Username used when the JSON document carries none.
    #[serde(default = "default_username")]
    pub default_username: String,
}

fn default_client_name() -> String {
    "Decypharr".to_string()
}

fn default_host_app() -> String {
    "decypharr".to_string()
}

fn default_client_port() -> u16 {
    8282
}

fn default_client_item() -> String {
    "decypharr-auth".to_string()
}

fn default_json_field() -> String {
    "json".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

impl Default for DownloadClientConfig {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            host_app: default_host_app(),
            port: default_client_port(),
            item: default_client_item(),
            json_field: default_json_field(),
            password_field: default_password_field(),
            default_username: default_username(),
        }
    }
}

impl DownloadClientConfig {
    /// Cluster-local hostname the *arr apps use to reach the client.
    pub fn host(&self, namespace: &str) -> String {
        format!("{}.{}.svc.cluster.local", self.host_app, namespace)
    }
}
