//! Secret providers.
//!
//! Registration code only ever asks for `(item, field)` pairs; where the
//! values come from is decided once from [`SecretsConfig`].

mod env;
mod onepassword;

pub use env::EnvSecrets;
pub use onepassword::{field_from_item_json, OnePasswordCli};

use crate::config::{SecretBackend, SecretsConfig};
use crate::{Error, Result};
use std::collections::HashMap;

/// Narrow capability to read one secret value.
pub trait SecretProvider: Send + Sync {
    /// Fetch a plain field value.
    fn get_field(&self, item: &str, field: &str) -> Result<String>;

    /// Fetch a field whose value is a JSON document.
    fn get_json_field(&self, item: &str, field: &str) -> Result<serde_json::Value> {
        let raw = self.get_field(item, field)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::secret(item, field, format!("invalid JSON: {}", e)))
    }
}

/// Build the provider selected in the config.
pub fn provider_from_config(config: &SecretsConfig) -> Box<dyn SecretProvider> {
    match config.backend {
        SecretBackend::OnePassword => Box::new(OnePasswordCli::new(
            config.op_binary.clone(),
            config.vault.clone(),
        )),
        SecretBackend::Env => Box::new(EnvSecrets::new(config.env_prefix.clone())),
    }
}

/// In-memory provider.
#[derive(Debug, Clone, Default)]
pub struct MapSecrets {
    values: HashMap<(String, String), String>,
}

impl MapSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: &str, field: &str, value: &str) -> Self {
        self.insert(item, field, value);
        self
    }

    pub fn insert(&mut self, item: &str, field: &str, value: &str) {
        self.values
            .insert((item.to_string(), field.to_string()), value.to_string());
    }
}

impl SecretProvider for MapSecrets {
    fn get_field(&self, item: &str, field: &str) -> Result<String> {
        self.values
            .get(&(item.to_string(), field.to_string()))
            .cloned()
            .ok_or_else(|| Error::secret(item, field, "not found"))
    }
}
