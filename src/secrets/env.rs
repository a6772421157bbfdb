//! Environment variable backend.

use super::SecretProvider;
use crate::{Error, Result};

/// Reads `{PREFIX}_{ITEM}_{FIELD}`, upper-cased with every character outside
/// `[A-Z0-9]` replaced by `_`.
#[derive(Debug, Clone)]
pub struct EnvSecrets {
    prefix: String,
}

impl EnvSecrets {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn var_name(&self, item: &str, field: &str) -> String {
        format!("{}_{}_{}", self.prefix, item, field)
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl SecretProvider for EnvSecrets {
    fn get_field(&self, item: &str, field: &str) -> Result<String> {
        let name = self.var_name(item, field);
        match std::env::var(&name) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => Err(Error::secret(item, field, format!("{} is empty", name))),
            Err(_) => Err(Error::secret(item, field, format!("{} is not set", name))),
        }
    }
}
