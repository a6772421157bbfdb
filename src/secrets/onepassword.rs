//! 1Password CLI backend.

use super::SecretProvider;
use crate::{Error, Result};
use serde::Deserialize;
use std::process::Command;

/// Reads secrets by shelling out to `op item get`.
#[derive(Debug, Clone)]
pub struct OnePasswordCli {
    binary: String,
    vault: String,
}

#[derive(Debug, Deserialize)]
struct ItemDocument {
    #[serde(default)]
    fields: Vec<ItemField>,
}

#[derive(Debug, Deserialize)]
struct ItemField {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl OnePasswordCli {
    pub fn new(binary: impl Into<String>, vault: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            vault: vault.into(),
        }
    }

    fn run(&self, item: &str, field: &str, args: &[&str]) -> Result<String> {
        let binary = which::which(&self.binary).map_err(|_| {
            Error::secret(item, field, format!("{} not found in PATH", self.binary))
        })?;

        let output = Command::new(binary)
            .args(["item", "get", item, "--vault", &self.vault])
            .args(args)
            .output()
            .map_err(|e| Error::secret(item, field, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::secret(
                item,
                field,
                format!("{} exited with {}: {}", self.binary, output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl SecretProvider for OnePasswordCli {
    fn get_field(&self, item: &str, field: &str) -> Result<String> {
        let value = self.run(item, field, &["--fields", field, "--reveal"])?;
        if value.is_empty() {
            return Err(Error::secret(item, field, "empty value"));
        }
        Ok(value)
    }

    fn get_json_field(&self, item: &str, field: &str) -> Result<serde_json::Value> {
        // `--fields` output is CSV-quoted, so JSON values come from the full item.
        let stdout = self.run(item, field, &["--format", "json"])?;
        field_from_item_json(&stdout, item, field)
    }
}

/// Find the field labelled `label` in `op item get --format json` output
/// and parse its value as JSON.
pub fn field_from_item_json(stdout: &str, item: &str, label: &str) -> Result<serde_json::Value> {
    let document: ItemDocument = serde_json::from_str(stdout)
        .map_err(|e| Error::secret(item, label, format!("invalid item JSON: {}", e)))?;

    let value = document
        .fields
        .into_iter()
        .find(|f| f.label.as_deref() == Some(label))
        .ok_or_else(|| Error::secret(item, label, "field not found"))?
        .value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::secret(item, label, "empty value"))?;

    serde_json::from_str(&value)
        .map_err(|e| Error::secret(item, label, format!("invalid JSON: {}", e)))
}
