use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One `{name, value}` entry of a provider's settings.
///
/// Prowlarr and the *arr apps return extra metadata per field (label,
/// helpText, type, ...); it is kept in `extra` so a full PUT echoes it back.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,

    #[serde(default)]
    pub value: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// Look up a field's value by name.
pub fn field_value<'a>(fields: &'a [Field], name: &str) -> Option<&'a Value> {
    fields.iter().find(|f| f.name == name).map(|f| &f.value)
}

/// Prowlarr `/api/v1/applications` resource.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    #[serde(default)]
    pub sync_level: String,

    #[serde(default)]
    pub implementation: String,

    #[serde(default)]
    pub config_contract: String,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub tags: Vec<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationResource {
    /// The API key Prowlarr uses to push to this app, if stored.
    pub fn api_key(&self) -> Option<&str> {
        field_value(&self.fields, "apiKey").and_then(Value::as_str)
    }

    pub fn base_url(&self) -> Option<&str> {
        field_value(&self.fields, "baseUrl").and_then(Value::as_str)
    }
}

/// *arr `/api/{v}/downloadclient` resource.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadClientResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    #[serde(default)]
    pub enable: bool,

    #[serde(default)]
    pub protocol: String,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub remove_completed_downloads: bool,

    #[serde(default)]
    pub remove_failed_downloads: bool,

    #[serde(default)]
    pub implementation: String,

    #[serde(default)]
    pub implementation_name: String,

    #[serde(default)]
    pub config_contract: String,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub tags: Vec<i64>,
}

/// Result entry of `POST /api/v1/applications/testall`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTestResult {
    pub id: i64,

    #[serde(default)]
    pub is_valid: bool,

    #[serde(default)]
    pub validation_failures: Vec<ValidationFailure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    #[serde(default)]
    pub property_name: Option<String>,

    #[serde(default)]
    pub error_message: String,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property_name {
            Some(property) if !property.is_empty() => {
                write!(f, "{}: {}", property, self.error_message)
            }
            _ => f.write_str(&self.error_message),
        }
    }
}

/// Subset of `/api/{v}/system/status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}
