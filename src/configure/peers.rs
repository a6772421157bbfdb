//! Registration of the automation apps as Prowlarr applications.

use super::Outcome;
use crate::apps::{self, AGGREGATOR};
use crate::arr::{ApplicationResource, ApplicationTestResult, ArrApi, Field};
use crate::context::StackContext;
use crate::{Error, Result};
use reqwest::Client;
use serde_json::{json, Map};

/// Field names Prowlarr's *arr application settings are reconciled on.
const API_KEY: &str = "apiKey";
const BASE_URL: &str = "baseUrl";
const PROWLARR_URL: &str = "prowlarrUrl";
const SYNC_CATEGORIES: &str = "syncCategories";

/// API handle for Prowlarr, if its key was loaded.
pub fn prowlarr_api(ctx: &StackContext, client: &Client) -> Result<ArrApi> {
    let identity = ctx
        .identity(AGGREGATOR)
        .ok_or_else(|| Error::MissingCredential(AGGREGATOR.to_string()))?;
    Ok(ArrApi::for_app(client.clone(), identity))
}

/// Settings fields Prowlarr should hold for `app`, in creation order.
///
/// Both addresses are cluster-local since Prowlarr pushes from inside the
/// cluster.
pub fn desired_fields(ctx: &StackContext, app: &str) -> Option<Vec<Field>> {
    let prowlarr = ctx.identity(AGGREGATOR)?;
    let target = ctx.identity(app)?;

    Some(vec![
        Field::new(PROWLARR_URL, prowlarr.internal_url.as_str()),
        Field::new(BASE_URL, target.internal_url.as_str()),
        Field::new(API_KEY, target.api_key.as_str()),
        Field::new(SYNC_CATEGORIES, json!(apps::sync_categories(app))),
    ])
}

/// Overlay `desired` onto an existing field list.
///
/// Matching fields get the desired value and keep their metadata, unrelated
/// fields pass through untouched, missing desired fields are appended.
pub fn reconcile_fields(existing: &[Field], desired: &[Field]) -> Vec<Field> {
    let mut fields = existing.to_vec();

    for want in desired {
        match fields.iter_mut().find(|f| f.name == want.name) {
            Some(field) => field.value = want.value.clone(),
            None => fields.push(want.clone()),
        }
    }

    fields
}

/// Ensure Prowlarr holds exactly one application entry for `app` with the
/// current key, addresses and categories.
pub async fn register_peer(ctx: &StackContext, client: &Client, app: &str) -> Outcome {
    let Some(target) = ctx.identity(app) else {
        tracing::warn!("No API key for {}, skipping", app);
        return Outcome::Skipped(format!("no API key for {}", app));
    };

    let prowlarr = match prowlarr_api(ctx, client) {
        Ok(api) => api,
        Err(e) => {
            tracing::warn!("Cannot register {}: {}", app, e);
            return Outcome::Skipped(e.to_string());
        }
    };

    let kind = apps::base_kind(app);
    let Some(implementation) = apps::implementation_for(&kind) else {
        tracing::error!("Unknown app type: {}", kind);
        return Outcome::Failed(format!("unknown app type {}", kind));
    };

    let Some(desired) = desired_fields(ctx, app) else {
        return Outcome::Skipped("missing credentials".to_string());
    };

    let existing = match prowlarr.list_applications().await {
        Ok(list) => list.into_iter().find(|a| apps::names_match(&a.name, app)),
        Err(e) => {
            tracing::error!("Error checking existing applications: {}", e);
            return Outcome::Failed(e.to_string());
        }
    };

    match existing {
        Some(entry) => {
            let Some(id) = entry.id else {
                return Outcome::Failed(format!("{} has no id in Prowlarr", entry.name));
            };

            if entry.api_key() == Some(target.api_key.as_str()) {
                tracing::info!("{} already exists with current API key (ID: {})", app, id);
                return Outcome::Unchanged;
            }

            tracing::info!("Updating {} API key (ID: {})", app, id);
            let updated = ApplicationResource {
                fields: reconcile_fields(&entry.fields, &desired),
                ..entry
            };

            match prowlarr.update_application(id, &updated).await {
                Ok(()) => {
                    tracing::info!("Updated {} in Prowlarr (ID: {})", app, id);
                    Outcome::Updated
                }
                Err(e) => {
                    tracing::error!("Failed to update {}: {}", app, e);
                    Outcome::Failed(e.to_string())
                }
            }
        }
        None => {
            let resource = ApplicationResource {
                id: None,
                name: app.to_string(),
                sync_level: "fullSync".to_string(),
                implementation: implementation.to_string(),
                config_contract: format!("{}Settings", implementation),
                fields: desired,
                tags: Vec::new(),
                extra: Map::new(),
            };

            match prowlarr.create_application(&resource).await {
                Ok(()) => {
                    tracing::info!("Added {} to Prowlarr", app);
                    Outcome::Created
                }
                Err(e) => {
                    tracing::error!("Failed to add {} to Prowlarr: {}", app, e);
                    Outcome::Failed(e.to_string())
                }
            }
        }
    }
}

/// Ask Prowlarr to test every registered application and log the verdicts.
pub async fn test_all(ctx: &StackContext, client: &Client) -> Option<Vec<ApplicationTestResult>> {
    let prowlarr = prowlarr_api(ctx, client).ok()?;

    match prowlarr.test_all_applications().await {
        Ok(results) => {
            tracing::info!("Tested all Prowlarr applications:");
            for result in &results {
                if result.is_valid {
                    tracing::info!("  App ID {}: Valid", result.id);
                } else {
                    let failures: Vec<String> = result
                        .validation_failures
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    tracing::warn!("  App ID {}: Invalid - {}", result.id, failures.join("; "));
                }
            }
            Some(results)
        }
        Err(e) => {
            tracing::warn!("Failed to test applications: {}", e);
            None
        }
    }
}

/// Run Prowlarr's connection test for the application named `name`.
///
/// Returns the entry's id when the test passes.
pub async fn test_one(ctx: &StackContext, client: &Client, name: &str) -> Result<i64> {
    let prowlarr = prowlarr_api(ctx, client)?;

    let id = prowlarr
        .list_applications()
        .await?
        .into_iter()
        .find(|a| apps::names_match(&a.name, name))
        .and_then(|a| a.id)
        .ok_or_else(|| Error::NotFound {
            kind: "application",
            name: name.to_string(),
        })?;

    prowlarr.test_application(id).await?;
    tracing::info!("Tested {} connection in Prowlarr", name);
    Ok(id)
}
