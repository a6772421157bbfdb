use super::types::{
    ApplicationResource, ApplicationTestResult, DownloadClientResource, SystemStatus,
};
use crate::apps::{self, ApiVersion};
use crate::context::AppIdentity;
use crate::{Error, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Timeout for status and list requests
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for create, update and single test requests
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for Prowlarr's bulk application test
pub const TEST_ALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client. Timeouts are set per request.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("arrlink/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Authenticated handle on one app's REST API.
#[derive(Clone)]
pub struct ArrApi {
    client: Client,
    base_url: String,
    api_key: String,
    version: ApiVersion,
}

impl ArrApi {
    pub fn new(client: Client, base_url: &str, api_key: &str, version: ApiVersion) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            version,
        }
    }

    /// Handle for a loaded app, picking the API version from its name.
    pub fn for_app(client: Client, identity: &AppIdentity) -> Self {
        Self::new(
            client,
            &identity.api_url,
            &identity.api_key,
            apps::api_version(&identity.name),
        )
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}{}", self.base_url, self.version, path)
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("X-Api-Key", &self.api_key)
            .timeout(timeout)
    }

    async fn send(&self, request: RequestBuilder, expected: &[StatusCode]) -> Result<Response> {
        let response = request.send().await?;

        if !expected.contains(&response.status()) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .send(self.request(Method::GET, path, READ_TIMEOUT), &[StatusCode::OK])
            .await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        self.send(
            self.request(Method::POST, path, WRITE_TIMEOUT).json(body),
            &[StatusCode::OK, StatusCode::CREATED],
        )
        .await
    }

    /// `GET /system/status`
    ///
    /// Any 200 counts as reachable; the body is only parsed for display and
    /// falls back to an empty status when it is not the expected JSON.
    pub async fn system_status(&self) -> Result<SystemStatus> {
        let response = self
            .send(
                self.request(Method::GET, "/system/status", READ_TIMEOUT),
                &[StatusCode::OK],
            )
            .await?;
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// `GET /downloadclient`
    pub async fn list_download_clients(&self) -> Result<Vec<DownloadClientResource>> {
        self.get_json("/downloadclient").await
    }

    /// `POST /downloadclient`
    pub async fn create_download_client(&self, client: &DownloadClientResource) -> Result<()> {
        self.post_json("/downloadclient", client).await?;
        Ok(())
    }

    /// `GET /applications` (Prowlarr)
    pub async fn list_applications(&self) -> Result<Vec<ApplicationResource>> {
        self.get_json("/applications").await
    }

    /// `POST /applications` (Prowlarr)
    pub async fn create_application(&self, app: &ApplicationResource) -> Result<()> {
        self.post_json("/applications", app).await?;
        Ok(())
    }

    /// `PUT /applications/{id}` (Prowlarr); answers 202 Accepted.
    pub async fn update_application(&self, id: i64, app: &ApplicationResource) -> Result<()> {
        let path = format!("/applications/{}", id);
        self.send(
            self.request(Method::PUT, &path, WRITE_TIMEOUT).json(app),
            &[StatusCode::ACCEPTED],
        )
        .await?;
        Ok(())
    }

    /// `GET /applications/{id}/test` (Prowlarr)
    pub async fn test_application(&self, id: i64) -> Result<()> {
        let path = format!("/applications/{}/test", id);
        self.send(
            self.request(Method::GET, &path, WRITE_TIMEOUT),
            &[StatusCode::OK],
        )
        .await?;
        Ok(())
    }

    /// `POST /applications/testall` (Prowlarr)
    pub async fn test_all_applications(&self) -> Result<Vec<ApplicationTestResult>> {
        let response = self
            .send(
                self.request(Method::POST, "/applications/testall", TEST_ALL_TIMEOUT),
                &[StatusCode::OK],
            )
            .await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
