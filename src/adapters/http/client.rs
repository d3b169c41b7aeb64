//! Generic REST API client.
//!
//! One `ApiClient` serves every domain surface: callers pass a relative
//! endpoint path and a response type, and get back the envelope-normalized
//! value or a bucketed [`ApiError`]. The bearer token is session state and
//! swaps atomically on auth changes.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ApiConfig;
use crate::domain::foundation::SyncError;
use crate::domain::session::AccessToken;

use super::envelope::{error_message, Envelope};
use super::error::ApiError;

/// Typed client for the backend REST API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<AccessToken>>,
}

impl ApiClient {
    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Init` if the base URL is malformed or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, SyncError> {
        let base_url = config.parsed_base_url().map_err(SyncError::init)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(SyncError::init)?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Installs the bearer token for subsequent requests.
    pub fn set_token(&self, token: AccessToken) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token);
    }

    /// Removes the bearer token (logout).
    pub fn clear_token(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }

    /// GET with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, query, None).await
    }

    /// POST a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// PUT a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// DELETE, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self.prepare(Method::DELETE, url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(
            status.as_u16(),
            error_message(&body, status.as_u16()),
        ))
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.prepare(method.clone(), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), error_message(&text, status.as_u16()));
            tracing::warn!(%method, path, status = status.as_u16(), "api request failed");
            return Err(err);
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.into_inner())
    }

    fn prepare(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, url);
        let token = self
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(token) = token.as_ref() {
            builder = builder.bearer_auth(token.reveal());
        }
        builder
    }

    /// Resolves a relative endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        join_endpoint(&self.base_url, path)
            .map_err(|_| ApiError::Network(format!("invalid endpoint path: {}", path)))
    }
}

/// Joins a base URL and a relative path without clobbering the base path.
///
/// `Url::join` drops the last base segment for paths not ending in `/`, so
/// the segments are appended explicitly.
fn join_endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined)
}
