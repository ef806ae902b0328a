//! Typed wrapper around the minecam REST API.

use std::time::Duration;

use minecam_core::{
    AccessToken, ApiResponse, Camera, EnhanceParams, EnhancementStatus, PublicUser,
    SystemSettings, VideoStreamUrl,
};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Client for one minecam server.
///
/// Calls are sequential request/response pairs; failures are returned as
/// [`ClientError`] and never retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://10.0.0.5:8000`).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token to every following request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Base address plus path segments, each percent-encoded.
    fn segment_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .map(|detail| match detail {
                Value::String(s) => s,
                other => other.to_string(),
            });
        tracing::debug!(
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "API request failed"
        );
        Err(ClientError::from_status(status.as_u16(), detail))
    }

    /// Payload of a raw (non-enveloped) JSON response.
    async fn raw<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        Ok(self.send(request).await?.json().await?)
    }

    /// `data` of an enveloped JSON response.
    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let envelope: ApiResponse<T> = self.raw(request).await?;
        Ok(envelope.data)
    }

    /// Exchange credentials for a token. The client itself is not changed;
    /// use [`Self::with_token`] with the returned token.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AccessToken> {
        let request = self
            .http
            .post(self.url("/api/token"))
            .form(&[("username", username), ("password", password)]);
        self.data(request).await
    }

    /// The user the current token belongs to.
    pub async fn current_user(&self) -> ClientResult<PublicUser> {
        self.data(self.http.get(self.url("/api/user/me"))).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.send(self.http.post(self.url("/api/logout"))).await?;
        Ok(())
    }

    pub async fn cameras(&self) -> ClientResult<Vec<Camera>> {
        self.data(self.http.get(self.url("/api/cameras"))).await
    }

    pub async fn camera_status(&self, camera_id: &str) -> ClientResult<Camera> {
        let url = self.segment_url(&["api", "cameras", camera_id, "status"])?;
        self.data(self.http.get(url)).await
    }

    /// Raw and enhanced MJPEG addresses of a camera.
    pub async fn stream_urls(&self, camera_id: &str) -> ClientResult<VideoStreamUrl> {
        let request = self
            .http
            .get(self.url("/api/video/stream"))
            .query(&[("camera_id", camera_id)]);
        self.data(request).await
    }

    pub async fn enhancement_status(&self, camera_id: &str) -> ClientResult<EnhancementStatus> {
        let request = self
            .http
            .get(self.url("/api/video/status"))
            .query(&[("camera_id", camera_id)]);
        self.data(request).await
    }

    pub async fn settings(&self) -> ClientResult<SystemSettings> {
        self.raw(self.http.get(self.url("/api/settings/get"))).await
    }

    /// Merge `patch` into the stored settings and return the result.
    pub async fn update_settings(&self, patch: &Map<String, Value>) -> ClientResult<SystemSettings> {
        let request = self.http.post(self.url("/api/settings/update")).json(patch);
        self.data(request).await
    }

    pub async fn reset_settings(&self) -> ClientResult<SystemSettings> {
        self.data(self.http.post(self.url("/api/settings/reset"))).await
    }

    pub async fn enhance_params(&self) -> ClientResult<EnhanceParams> {
        self.raw(self.http.get(self.url("/api/enhance_params"))).await
    }
}
