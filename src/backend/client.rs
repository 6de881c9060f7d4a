//! Thin JSON client for the attendance REST backend.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::BackendError;
use crate::models::ApiEnvelope;

const USER_AGENT: &str = concat!("attendance-dashboards/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn request(&self, method: Method, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.build_url(endpoint))
            .header("Accept", "application/json");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, BackendError> {
        let response = builder.send().await?;
        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::GET, endpoint, Some(token)).query(query);
        Self::execute(builder).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        endpoint: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, endpoint, token).json(body);
        Self::execute(builder).await
    }

    /// POST an `application/x-www-form-urlencoded` body, for endpoints that
    /// read form fields instead of JSON.
    pub async fn post_form<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, endpoint, Some(token)).form(body);
        Self::execute(builder).await
    }

    /// POST without a body, used by the toggle/cancel style actions.
    pub async fn post_empty<T: DeserializeOwned>(&self, token: &str, endpoint: &str) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, endpoint, Some(token));
        Self::execute(builder).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::PUT, endpoint, Some(token)).json(body);
        Self::execute(builder).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, token: &str, endpoint: &str) -> Result<T, BackendError> {
        let builder = self.request(Method::DELETE, endpoint, Some(token));
        Self::execute(builder).await
    }
}

/// Unwrap a `{"success", "data", "message"}` envelope.
pub fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, BackendError> {
    match envelope {
        ApiEnvelope { success: true, data: Some(data), .. } => Ok(data),
        ApiEnvelope { message, .. } => {
            Err(BackendError::Rejected(message.unwrap_or_else(|| "Request was not successful".to_string())))
        }
    }
}
