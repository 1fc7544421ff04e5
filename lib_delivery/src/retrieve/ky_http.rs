//! # HTTP Retrieval Utilities
//!
//! An asynchronous API client wrapper around `reqwest`, with middleware-based
//! transport retries (exponential backoff) and standardized response handling.
//! A non-2xx status is not an error at this level: it comes back as an
//! unsuccessful [`ApiResponse`] and the caller decides what it means.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{de::DeserializeOwned, Serialize};

/// A standardized container for API responses.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The deserialized response body, if the request succeeded.
    pub data: Option<T>,
    /// The raw body returned by the server if the request failed.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The headers returned by the server.
    pub headers: HeaderMap,
}

impl<T> ApiResponse<T> {
    /// Turns the response into its payload, or an error naming the status.
    pub fn into_data(self) -> anyhow::Result<T> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(anyhow::anyhow!(
                "HTTP {}: {}",
                self.status,
                self.error_body.unwrap_or_default().chars().take(200).collect::<String>()
            )),
        }
    }
}

/// A flexible asynchronous HTTP client.
///
/// Handles base URLs, bearer authentication, timeouts and transport retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: ClientWithMiddleware,
    base_url: Url,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Creates a client with no transport retries and a 10 second timeout.
    ///
    /// # Errors
    /// Fails if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, auth_token: Option<String>) -> anyhow::Result<Self> {
        Self::with_options(base_url, auth_token, 0, Duration::from_secs(10))
    }

    /// Creates a client with explicit transport settings.
    ///
    /// # Arguments
    /// * `base_url` - Absolute base URL; relative paths are joined onto it.
    /// * `auth_token` - Optional bearer token.
    /// * `transport_retries` - Retries of transient transport failures (0 disables).
    /// * `timeout` - Whole-request timeout.
    pub fn with_options(
        base_url: &str,
        auth_token: Option<String>,
        transport_retries: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("invalid base URL '{}'", base_url))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let mut builder = ClientBuilder::new(client);
        if transport_retries > 0 {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(transport_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            inner: builder.build(),
            base_url: url,
            auth_token,
        })
    }

    /// Base URL relative paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn builder(&self, method: Method, path: &str, headers: Option<HeaderMap>) -> anyhow::Result<reqwest_middleware::RequestBuilder> {
        let full_url = self.base_url.join(path)?;
        let mut req = self.inner.request(method, full_url);

        if let Some(h) = headers {
            req = req.headers(h);
        }
        if let Some(token) = &self.auth_token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        Ok(req)
    }

    /// Performs a JSON request.
    ///
    /// # Arguments
    /// * `method` - The HTTP verb.
    /// * `path` - Path relative to the base URL.
    /// * `query` - Query pairs, URL-encoded by the client.
    /// * `headers` - Extra headers for this request.
    /// * `body` - Optional JSON body.
    ///
    /// # Errors
    /// URL joining, network execution and body decoding failures.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        headers: Option<HeaderMap>,
        body: Option<B>,
    ) -> anyhow::Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let mut req = self.builder(method, path, headers)?.header(ACCEPT, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            let json_body = serde_json::to_string(&b)?;
            req = req.header(CONTENT_TYPE, "application/json").body(json_body);
        }

        let response: reqwest::Response = req.send().await?;
        let status = response.status();
        let resp_headers = response.headers().clone();

        if status.is_success() {
            let data = response.json::<T>().await?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
                headers: resp_headers,
            })
        } else {
            let error_text = response.text().await.ok();
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
            })
        }
    }

    /// GET returning the decoded JSON payload; non-2xx becomes an error.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> anyhow::Result<T> {
        self.request::<T, ()>(Method::GET, path, query, None, None)
            .await?
            .into_data()
    }

    /// GET returning the raw body, for plain-text endpoints.
    pub async fn get_text(&self, path: &str) -> anyhow::Result<String> {
        let response = self.builder(Method::GET, path, None)?.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("HTTP {}: {}", status.as_u16(), text.chars().take(200).collect::<String>());
        }
        Ok(text)
    }
}
