//! Catalog API client

pub mod auth;
pub mod config;
pub mod error;
pub mod headers;
pub mod middleware;

use config::ClientConfig;
use error::ClientError;
use headers::DefaultHeaders;
use middleware::{MiddlewareChain, RequestMiddleware, ResponseMiddleware};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Catalog API client
///
/// Cheap to clone; clones share the connection pool, the default headers and
/// the middleware chain they were built with.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: DefaultHeaders,
    middleware: MiddlewareChain,
    with_credentials: bool,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from a configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        ApiClientBuilder::from_config(config).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle to the shared default headers
    pub fn default_headers(&self) -> &DefaultHeaders {
        &self.default_headers
    }

    /// Append a request middleware stage
    #[must_use]
    pub fn with_request_middleware(mut self, middleware: Arc<dyn RequestMiddleware>) -> Self {
        self.middleware.push_request(middleware);
        self
    }

    /// Append a response middleware stage
    #[must_use]
    pub fn with_response_middleware(mut self, middleware: Arc<dyn ResponseMiddleware>) -> Self {
        self.middleware.push_response(middleware);
        self
    }

    /// Create a request builder carrying the default headers
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .client
            .request(method, url)
            .headers(self.default_headers.snapshot());

        #[cfg(target_arch = "wasm32")]
        let request = if self.with_credentials {
            request.fetch_credentials_include()
        } else {
            request
        };

        request
    }

    /// Send a request through the middleware chain.
    ///
    /// Non-success statuses come back as `Err`, after response middleware
    /// has seen them.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = self.middleware.apply_request(request.build()?)?;
        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let outcome = match self.client.execute(request).await {
            Ok(response) => Self::check_status(response).await,
            Err(e) => Err(ClientError::Network(e)),
        };

        self.middleware.apply_response(outcome)
    }

    /// Send a request and decode a JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.send(request).await.map(drop)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute_empty(self.request(Method::DELETE, path)).await
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_status(status, body))
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (request_stages, response_stages) = self.middleware.len();
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("with_credentials", &self.with_credentials)
            .field("request_stages", &request_stages)
            .field("response_stages", &response_stages)
            .finish_non_exhaustive()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    headers: HeaderMap,
    with_credentials: bool,
    requested_with: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    middleware: MiddlewareChain,
}

impl ApiClientBuilder {
    /// Start from a configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::default()
            .base_url(config.base_url.clone())
            .with_credentials(config.with_credentials);
        builder.requested_with.clone_from(&config.requested_with);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a default header sent with every request
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Include credentials (cookies) on cross-origin requests
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Set the `X-Requested-With` default header
    pub fn requested_with(mut self, value: impl Into<String>) -> Self {
        self.requested_with = Some(value.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn request_middleware(mut self, middleware: Arc<dyn RequestMiddleware>) -> Self {
        self.middleware.push_request(middleware);
        self
    }

    pub fn response_middleware(mut self, middleware: Arc<dyn ResponseMiddleware>) -> Self {
        self.middleware.push_response(middleware);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(requested_with) = &self.requested_with {
            let value = HeaderValue::from_str(requested_with).map_err(|e| {
                ClientError::Configuration(format!("invalid X-Requested-With value: {e}"))
            })?;
            headers.insert(X_REQUESTED_WITH, value);
        }
        headers.extend(self.headers);

        let client = Self::build_inner(self.timeout, self.user_agent, self.with_credentials)?;

        Ok(ApiClient {
            client,
            base_url,
            default_headers: DefaultHeaders::new(headers),
            middleware: self.middleware,
            with_credentials: self.with_credentials,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build_inner(
        timeout: Option<Duration>,
        user_agent: Option<String>,
        with_credentials: bool,
    ) -> Result<Client, ClientError> {
        let mut builder = ClientBuilder::new()
            .user_agent(user_agent.unwrap_or_else(|| "catalog-client/0.1.0".to_string()))
            .cookie_store(with_credentials);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    #[cfg(target_arch = "wasm32")]
    fn build_inner(
        _timeout: Option<Duration>,
        _user_agent: Option<String>,
        _with_credentials: bool,
    ) -> Result<Client, ClientError> {
        // The browser owns timeouts, the user agent and the cookie jar
        Ok(ClientBuilder::new().build()?)
    }
}
