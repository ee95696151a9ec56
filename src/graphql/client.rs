//! GraphQL client over the retrying HTTP transport

use super::types::{GraphQlRequest, Operation, OperationKind};
use crate::auth::{Authenticator, TokenStore};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::PageExecutor;
use crate::types::Response;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Client for a single GraphQL endpoint
///
/// Built once and shared; there is no process-wide instance.
#[derive(Debug)]
pub struct GraphQlClient {
    http: HttpClient,
    endpoint: Url,
}

impl GraphQlClient {
    /// Create a client posting to `endpoint` through `http`
    pub fn new(http: HttpClient, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self { http, endpoint })
    }

    /// Create a client from configuration, authenticating from `tokens`
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = HttpClient::with_config(config.to_http_config())?
            .with_authenticator(Authenticator::new(tokens));
        Self::new(http, &config.server_url)
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute an operation
    ///
    /// Application-level errors come back inside the `Response`; only
    /// transport and decoding problems are returned as `Err`.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<Response<O::Data>> {
        let body = serde_json::to_value(GraphQlRequest::for_operation(operation))?;

        let mut request = RequestConfig::new().json(body);
        if O::KIND == OperationKind::Mutation {
            request = request.retries(0);
        }

        debug!(operation = O::NAME, endpoint = %self.endpoint, "Executing GraphQL operation");

        let response = match self
            .http
            .request_json::<Response<O::Data>>(Method::POST, self.endpoint.as_str(), request)
            .await
        {
            Ok(response) => response,
            Err(Error::HttpStatus { status, body }) if (400..500).contains(&status) => {
                error_envelope(&body).ok_or(Error::HttpStatus { status, body })?
            }
            Err(e) => return Err(e),
        };

        if let Some(message) = response.first_error_message() {
            warn!(
                operation = O::NAME,
                errors = response.errors.len(),
                "GraphQL response carried errors: {message}"
            );
        }

        Ok(response)
    }

    /// Execute an operation and require data without errors
    pub async fn fetch_data<O: Operation>(&self, operation: &O) -> Result<O::Data> {
        let response = self.execute(operation).await?;

        if let Some(message) = response.first_error_message() {
            return Err(Error::graphql(O::NAME, message));
        }

        response
            .data
            .ok_or_else(|| Error::graphql(O::NAME, "response contained no data"))
    }
}

#[async_trait]
impl<O: Operation + 'static> PageExecutor<O, O::Data> for GraphQlClient {
    async fn execute(&self, request: O) -> Result<Response<O::Data>> {
        GraphQlClient::execute(self, &request).await
    }
}

/// Decode a 4xx body as a GraphQL error envelope
///
/// Servers reject invalid documents and variables with a client error status
/// but still report the problem in `errors`.
fn error_envelope<D: DeserializeOwned>(body: &str) -> Option<Response<D>> {
    serde_json::from_str::<Response<D>>(body)
        .ok()
        .filter(Response::has_errors)
}
