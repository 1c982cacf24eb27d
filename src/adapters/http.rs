//! Reqwest-backed user source.
//!
//! One GET per call. The response is parsed as a whole before anything is
//! returned, so a bad record fails the entire fetch.

use crate::core::limit::apply_limit;
use crate::domain::model::{SchemaTolerant, User};
use crate::domain::ports::{ConfigProvider, UserSource};
use crate::utils::error::{Result, UsersError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroUsize;

pub struct HttpUserSource {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
}

impl HttpUserSource {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            headers: HeaderMap::new(),
        }
    }

    /// Builds a source from configuration, validating the endpoint.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = validate_url("api_endpoint", config.api_endpoint())?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| UsersError::ConfigError {
            message: format!("HTTP client could not be built: {}", e),
        })?;

        let headers = parse_headers(config.headers())?;

        Ok(Self {
            client,
            endpoint,
            headers,
        })
    }

    /// Fetches and decodes every user the upstream returns.
    pub async fn fetch_all(&self) -> Result<Vec<User>> {
        let request = self
            .client
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .headers(self.headers.clone());

        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = request.send().await.map_err(|e| self.unavailable(&e))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(UsersError::UpstreamStatus {
                endpoint: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.unavailable(&e))?;
        parse_users(&body)
    }

    fn unavailable(&self, error: &reqwest::Error) -> UsersError {
        UsersError::UpstreamUnavailable {
            endpoint: self.endpoint.to_string(),
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_users(&self, limit: NonZeroUsize) -> Result<Vec<User>> {
        let users = self.fetch_all().await?;
        let total = users.len();
        let users = apply_limit(users, limit);
        tracing::info!("Fetched {} users, returning {}", total, users.len());
        Ok(users)
    }
}

/// Turns configured headers into a [`HeaderMap`] so a bad name or value is
/// reported as configuration, not as an unreachable upstream.
fn parse_headers(configured: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(configured.len());
    for (key, value) in configured {
        let invalid = |reason: String| UsersError::InvalidConfigValueError {
            field: format!("headers.{}", key),
            value: value.clone(),
            reason,
        };
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| invalid(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| invalid(format!("Invalid header value: {}", e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Decodes a response body that must be a JSON array of user objects.
pub fn parse_users(body: &[u8]) -> Result<Vec<User>> {
    let json: Value = serde_json::from_slice(body).map_err(|e| UsersError::UpstreamSchema {
        message: format!("response body is not valid JSON: {}", e),
    })?;

    let items = match json {
        Value::Array(items) => items,
        other => {
            return Err(UsersError::UpstreamSchema {
                message: format!("expected a JSON array, got {}", json_type(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(UsersError::UpstreamSchema {
                    message: format!(
                        "element {} is {}, expected an object",
                        index,
                        json_type(&item)
                    ),
                });
            }
            User::from_json(item).map_err(|e| e.in_record(index))
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
