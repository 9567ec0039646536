use std::time::Duration;

use async_trait::async_trait;
use fieldgate_application::RemotePermissionAuthority;
use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::GroupPermissionRecord;
use serde::Serialize;
use tracing::warn;
use url::Url;
use uuid::Uuid;


const REQUEST_ID_HEADER: &str = "x-fieldgate-request-id";

/// Connection settings for the remote permission authority.
#[derive(Debug, Clone)]
pub struct HttpPermissionAuthorityConfig {
    /// Base URL of the authority service.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per lookup, including the first one.
    pub max_attempts: u8,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Serialize)]
struct FindByGroupRequest<'a> {
    group_id: &'a str,
    entity_name: &'a str,
}

/// Remote permission authority reached over HTTP.
pub struct HttpPermissionAuthority {
    http_client: reqwest::Client,
    endpoint: String,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpPermissionAuthority {
    /// Creates a new authority client.
    pub fn new(config: HttpPermissionAuthorityConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Configuration(format!(
                    "failed to build permission authority HTTP client: {error}"
                ))
            })?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/permissions/find-by-group",
                config.base_url.as_str().trim_end_matches('/')
            ),
            max_attempts: config.max_attempts.max(1),
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn decode_records(group_id: &str, body: &[u8]) -> AppResult<Option<Vec<GroupPermissionRecord>>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(body).map_err(|error| {
            AppError::Upstream(format!(
                "permission authority returned an invalid body for group '{group_id}': {error}"
            ))
        })
    }
}

#[async_trait]
impl RemotePermissionAuthority for HttpPermissionAuthority {
    async fn find_permissions_by_group(
        &self,
        group_id: &str,
        entity_name: &str,
    ) -> AppResult<Option<Vec<GroupPermissionRecord>>> {
        let request_id = Uuid::new_v4().to_string();
        let payload = FindByGroupRequest {
            group_id,
            entity_name,
        };

        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let response = self
                .http_client
                .post(self.endpoint.as_str())
                .header(REQUEST_ID_HEADER, request_id.as_str())
                .json(&payload)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    let body = response.bytes().await.map_err(|error| {
                        AppError::Upstream(format!(
                            "failed to read permission authority response for group '{group_id}': {error}"
                        ))
                    })?;
                    return Self::decode_records(group_id, &body);
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from permission authority for group '{group_id}'",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Upstream(format!(
                        "permission authority rejected lookup for group '{group_id}' with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("permission authority transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                warn!(
                    request_id = %request_id,
                    group_id = %group_id,
                    attempt,
                    error = last_error.as_deref().unwrap_or_default(),
                    "retrying permission lookup"
                );
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Upstream(last_error.unwrap_or_else(|| {
            "permission lookup exhausted retries".to_owned()
        })))
    }
}
