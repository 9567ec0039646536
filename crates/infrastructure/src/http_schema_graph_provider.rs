use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fieldgate_application::SchemaGraphProvider;
use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::SchemaSnapshot;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

/// Quiet period after a failed download before lookups try again.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Schema provider that downloads a JSON snapshot on first use and keeps it.
///
/// A failed download leaves the provider without a schema. Lookups within
/// the retry window after a failure do not download again; [`refresh`]
/// always does.
///
/// [`refresh`]: HttpSchemaGraphProvider::refresh
pub struct HttpSchemaGraphProvider {
    http_client: reqwest::Client,
    snapshot_url: Url,
    retry_after: Duration,
    snapshot: RwLock<Option<Arc<SchemaSnapshot>>>,
    last_failure: Mutex<Option<FetchFailure>>,
}

struct FetchFailure {
    at: Instant,
    invalid_snapshot: Option<String>,
}

impl FetchFailure {
    fn from_error(error: &AppError) -> Self {
        let invalid_snapshot = match error {
            AppError::Validation(message) => Some(message.clone()),
            _ => None,
        };

        Self {
            at: Instant::now(),
            invalid_snapshot,
        }
    }

    fn lookup_result(&self) -> AppResult<Option<Arc<SchemaSnapshot>>> {
        match &self.invalid_snapshot {
            Some(message) => Err(AppError::SchemaUnavailable(format!(
                "schema snapshot is invalid: {message}"
            ))),
            None => Ok(None),
        }
    }
}

impl HttpSchemaGraphProvider {
    /// Creates a provider for the given snapshot URL.
    pub fn new(snapshot_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Configuration(format!(
                    "failed to build schema snapshot HTTP client: {error}"
                ))
            })?;

        Ok(Self {
            http_client,
            snapshot_url,
            retry_after: DEFAULT_RETRY_AFTER,
            snapshot: RwLock::new(None),
            last_failure: Mutex::new(None),
        })
    }

    /// Overrides the quiet period after a failed download.
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Downloads the snapshot again and replaces the memoized one.
    ///
    /// On failure the previously loaded snapshot is kept.
    pub async fn refresh(&self) -> AppResult<Arc<SchemaSnapshot>> {
        let mut last_failure = self.last_failure.lock().await;
        match self.fetch().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.snapshot.write().await = Some(snapshot.clone());
                *last_failure = None;
                Ok(snapshot)
            }
            Err(error) => {
                *last_failure = Some(FetchFailure::from_error(&error));
                Err(error)
            }
        }
    }

    async fn fetch(&self) -> AppResult<SchemaSnapshot> {
        let response = self
            .http_client
            .get(self.snapshot_url.clone())
            .send()
            .await
            .map_err(|error| {
                AppError::Upstream(format!(
                    "failed to download schema snapshot from '{}': {error}",
                    self.snapshot_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "schema snapshot endpoint '{}' returned status {status}",
                self.snapshot_url
            )));
        }

        let body = response.bytes().await.map_err(|error| {
            AppError::Upstream(format!("failed to read schema snapshot body: {error}"))
        })?;
        let snapshot = SchemaSnapshot::from_json_slice(&body)?;

        info!(
            url = %self.snapshot_url,
            type_count = snapshot.type_count(),
            "schema snapshot downloaded"
        );

        Ok(snapshot)
    }

    async fn memoized(&self) -> Option<Arc<SchemaSnapshot>> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl SchemaGraphProvider for HttpSchemaGraphProvider {
    /// Returns the memoized snapshot, downloading it when absent.
    ///
    /// A snapshot that downloads but fails validation is reported as
    /// `SchemaUnavailable` with the validation message.
    async fn snapshot(&self) -> AppResult<Option<Arc<SchemaSnapshot>>> {
        if let Some(snapshot) = self.memoized().await {
            return Ok(Some(snapshot));
        }

        let mut last_failure = self.last_failure.lock().await;
        if let Some(snapshot) = self.memoized().await {
            return Ok(Some(snapshot));
        }
        if let Some(failure) = last_failure.as_ref()
            && failure.at.elapsed() < self.retry_after
        {
            return failure.lookup_result();
        }

        match self.fetch().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.snapshot.write().await = Some(snapshot.clone());
                *last_failure = None;
                Ok(Some(snapshot))
            }
            Err(error) => {
                warn!(
                    url = %self.snapshot_url,
                    error = %error,
                    "schema snapshot not available yet"
                );
                let failure = FetchFailure::from_error(&error);
                let result = failure.lookup_result();
                *last_failure = Some(failure);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use fieldgate_application::SchemaGraphProvider;
    use fieldgate_core::AppError;
    use serde_json::json;
    use url::Url;

    use super::HttpSchemaGraphProvider;

    #[derive(Default)]
    struct SnapshotStub {
        failures_before_success: usize,
        malformed: AtomicBool,
        requests: AtomicUsize,
    }

    async fn serve_snapshot(State(stub): State<Arc<SnapshotStub>>) -> Response {
        let request = stub.requests.fetch_add(1, Ordering::SeqCst);
        if request < stub.failures_before_success {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        if stub.malformed.load(Ordering::SeqCst) {
            return Json(json!({
                "types": [
                    {
                        "name": "Status",
                        "kind": "enum",
                        "fields": [{ "name": "a", "type": { "named": "ID" } }]
                    }
                ]
            }))
            .into_response();
        }

        Json(json!({
            "types": [
                {
                    "name": "User",
                    "kind": "object",
                    "fields": [{ "name": "id", "type": { "named": "ID" } }]
                },
                { "name": "ID", "kind": "scalar" }
            ]
        }))
        .into_response()
    }

    async fn spawn_snapshot_server(stub: Arc<SnapshotStub>) -> Url {
        let router = Router::new()
            .route("/schema.json", get(serve_snapshot))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| unreachable!());
        let address = listener.local_addr().unwrap_or_else(|_| unreachable!());

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Url::parse(&format!("http://{address}/schema.json")).unwrap_or_else(|_| unreachable!())
    }

    async fn provider_for(
        stub: Arc<SnapshotStub>,
        retry_after: Duration,
    ) -> HttpSchemaGraphProvider {
        HttpSchemaGraphProvider::new(spawn_snapshot_server(stub).await, Duration::from_secs(5))
            .unwrap_or_else(|_| unreachable!())
            .with_retry_after(retry_after)
    }

    #[tokio::test]
    async fn downloads_once_and_memoizes_snapshot() {
        let stub = Arc::new(SnapshotStub::default());
        let provider = provider_for(stub.clone(), Duration::from_secs(5)).await;

        let first = provider.snapshot().await.unwrap_or_default();
        let second = provider.snapshot().await.unwrap_or_default();

        assert_eq!(first.map(|snapshot| snapshot.type_count()), Some(2));
        assert!(second.is_some());
        assert_eq!(stub.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_download_reports_no_snapshot_and_retries_later() {
        let stub = Arc::new(SnapshotStub {
            failures_before_success: 1,
            ..SnapshotStub::default()
        });
        let provider = provider_for(stub.clone(), Duration::ZERO).await;

        assert!(matches!(provider.snapshot().await, Ok(None)));
        assert!(matches!(provider.snapshot().await, Ok(Some(_))));
        assert_eq!(stub.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn lookups_within_retry_window_do_not_download_again() {
        let stub = Arc::new(SnapshotStub {
            failures_before_success: 1,
            ..SnapshotStub::default()
        });
        let provider = Arc::new(provider_for(stub.clone(), Duration::from_secs(60)).await);

        assert!(matches!(provider.snapshot().await, Ok(None)));
        let concurrent: Vec<_> = (0..4)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.snapshot().await })
            })
            .collect();
        for lookup in concurrent {
            assert!(matches!(lookup.await, Ok(Ok(None))));
        }
        assert_eq!(stub.requests.load(Ordering::SeqCst), 1);

        assert!(provider.refresh().await.is_ok());
        assert!(matches!(provider.snapshot().await, Ok(Some(_))));
        assert_eq!(stub.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_snapshot_is_reported_with_its_cause() {
        let stub = Arc::new(SnapshotStub::default());
        stub.malformed.store(true, Ordering::SeqCst);
        let provider = provider_for(stub.clone(), Duration::from_secs(60)).await;

        let first = provider.snapshot().await;
        let Err(AppError::SchemaUnavailable(message)) = first else {
            unreachable!();
        };
        assert!(message.contains("invalid"));

        assert!(matches!(
            provider.snapshot().await,
            Err(AppError::SchemaUnavailable(_))
        ));
        assert_eq!(stub.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_downloads_again() {
        let stub = Arc::new(SnapshotStub::default());
        let provider = provider_for(stub.clone(), Duration::from_secs(5)).await;

        assert!(matches!(provider.snapshot().await, Ok(Some(_))));
        assert!(provider.refresh().await.is_ok());
        assert_eq!(stub.requests.load(Ordering::SeqCst), 2);
    }
}
