//! Snapshot fetcher
//!
//! One HTTP GET per request, bounded by a timeout. The body is returned as
//! opaque bytes; nothing here looks at image content.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bunwatch_config::{redact_url, SnapshotSettings};
use bunwatch_core::{CaptureError, SnapshotSource};
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("bunwatch/", env!("CARGO_PKG_VERSION"));

/// Fetch a still image from `url`.
///
/// Non-2xx responses fail with [`CaptureError::Fetch`]; no complete response
/// within `timeout` fails with [`CaptureError::Timeout`]. No retries.
pub async fn fetch_snapshot(client: &Client, url: &str, timeout: Duration) -> Result<Bytes, CaptureError> {
    let started = Instant::now();
    let request = async {
        let resp = client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CaptureError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        resp.bytes().await.map_err(|e| map_reqwest_error(e, timeout))
    };

    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(body)) => {
            debug!(
                url = %redact_url(url),
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched snapshot"
            );
            Ok(body)
        }
        Ok(Err(e)) => {
            warn!(url = %redact_url(url), error = %e, "Snapshot fetch failed");
            Err(e)
        }
        Err(_) => {
            warn!(url = %redact_url(url), timeout = ?timeout, "Snapshot fetch timed out");
            Err(CaptureError::Timeout(timeout))
        }
    }
}

fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> CaptureError {
    if e.is_timeout() {
        CaptureError::Timeout(timeout)
    } else {
        CaptureError::Transport(e.without_url().to_string())
    }
}

/// [`SnapshotSource`] backed by an HTTP camera endpoint.
pub struct SnapshotFetcher {
    client: Client,
    settings: SnapshotSettings,
}

impl SnapshotFetcher {
    pub fn new(settings: SnapshotSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: SnapshotSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &SnapshotSettings {
        &self.settings
    }
}

#[async_trait]
impl SnapshotSource for SnapshotFetcher {
    async fn fetch_snapshot(&self) -> Result<Bytes, CaptureError> {
        fetch_snapshot(&self.client, &self.settings.url, self.settings.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn router() -> Router {
        Router::new()
            .route("/snap.jpg", get(|| async { JPEG.to_vec() }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    JPEG.to_vec()
                }),
            )
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let base = serve(router()).await;
        let body = fetch_snapshot(&Client::new(), &format!("{base}/snap.jpg"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(&body[..], JPEG);
    }

    #[tokio::test]
    async fn not_found_is_fetch_failure_not_timeout() {
        let base = serve(router()).await;
        let err = fetch_snapshot(&Client::new(), &format!("{base}/missing"), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            CaptureError::Fetch { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let base = serve(router()).await;
        let started = Instant::now();
        let err = fetch_snapshot(&Client::new(), &format!("{base}/slow"), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn fetcher_uses_settings() {
        let base = serve(router()).await;
        let fetcher = SnapshotFetcher::new(SnapshotSettings {
            url: format!("{base}/snap.jpg"),
            filename: "creep.jpg".into(),
            timeout: Duration::from_secs(5),
        });
        let body = fetcher.fetch_snapshot().await.unwrap();
        assert_eq!(body.len(), JPEG.len());
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = fetch_snapshot(&Client::new(), &format!("http://{addr}/snap.jpg"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Transport(_)), "got {err:?}");
    }
}
