// ─── Content Fetcher ───
// Streaming HTTP download with bounded redirect following, per-chunk
// progress, and checksum-verified retry. Callers never observe a truncated
// artifact: every failure path removes the partial destination file.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, Url};
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::error::FetchError;
use crate::core::progress::FetchProgress;

const APP_USER_AGENT: &str = "CubicLauncher/0.1.0";

/// Redirect hop budget. Each hop re-issues the GET at the new location.
const MAX_REDIRECTS: usize = 5;

/// Attempts for a checksum-verified fetch before surfacing the failure.
const RETRY_ATTEMPTS: u32 = 3;

/// Backoff grows linearly: `attempt * RETRY_BASE_DELAY`.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

pub type ProgressFn = dyn Fn(FetchProgress) + Send + Sync;

/// Per-fetch options. Cloning is cheap; the cancellation token and progress
/// callback are shared handles.
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Expected SHA-1 of the destination content. Absence means the transfer
    /// is trusted once complete.
    pub expected_sha1: Option<String>,
    pub progress: Option<Arc<ProgressFn>>,
    pub cancel: CancellationToken,
}

impl FetchOptions {
    pub fn verified(sha1: &str) -> Self {
        Self {
            expected_sha1: Some(sha1.to_string()),
            ..Self::default()
        }
    }

    fn report(&self, downloaded: u64, total: Option<u64>) {
        if let Some(progress) = &self.progress {
            let percent = total.map(|t| {
                if t == 0 {
                    100
                } else {
                    ((downloaded * 100) / t).min(100) as u8
                }
            });
            progress(FetchProgress {
                downloaded,
                total,
                percent,
            });
        }
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a dedicated client with automatic redirects disabled — the
    /// fetcher owns the hop loop so the budget stays explicit.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Download `url` to `dest`, verifying against `expected_sha1` when set.
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        expected_sha1: Option<&str>,
    ) -> Result<(), FetchError> {
        let opts = FetchOptions {
            expected_sha1: expected_sha1.map(str::to_string),
            ..FetchOptions::default()
        };
        self.fetch_with(url, dest, &opts).await
    }

    /// Full contract: streaming transfer, progress callback, cancellation,
    /// and (when a hash is expected) retry with linear backoff.
    pub async fn fetch_with(
        &self,
        url: &str,
        dest: &Path,
        opts: &FetchOptions,
    ) -> Result<(), FetchError> {
        let Some(expected) = opts.expected_sha1.as_deref() else {
            self.fetch_once(url, dest, opts).await?;
            return Ok(());
        };

        let mut last_err = None;
        for attempt in 1..=RETRY_ATTEMPTS {
            if opts.cancel.is_cancelled() {
                return Err(FetchError::Cancelled {
                    url: url.to_string(),
                });
            }

            match self.fetch_once(url, dest, opts).await {
                Ok(actual) if actual.eq_ignore_ascii_case(expected) => return Ok(()),
                Ok(actual) => {
                    warn!(
                        url,
                        attempt, expected, actual, "checksum mismatch, removing artifact"
                    );
                    let _ = tokio::fs::remove_file(dest).await;
                    last_err = Some(FetchError::ChecksumMismatch {
                        path: dest.to_path_buf(),
                        expected: expected.to_string(),
                        actual,
                    });
                }
                Err(err @ FetchError::Cancelled { .. }) => return Err(err),
                Err(err) => {
                    warn!(url, attempt, %err, "fetch attempt failed");
                    last_err = Some(err);
                }
            }

            if attempt < RETRY_ATTEMPTS {
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
            }
        }

        Err(last_err.expect("retry loop ran at least once"))
    }

    /// One transfer attempt. Returns the SHA-1 of the bytes written, computed
    /// incrementally while streaming. Removes the partial file on any failure.
    async fn fetch_once(
        &self,
        url: &str,
        dest: &Path,
        opts: &FetchOptions,
    ) -> Result<String, FetchError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(parent, &e))?;
        }

        let response = self.follow_redirects(url).await?;

        match self.stream_to_disk(url, response, dest, opts).await {
            Ok(sha1) => {
                debug!(url, dest = %dest.display(), "downloaded");
                Ok(sha1)
            }
            Err(err) => {
                let _ = tokio::fs::remove_file(dest).await;
                Err(err)
            }
        }
    }

    /// Issue GETs until a non-3xx response, bounded by [`MAX_REDIRECTS`].
    /// An exhausted budget (or a 3xx without Location) surfaces the last
    /// status as a plain HTTP failure.
    async fn follow_redirects(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut current = url.to_string();
        let mut last_status = StatusCode::MULTIPLE_CHOICES;

        for _ in 0..=MAX_REDIRECTS {
            let response = self
                .client
                .get(&current)
                .send()
                .await
                .map_err(|e| FetchError::transport(&current, &e))?;
            let status = response.status();

            if status.is_redirection() {
                last_status = status;
                let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                else {
                    return Err(FetchError::Http {
                        url: current,
                        status: status.as_u16(),
                    });
                };
                // Relative Location resolves against the current URL.
                current = Url::parse(&current)
                    .and_then(|base| base.join(location))
                    .map_err(|e| FetchError::Transport {
                        url: current.clone(),
                        cause: e.to_string(),
                    })?
                    .to_string();
                debug!(url, redirect = %current, "following redirect");
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::Http {
                    url: current,
                    status: status.as_u16(),
                });
            }

            return Ok(response);
        }

        Err(FetchError::Http {
            url: current,
            status: last_status.as_u16(),
        })
    }

    async fn stream_to_disk(
        &self,
        url: &str,
        response: reqwest::Response,
        dest: &Path,
        opts: &FetchOptions,
    ) -> Result<String, FetchError> {
        let total = response.content_length();
        let mut stream = response.bytes_stream();

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| FetchError::io(dest, &e))?;
        let mut hasher = Sha1::new();
        let mut downloaded = 0u64;

        loop {
            let chunk = tokio::select! {
                _ = opts.cancel.cancelled() => {
                    return Err(FetchError::Cancelled { url: url.to_string() });
                }
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk.map_err(|e| FetchError::transport(url, &e))?;

            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::io(dest, &e))?;
            downloaded += chunk.len() as u64;
            opts.report(downloaded, total);
        }

        file.flush().await.map_err(|e| FetchError::io(dest, &e))?;
        // Drop the handle before the caller may remove or re-open the file.
        drop(file);

        Ok(hex::encode(hasher.finalize()))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
