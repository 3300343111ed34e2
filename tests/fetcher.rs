mod common;

use std::sync::{Arc, Mutex};

use cubic_launcher_core::core::fetch::{FetchOptions, Fetcher};
use cubic_launcher_core::FetchError;
use tokio_util::sync::CancellationToken;

use common::{sha1_hex, StubResponse, StubServer};

#[tokio::test]
async fn follows_redirects_to_the_final_location() {
    let server = StubServer::start().await;
    server.route("/moved", StubResponse::redirect("/real"));
    server.route("/real", StubResponse::ok("hello world"));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("artifact.bin");
    let fetcher = Fetcher::new();

    fetcher
        .fetch(&server.url("/moved"), &dest, None)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
    assert_eq!(server.hit_count("/moved"), 1);
    assert_eq!(server.hit_count("/real"), 1);
}

#[tokio::test]
async fn http_failure_leaves_no_file_behind() {
    let server = StubServer::start().await;
    server.route("/missing", StubResponse::not_found());

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("artifact.bin");
    let fetcher = Fetcher::new();

    let err = fetcher
        .fetch(&server.url("/missing"), &dest, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http { status: 404, .. }));
    assert!(!dest.exists());
}

#[tokio::test]
async fn corrupted_transfer_is_retried_until_the_checksum_matches() {
    let good = b"the real artifact bytes";
    let server = StubServer::start().await;
    server.route_seq(
        "/lib.jar",
        vec![
            StubResponse::ok("corrupted"),
            StubResponse::ok("corrupted"),
            StubResponse::ok(good.as_slice()),
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("lib.jar");
    let fetcher = Fetcher::new();

    fetcher
        .fetch(&server.url("/lib.jar"), &dest, Some(&sha1_hex(good)))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), good);
    assert_eq!(server.hit_count("/lib.jar"), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_the_mismatch_and_remove_the_file() {
    let server = StubServer::start().await;
    server.route("/lib.jar", StubResponse::ok("always corrupted"));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("lib.jar");
    let fetcher = Fetcher::new();

    let err = fetcher
        .fetch(&server.url("/lib.jar"), &dest, Some(&sha1_hex(b"expected")))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ChecksumMismatch { .. }));
    assert!(!dest.exists());
    assert_eq!(server.hit_count("/lib.jar"), 3);
}

#[tokio::test]
async fn progress_reports_cumulative_bytes_and_total() {
    let body = vec![7u8; 4096];
    let server = StubServer::start().await;
    server.route("/big.bin", StubResponse::ok(body.clone()));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("big.bin");
    let fetcher = Fetcher::new();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let opts = FetchOptions {
        expected_sha1: None,
        progress: Some(Arc::new(move |p| sink.lock().unwrap().push(p))),
        cancel: CancellationToken::new(),
    };

    fetcher
        .fetch_with(&server.url("/big.bin"), &dest, &opts)
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    let last = seen.last().unwrap();
    assert_eq!(last.downloaded, body.len() as u64);
    assert_eq!(last.total, Some(body.len() as u64));
    assert_eq!(last.percent, Some(100));
    // Monotonic within a single transfer.
    assert!(seen.windows(2).all(|w| w[0].downloaded <= w[1].downloaded));
}

#[tokio::test]
async fn cancelled_token_short_circuits_before_any_request() {
    let server = StubServer::start().await;
    server.route("/lib.jar", StubResponse::ok("bytes"));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("lib.jar");
    let fetcher = Fetcher::new();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut opts = FetchOptions::verified(&sha1_hex(b"bytes"));
    opts.cancel = cancel;

    let err = fetcher
        .fetch_with(&server.url("/lib.jar"), &dest, &opts)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Cancelled { .. }));
    assert!(!dest.exists());
    assert_eq!(server.hit_count("/lib.jar"), 0);
}
