use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = "CubicLauncher/0.1.0";

/// Shared client for JSON metadata requests (manifest, descriptors, indexes).
/// Content downloads go through the Fetcher, which owns its own client with
/// redirect handling disabled.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    // Identity encoding keeps content-length honest for progress reporting.
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}
