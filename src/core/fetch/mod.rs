mod client;
mod verify;

pub use client::{FetchOptions, Fetcher};
pub use verify::{artifact_valid, file_sha1};
