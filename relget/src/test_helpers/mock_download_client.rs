use crate::download_client::DownloadClient;
use crate::error::{FetchError, FetchResult};
use crate::outcome::DownloadOutcome;
use crate::release::{AssetDescriptor, DownloadRequest, ReleaseReference};
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// In-memory release that records every call instead of touching the network or disk.
pub struct MockDownloadClient {
    assets: Option<Vec<AssetDescriptor>>,
    failing: Vec<String>,
    resolve_calls: Mutex<usize>,
    downloads: Mutex<Vec<DownloadRequest>>,
}

impl MockDownloadClient {
    /// A release listing `names` in order; asset `i` is served from `https://example.com/{i}/{name}`.
    pub fn with_assets(names: &[&str]) -> Self {
        let assets = names
            .iter()
            .enumerate()
            .map(|(i, name)| AssetDescriptor {
                name: name.to_string(),
                download_url: Url::parse(&format!("https://example.com/{i}/{name}"))
                    .expect("valid mock URL"),
            })
            .collect();
        Self {
            assets: Some(assets),
            failing: Vec::new(),
            resolve_calls: Mutex::new(0),
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// A release whose metadata request always fails.
    pub fn unreachable() -> Self {
        Self {
            assets: None,
            ..Self::with_assets(&[])
        }
    }

    /// Makes the download of `name` fail with a transfer error.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    pub fn resolve_calls(&self) -> usize {
        *self.resolve_calls.lock().unwrap()
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.destination_name.clone())
            .collect()
    }

    pub fn downloaded_urls(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.download_url.to_string())
            .collect()
    }

    pub fn download_headers(&self) -> Vec<HeaderMap> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.auth_headers.clone())
            .collect()
    }
}

impl DownloadClient for MockDownloadClient {
    async fn release_assets(
        &self,
        reference: &ReleaseReference,
    ) -> FetchResult<Vec<AssetDescriptor>> {
        *self.resolve_calls.lock().unwrap() += 1;
        self.assets.clone().ok_or_else(|| FetchError::Status {
            url: format!("https://example.com/{}", reference.repository),
            status: StatusCode::SERVICE_UNAVAILABLE,
        })
    }

    async fn download_asset(&self, request: &DownloadRequest) -> DownloadOutcome {
        self.downloads.lock().unwrap().push(request.clone());
        let name = request.destination_name.as_str();
        if self.failing.iter().any(|f| f == name) {
            DownloadOutcome::transfer_error(name, "connection reset by peer")
        } else {
            DownloadOutcome::success(name, PathBuf::from(name))
        }
    }
}
