use crate::config::Config;
use crate::download_client::DownloadClient;
use crate::error::{FetchError, FetchResult};
use crate::logging::{progress_bar_style, spinner_style};
use crate::outcome::DownloadOutcome;
use crate::platform::PlatformKind;
use crate::release::{AssetDescriptor, DownloadRequest, ReleaseReference};
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// HTTP implementation of [DownloadClient] for GitHub and GitLab releases.
pub struct ReleaseClient {
    config: Config,
    client: Client,
}

impl DownloadClient for ReleaseClient {
    #[instrument(skip_all, fields(release = %reference))]
    async fn release_assets(&self, reference: &ReleaseReference) -> FetchResult<Vec<AssetDescriptor>> {
        let platform = reference.platform;
        let url = platform.metadata_url(
            self.api_base(platform),
            &reference.repository,
            &reference.tag,
        )?;
        let auth_headers = platform.auth_headers(reference.token.as_deref())?;

        tracing::debug!("Fetching release metadata from {}", url);
        let response = self
            .client
            .get(url.clone())
            .headers(platform.metadata_headers())
            .headers(auth_headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let release: Value = response.json().await.map_err(FetchError::Decode)?;
        let assets = platform.extract_assets(&release);
        tracing::debug!("Release {} lists {} assets", reference, assets.len());

        Ok(assets)
    }

    async fn download_asset(&self, request: &DownloadRequest) -> DownloadOutcome {
        let name = request.destination_name.as_str();
        let path = match self.destination_path(name) {
            Ok(path) => path,
            Err(e) => return DownloadOutcome::transfer_error(name, e.to_string()),
        };

        // Nothing on disk has been touched until the response is accepted.
        let response = match self.request_asset(request).await {
            Ok(response) => response,
            Err(e) => return DownloadOutcome::transfer_error(name, e.to_string()),
        };

        match write_response(response, name, &path).await {
            Ok(()) => DownloadOutcome::success(name, path),
            Err(e) => {
                remove_partial_file(&path).await;
                DownloadOutcome::transfer_error(name, e.to_string())
            }
        }
    }
}

impl ReleaseClient {
    pub fn new(config: &Config) -> FetchResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config: config.clone(),
            client: builder.build()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn api_base(&self, platform: PlatformKind) -> &str {
        match platform {
            PlatformKind::GitHub => &self.config.github_api_base,
            PlatformKind::GitLab => &self.config.gitlab_api_base,
        }
    }

    /// Resolves `name` inside the destination directory. Only a single plain file name is accepted.
    fn destination_path(&self, name: &str) -> FetchResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file_name)), None) if file_name == name => {
                Ok(self.config.destination_dir.join(file_name))
            }
            _ => Err(FetchError::InvalidAssetName(name.to_string())),
        }
    }

    async fn request_asset(&self, request: &DownloadRequest) -> FetchResult<Response> {
        tracing::debug!("Downloading {} from {}", request.destination_name, request.download_url);
        let response = self
            .client
            .get(request.download_url.clone())
            .headers(request.auth_headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.download_url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

/// Streams the body into `path`, truncating any existing file.
/// Returns once the data has been flushed and synced to disk.
#[instrument(skip_all)]
async fn write_response(response: Response, name: &str, path: &Path) -> FetchResult<()> {
    let current_span = tracing::Span::current();
    let total = response.content_length();
    let style = match total {
        Some(_) => progress_bar_style(),
        None => spinner_style("{msg} {bytes} ({bytes_per_sec})"),
    };
    if let Ok(style) = style {
        current_span.pb_set_style(&style);
    }
    if let Some(total) = total {
        current_span.pb_set_length(total);
    }
    current_span.pb_set_message(&format!("Downloading {name}..."));
    current_span.pb_set_finish_message(&format!("Downloading {name}... Complete!"));

    let mut file = tokio::fs::File::create(path).await?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        current_span.pb_set_position(downloaded);
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

async fn remove_partial_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Removed partial download {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Failed to remove partial download {}: {}",
            path.display(),
            e
        ),
    }
}
