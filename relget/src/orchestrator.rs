use crate::config::Config;
use crate::download_client::DownloadClient;
use crate::outcome::{AssetResult, DownloadOutcome, RunReport};
use crate::release::{DownloadRequest, ReleaseReference, find_asset};
use crate::release_client::ReleaseClient;
use crate::ui;
use anyhow::{Context, Result};

/// Downloads each of `names` from the release into the client's destination directory.
///
/// The release metadata is fetched once. Names are handled one after another in the
/// given order and each gets exactly one outcome; a missing asset or failed transfer
/// never stops the remaining names. If the metadata cannot be fetched every name is
/// reported as not found and the cause is kept in [RunReport::resolution_error].
pub async fn download_release_assets<D, S>(
    client: &D,
    reference: &ReleaseReference,
    names: &[S],
) -> RunReport
where
    D: DownloadClient + Sync,
    S: AsRef<str>,
{
    let platform = reference.platform;

    let (assets, resolution_error) = match client.release_assets(reference).await {
        Ok(assets) => (assets, None),
        Err(e) => {
            ui::error(&format!("Error fetching {platform} release: {e}"));
            (Vec::new(), Some(e.to_string()))
        }
    };

    // An invalid token already failed the metadata request, leaving nothing to download.
    let auth_headers = platform
        .auth_headers(reference.token.as_deref())
        .unwrap_or_default();

    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();

        let Some(asset) = find_asset(&assets, name) else {
            ui::warning(&format!(
                "{platform}: Asset {name} not found in release {}",
                reference.tag
            ));
            outcomes.push(DownloadOutcome::not_found(name));
            continue;
        };

        let request = DownloadRequest::for_asset(asset, &auth_headers);
        let outcome = client.download_asset(&request).await;
        match &outcome.result {
            AssetResult::Success(path) => {
                ui::success(&format!("Downloaded {name} to {}", path.display()))
            }
            AssetResult::TransferError(message) => {
                ui::error(&format!("Error downloading file {name}: {message}"))
            }
            AssetResult::NotFound => {}
        }
        outcomes.push(outcome);
    }

    RunReport {
        outcomes,
        resolution_error,
    }
}

/// Downloads `names` from the release into `config.destination_dir` over HTTP.
///
/// Only setup problems (the HTTP client or the destination directory) are returned as
/// errors; everything that happens per asset is in the report.
pub async fn fetch_release_assets<S: AsRef<str>>(
    config: &Config,
    reference: &ReleaseReference,
    names: &[S],
) -> Result<RunReport> {
    config.ensure_destination_dir()?;
    let client = ReleaseClient::new(config).context("Failed to create HTTP client")?;

    ui::info(&format!(
        "Fetching {} assets from {}",
        names.len(),
        reference
    ));
    let report = download_release_assets(&client, reference, names).await;
    ui::summary(&report);

    Ok(report)
}
