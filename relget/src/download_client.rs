use crate::error::FetchResult;
use crate::outcome::DownloadOutcome;
use crate::release::{AssetDescriptor, DownloadRequest, ReleaseReference};

pub trait DownloadClient {
    /// Fetches the release metadata and lists its assets in platform order.
    fn release_assets(
        &self,
        reference: &ReleaseReference,
    ) -> impl Future<Output = FetchResult<Vec<AssetDescriptor>>> + Send;

    /// Streams one asset to disk. Failures are reported in the outcome, never returned.
    fn download_asset(
        &self,
        request: &DownloadRequest,
    ) -> impl Future<Output = DownloadOutcome> + Send;

    /// Lists the release assets, logging the failure and returning an empty list
    /// when the metadata cannot be fetched.
    fn resolve(
        &self,
        reference: &ReleaseReference,
    ) -> impl Future<Output = Vec<AssetDescriptor>> + Send
    where
        Self: Sync,
    {
        async move {
            match self.release_assets(reference).await {
                Ok(assets) => assets,
                Err(e) => {
                    tracing::error!("Error fetching {} release: {}", reference.platform, e);
                    Vec::new()
                }
            }
        }
    }
}
