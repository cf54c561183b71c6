pub mod config;
pub mod download_client;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod outcome;
pub mod platform;
pub mod release;
pub mod release_client;
pub mod ui;

pub use config::Config;
pub use download_client::DownloadClient;
pub use error::FetchError;
pub use orchestrator::{download_release_assets, fetch_release_assets};
pub use outcome::{AssetResult, DownloadOutcome, RunReport};
pub use platform::PlatformKind;
pub use release::{AssetDescriptor, DownloadRequest, ReleaseReference};
pub use release_client::ReleaseClient;

#[cfg(test)]
pub mod test_helpers;
