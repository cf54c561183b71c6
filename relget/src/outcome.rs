use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetResult {
    /// The asset was written in full to this path.
    Success(PathBuf),
    /// The release has no asset with the requested name.
    NotFound,
    /// The request, the transfer or the file write failed.
    TransferError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub destination_name: String,
    pub result: AssetResult,
}

impl DownloadOutcome {
    pub fn success(destination_name: &str, path: PathBuf) -> Self {
        Self {
            destination_name: destination_name.to_string(),
            result: AssetResult::Success(path),
        }
    }

    pub fn not_found(destination_name: &str) -> Self {
        Self {
            destination_name: destination_name.to_string(),
            result: AssetResult::NotFound,
        }
    }

    pub fn transfer_error(destination_name: &str, message: impl Into<String>) -> Self {
        Self {
            destination_name: destination_name.to_string(),
            result: AssetResult::TransferError(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, AssetResult::Success(_))
    }
}

/// Outcomes of one run, in the order the asset names were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<DownloadOutcome>,
    /// Set when the release metadata could not be fetched. Every outcome is then `NotFound`.
    pub resolution_error: Option<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.resolution_error.is_none() && self.outcomes.iter().all(DownloadOutcome::is_success)
    }

    /// `0` when every requested asset was downloaded, `1` otherwise.
    pub fn exit_code(&self) -> ExitCode {
        if self.all_succeeded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
