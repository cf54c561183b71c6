use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_GITLAB_API_BASE: &str = "https://gitlab.com/api/v4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that downloaded assets are written into
    pub destination_dir: PathBuf,

    /// Base URL of the GitHub REST API (override for GitHub Enterprise)
    pub github_api_base: String,

    /// Base URL of the GitLab REST API (override for self-hosted GitLab)
    pub gitlab_api_base: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Value sent in the `User-Agent` header of every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new_for_path(&Self::default_destination_dir())
    }
}

impl Config {
    pub fn new_for_path(destination_dir: &Path) -> Self {
        Self {
            destination_dir: destination_dir.to_path_buf(),
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            gitlab_api_base: DEFAULT_GITLAB_API_BASE.to_string(),
            timeout: None,
            user_agent: format!("relget/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets up a new Config writing into `destination_dir`, creating the directory if needed.
    /// See also [Self::default_destination_dir].
    pub fn setup(destination_dir: Option<&Path>) -> Result<Self> {
        let destination_dir = destination_dir
            .map(|d| d.to_path_buf())
            .unwrap_or_else(Self::default_destination_dir);
        let config = Self::new_for_path(&destination_dir);
        config.ensure_destination_dir()?;
        Ok(config)
    }

    pub fn ensure_destination_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.destination_dir).with_context(|| {
            format!(
                "Failed to create destination directory {}",
                self.destination_dir.display()
            )
        })
    }

    pub fn with_github_api_base(mut self, base: impl Into<String>) -> Self {
        self.github_api_base = base.into();
        self
    }

    pub fn with_gitlab_api_base(mut self, base: impl Into<String>) -> Self {
        self.gitlab_api_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The process working directory, or `.` when it cannot be determined.
    pub fn default_destination_dir() -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
