use crate::platform::PlatformKind;
use reqwest::Url;
use reqwest::header::HeaderMap;
use std::fmt;

/// Identifies one tagged release on a hosting platform.
#[derive(Clone, PartialEq, Eq)]
pub struct ReleaseReference {
    pub platform: PlatformKind,
    /// `owner/repo` on GitHub, the project id on GitLab.
    pub repository: String,
    pub tag: String,
    pub token: Option<String>,
}

impl ReleaseReference {
    pub fn github(owner: &str, repo: &str, tag: &str) -> Self {
        Self {
            platform: PlatformKind::GitHub,
            repository: format!("{owner}/{repo}"),
            tag: tag.to_string(),
            token: None,
        }
    }

    pub fn gitlab(project_id: &str, tag: &str) -> Self {
        Self {
            platform: PlatformKind::GitLab,
            repository: project_id.to_string(),
            tag: tag.to_string(),
            token: None,
        }
    }

    /// Attaches an access token. Empty tokens are treated as absent.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }
}

impl fmt::Debug for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseReference")
            .field("platform", &self.platform)
            .field("repository", &self.repository)
            .field("tag", &self.tag)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.platform, self.repository, self.tag)
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub name: String,
    pub download_url: Url,
}

/// Everything needed to fetch one asset into the destination directory.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub download_url: Url,
    pub destination_name: String,
    pub auth_headers: HeaderMap,
}

impl DownloadRequest {
    pub fn for_asset(asset: &AssetDescriptor, auth_headers: &HeaderMap) -> Self {
        Self {
            download_url: asset.download_url.clone(),
            destination_name: asset.name.clone(),
            auth_headers: auth_headers.clone(),
        }
    }
}

/// First asset whose name is exactly `name`, in the order the platform listed them.
pub fn find_asset<'a>(assets: &'a [AssetDescriptor], name: &str) -> Option<&'a AssetDescriptor> {
    assets.iter().find(|asset| asset.name == name)
}
