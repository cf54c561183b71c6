use crate::error::{FetchError, FetchResult};
use crate::release::AssetDescriptor;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const GITLAB_PRIVATE_TOKEN: HeaderName = HeaderName::from_static("private-token");

/// The hosting platforms a release can be fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// Repository identifier is `owner/repo`.
    GitHub,
    /// Repository identifier is the project id (or URL-encoded project path).
    GitLab,
}

/// Matches a single entry of `assets` in the GitHub release API response
#[derive(Debug, Deserialize)]
struct GitHubAssetJson {
    name: String,
    browser_download_url: String,
}

/// Matches a single entry of `assets.links` in the GitLab release API response
#[derive(Debug, Deserialize)]
struct GitLabLinkJson {
    name: String,
    url: String,
}

impl PlatformKind {
    pub fn label(&self) -> &'static str {
        match self {
            PlatformKind::GitHub => "GitHub",
            PlatformKind::GitLab => "GitLab",
        }
    }

    /// Builds the release metadata endpoint for `repository` at `tag` under `api_base`.
    /// Each path component is percent-encoded, so a GitLab `group/project` path stays one segment.
    pub fn metadata_url(&self, api_base: &str, repository: &str, tag: &str) -> FetchResult<Url> {
        let mut url =
            Url::parse(api_base).map_err(|_| FetchError::InvalidBaseUrl(api_base.to_string()))?;

        let segments: Vec<&str> = match self {
            PlatformKind::GitHub => {
                let (owner, repo) = repository
                    .split_once('/')
                    .filter(|(owner, repo)| {
                        !owner.is_empty() && !repo.is_empty() && !repo.contains('/')
                    })
                    .ok_or_else(|| FetchError::InvalidRepository(repository.to_string()))?;
                vec!["repos", owner, repo, "releases", "tags", tag]
            }
            PlatformKind::GitLab => {
                if repository.is_empty() {
                    return Err(FetchError::InvalidRepository(repository.to_string()));
                }
                vec!["projects", repository, "releases", tag]
            }
        };

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidBaseUrl(api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Headers that authenticate a request, empty when there is no token.
    /// Used for both the metadata request and every asset download.
    pub fn auth_headers(&self, token: Option<&str>) -> FetchResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let Some(token) = token else {
            return Ok(headers);
        };

        let (name, value) = match self {
            PlatformKind::GitHub => (AUTHORIZATION, format!("token {token}")),
            PlatformKind::GitLab => (GITLAB_PRIVATE_TOKEN, token.to_string()),
        };
        let mut value = HeaderValue::from_str(&value)?;
        value.set_sensitive(true);
        headers.insert(name, value);

        Ok(headers)
    }

    /// Extra headers the metadata request needs on top of [Self::auth_headers].
    pub fn metadata_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if *self == PlatformKind::GitHub {
            headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        }
        headers
    }

    /// Pulls the asset list out of a release metadata document.
    ///
    /// GitHub lists assets directly under `assets`; GitLab nests them under
    /// `assets.links`. A missing list yields no assets. Entries that do not
    /// look like an asset are skipped.
    pub fn extract_assets(&self, release: &Value) -> Vec<AssetDescriptor> {
        let pointer = match self {
            PlatformKind::GitHub => "/assets",
            PlatformKind::GitLab => "/assets/links",
        };
        let Some(entries) = release.pointer(pointer).and_then(Value::as_array) else {
            tracing::debug!("{} release has no asset list at {}", self, pointer);
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let parsed = match self {
                    PlatformKind::GitHub => GitHubAssetJson::deserialize(entry)
                        .map(|a| (a.name, a.browser_download_url)),
                    PlatformKind::GitLab => {
                        GitLabLinkJson::deserialize(entry).map(|l| (l.name, l.url))
                    }
                };
                let (name, url) = match parsed {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!("Skipping malformed {} asset entry: {}", self, e);
                        return None;
                    }
                };
                match Url::parse(&url) {
                    Ok(download_url) => Some(AssetDescriptor { name, download_url }),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping {} asset {} with invalid download URL '{}': {}",
                            self,
                            name,
                            url,
                            e
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_github_metadata_url() -> anyhow::Result<()> {
        let url = PlatformKind::GitHub.metadata_url(
            "https://api.github.com",
            "godotengine/godot",
            "4.2.1-stable",
        )?;
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/godotengine/godot/releases/tags/4.2.1-stable"
        );
        Ok(())
    }

    #[test]
    fn test_gitlab_metadata_url_keeps_api_prefix() -> anyhow::Result<()> {
        let url =
            PlatformKind::GitLab.metadata_url("https://gitlab.com/api/v4/", "278964", "v16.0.0")?;
        assert_eq!(
            url.as_str(),
            "https://gitlab.com/api/v4/projects/278964/releases/v16.0.0"
        );
        Ok(())
    }

    #[test]
    fn test_gitlab_project_path_is_one_segment() -> anyhow::Result<()> {
        let url = PlatformKind::GitLab.metadata_url(
            "https://gitlab.com/api/v4",
            "gitlab-org/gitlab",
            "v1",
        )?;
        assert_eq!(
            url.as_str(),
            "https://gitlab.com/api/v4/projects/gitlab-org%2Fgitlab/releases/v1"
        );
        Ok(())
    }

    #[test]
    fn test_github_repository_must_be_owner_and_name() {
        for repository in ["godot", "/godot", "godotengine/", "a/b/c"] {
            let result =
                PlatformKind::GitHub.metadata_url("https://api.github.com", repository, "v1");
            assert!(
                matches!(result, Err(FetchError::InvalidRepository(_))),
                "expected {repository} to be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let result = PlatformKind::GitLab.metadata_url("not a url", "1", "v1");
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_auth_headers_per_platform() -> anyhow::Result<()> {
        let github = PlatformKind::GitHub.auth_headers(Some("abc123"))?;
        assert_eq!(github.len(), 1);
        assert_eq!(github[AUTHORIZATION], "token abc123");
        assert!(github[AUTHORIZATION].is_sensitive());

        let gitlab = PlatformKind::GitLab.auth_headers(Some("glpat-xyz"))?;
        assert_eq!(gitlab.len(), 1);
        assert_eq!(gitlab["private-token"], "glpat-xyz");

        assert!(PlatformKind::GitHub.auth_headers(None)?.is_empty());
        assert!(PlatformKind::GitLab.auth_headers(None)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_auth_headers_reject_control_characters() {
        let result = PlatformKind::GitHub.auth_headers(Some("bad\ntoken"));
        assert!(matches!(result, Err(FetchError::InvalidToken(_))));
    }

    #[test]
    fn test_metadata_headers() {
        let github = PlatformKind::GitHub.metadata_headers();
        assert_eq!(github[ACCEPT], "application/vnd.github.v3+json");
        assert!(PlatformKind::GitLab.metadata_headers().is_empty());
    }

    #[test]
    fn test_extract_github_assets_in_order() {
        let release = json!({
            "tag_name": "v1.0.0",
            "assets": [
                {"name": "tool-linux.tar.gz", "browser_download_url": "https://example.com/linux", "size": 10},
                {"name": "tool-macos.tar.gz", "browser_download_url": "https://example.com/macos", "size": 10},
            ]
        });

        let assets = PlatformKind::GitHub.extract_assets(&release);

        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["tool-linux.tar.gz", "tool-macos.tar.gz"]);
        assert_eq!(assets[0].download_url.as_str(), "https://example.com/linux");
    }

    #[test]
    fn test_extract_gitlab_assets_from_links() {
        let release = json!({
            "tag_name": "v1.0.0",
            "assets": {
                "count": 3,
                "sources": [{"format": "zip", "url": "https://gitlab.com/source.zip"}],
                "links": [
                    {"id": 1, "name": "tool.deb", "url": "https://gitlab.com/tool.deb", "link_type": "package"}
                ]
            }
        });

        let assets = PlatformKind::GitLab.extract_assets(&release);

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "tool.deb");
        assert_eq!(assets[0].download_url.as_str(), "https://gitlab.com/tool.deb");
    }

    #[test]
    fn test_gitlab_ignores_assets_outside_links() {
        let top_level = json!({
            "assets": [{"name": "tool.deb", "url": "https://gitlab.com/tool.deb"}]
        });
        let unwrapped = json!({
            "assets": {"sources": []},
            "links": [{"name": "tool.deb", "url": "https://gitlab.com/tool.deb"}]
        });

        assert!(PlatformKind::GitLab.extract_assets(&top_level).is_empty());
        assert!(PlatformKind::GitLab.extract_assets(&unwrapped).is_empty());
    }

    #[test]
    fn test_extract_skips_malformed_entries() {
        let release = json!({
            "assets": [
                {"name": "no-url"},
                {"name": "bad-url", "browser_download_url": "::not a url::"},
                {"name": "good", "browser_download_url": "https://example.com/good"},
            ]
        });

        let assets = PlatformKind::GitHub.extract_assets(&release);

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "good");
    }

    #[test]
    fn test_extract_without_asset_list() {
        assert!(PlatformKind::GitHub.extract_assets(&json!({})).is_empty());
        assert!(PlatformKind::GitHub
            .extract_assets(&json!({"assets": null}))
            .is_empty());
    }
}
