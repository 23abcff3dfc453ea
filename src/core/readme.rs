//! README 抓取，用來給推文內容提供事實依據
//!
//! 1. GitHub REST API `/repos/{owner}/{repo}/readme` 取得 `download_url` 再下載
//! 2. 失敗就依序嘗試 raw.githubusercontent.com 上常見的 branch 與檔名
//!
//! 第一步的任何錯誤都只記 log 然後往下走，全部失敗才回 `ReadmeNotFound`。

use crate::domain::model::RepoRef;
use crate::domain::ports::HttpTransport;
use crate::utils::error::{ItweetError, Result};
use serde::Deserialize;
use url::Url;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_README_CHARS: usize = 6000;

const GITHUB_HOST: &str = "github.com";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// branch 在外層、檔名在內層，順序即優先序
pub const FALLBACK_BRANCHES: [&str; 2] = ["main", "master"];
pub const FALLBACK_FILENAMES: [&str; 5] = ["README.md", "README.MD", "README.rst", "README.txt", "README"];

#[derive(Debug, Deserialize)]
struct ReadmeMetadata {
    download_url: Option<String>,
}

/// 從 `https://github.com/{owner}/{repo}[.git][/...]` 解析出 owner/repo
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef> {
    let invalid = || ItweetError::InvalidReference {
        url: repo_url.to_string(),
    };

    let url = Url::parse(repo_url.trim()).map_err(|_| invalid())?;
    let host_matches = url
        .host_str()
        .map(|host| host.eq_ignore_ascii_case(GITHUB_HOST))
        .unwrap_or(false);
    if !host_matches || url.port().is_some() {
        return Err(invalid());
    }

    let parts: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let (owner, repo) = match parts.as_slice() {
        [owner, repo, ..] => (*owner, *repo),
        _ => return Err(invalid()),
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(invalid());
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// 統一換行並依字元數截斷；`max_chars` 為 0 表示不截斷
pub fn normalize_readme(text: &str, max_chars: usize) -> String {
    let text = text.replace("\r\n", "\n");
    if max_chars > 0 {
        text.chars().take(max_chars).collect()
    } else {
        text
    }
}

pub struct ReadmeRetriever<T: HttpTransport> {
    transport: T,
    api_base: String,
    raw_base: String,
}

impl<T: HttpTransport> ReadmeRetriever<T> {
    pub fn new(transport: T) -> Self {
        Self::with_bases(transport, GITHUB_API_URL, RAW_CONTENT_URL)
    }

    pub fn with_bases(transport: T, api_base: impl Into<String>, raw_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_readme(&self, repo_url: &str, max_chars: usize) -> Result<String> {
        let repo_ref = parse_repo_url(repo_url)?;

        let text = match self.fetch_via_api(&repo_ref).await {
            Some(text) => Some(text),
            None => self.fetch_via_raw_fallback(&repo_ref).await,
        };

        let text = text.ok_or_else(|| ItweetError::ReadmeNotFound {
            repo: format!("{}/{}", repo_ref.owner, repo_ref.repo),
        })?;

        Ok(normalize_readme(&text, max_chars))
    }

    async fn fetch_via_api(&self, repo_ref: &RepoRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, repo_ref.owner, repo_ref.repo);

        let response = match self.transport.get(&url, Some(GITHUB_JSON)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("README metadata request failed for {}: {}", url, e);
                return None;
            }
        };
        if response.status != 200 {
            tracing::debug!("README metadata returned HTTP {} for {}", response.status, url);
            return None;
        }

        let metadata: ReadmeMetadata = match serde_json::from_str(&response.body) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("README metadata was not valid JSON for {}: {}", url, e);
                return None;
            }
        };
        let download_url = metadata.download_url.filter(|u| !u.is_empty())?;

        match self.transport.get(&download_url, None).await {
            Ok(content) if content.status == 200 => Some(content.body),
            Ok(content) => {
                tracing::debug!("README download returned HTTP {} for {}", content.status, download_url);
                None
            }
            Err(e) => {
                tracing::debug!("README download failed for {}: {}", download_url, e);
                None
            }
        }
    }

    async fn fetch_via_raw_fallback(&self, repo_ref: &RepoRef) -> Option<String> {
        for branch in FALLBACK_BRANCHES {
            for filename in FALLBACK_FILENAMES {
                let url = format!(
                    "{}/{}/{}/{}/{}",
                    self.raw_base, repo_ref.owner, repo_ref.repo, branch, filename
                );
                match self.transport.get(&url, None).await {
                    Ok(response) if response.status == 200 && !response.body.trim().is_empty() => {
                        tracing::debug!("README found at {}", url);
                        return Some(response.body);
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::debug!("Raw README request failed for {}: {}", url, e);
                        continue;
                    }
                }
            }
        }
        None
    }
}
