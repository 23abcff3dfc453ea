use serde::{Deserialize, Serialize};

/// Trending 的時間範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Since {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Since {
    pub fn as_str(&self) -> &'static str {
        match self {
            Since::Daily => "daily",
            Since::Weekly => "weekly",
            Since::Monthly => "monthly",
        }
    }
}

/// 從 Trending 頁面擷取的一筆 repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingRepository {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub stars_today: u64,
}

/// AI 挑選出來的 repository，`reason` 為空時填 `-`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRepository {
    pub name: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetRequest {
    pub repo_name: String,
    pub repo_url: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub stars_today: u64,
    pub readme_text: String,
    pub output_language: String,
    pub tone: String,
    pub max_chars: usize,
    pub thread: bool,
}

impl TweetRequest {
    pub fn new(repo: &TrendingRepository, readme_text: impl Into<String>, style: &TweetStyle) -> Self {
        Self {
            repo_name: repo.name.clone(),
            repo_url: repo.url.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            stars: repo.stars,
            stars_today: repo.stars_today,
            readme_text: readme_text.into(),
            output_language: style.output_language.clone(),
            tone: style.tone.clone(),
            max_chars: style.max_chars,
            thread: style.thread,
        }
    }
}

/// 推文風格參數，整個批次共用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetStyle {
    pub output_language: String,
    pub tone: String,
    pub max_chars: usize,
    pub thread: bool,
}

impl Default for TweetStyle {
    fn default() -> Self {
        Self {
            output_language: "English".to_string(),
            tone: "informative".to_string(),
            max_chars: 280,
            thread: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 錯誤訊息用的 body 片段
    pub fn snippet(&self) -> String {
        body_snippet(&self.body)
    }
}

pub const BODY_SNIPPET_CHARS: usize = 500;

pub fn body_snippet(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > BODY_SNIPPET_CHARS {
        let head: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// README 抓取結果；失敗時帶著原因，草稿照樣產生
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeStatus {
    Fetched(String),
    Missing(String),
}

impl ReadmeStatus {
    pub fn text(&self) -> &str {
        match self {
            ReadmeStatus::Fetched(text) => text,
            ReadmeStatus::Missing(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStatus {
    Generated(String),
    Failed(String),
    Skipped,
}

/// 單一 repository 的處理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub selected: SelectedRepository,
    pub readme: ReadmeStatus,
    pub draft: DraftStatus,
}

/// transform 階段的產出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBatch {
    pub candidates: Vec<TrendingRepository>,
    pub outcomes: Vec<RepoOutcome>,
}

impl DraftBatch {
    pub fn drafts(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.draft {
                DraftStatus::Generated(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}
