//! GitHub Trending 擷取
//!
//! 每個 `article.Box-row` 是一筆 repository。欄位各自獨立擷取：少了標題連結只跳過
//! 該筆，描述、語言與星數缺漏時退回預設值。整頁找不到任何卡片代表版面改了，
//! 這時回傳 `ExtractionError` 而不是空清單。

use crate::domain::model::{Since, TrendingRepository};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{ItweetError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

pub const TRENDING_URL: &str = "https://github.com/trending";
pub const GITHUB_BASE_URL: &str = "https://github.com";
pub const LANGUAGE_PLACEHOLDER: &str = "N/A";

static STAR_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.(\d+))?([km]?)$").expect("valid star count pattern"));

struct CardSelectors {
    card: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
    language: Selector,
    stars: Selector,
    stars_today: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: selector("article.Box-row")?,
            title: selector("h2")?,
            link: selector("a")?,
            description: selector("p.col-9.color-fg-muted")?,
            language: selector(r#"span[itemprop="programmingLanguage"]"#)?,
            stars: selector(r#"a[href$="/stargazers"]"#)?,
            stars_today: selector("span.float-sm-right")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ItweetError::ExtractionError {
        message: format!("invalid selector '{}': {}", css, e),
    })
}

/// 解析 Trending 頁面，保留頁面上的排名順序
pub fn extract_repositories(document: &str) -> Result<Vec<TrendingRepository>> {
    let selectors = CardSelectors::new()?;
    let html = Html::parse_document(document);
    let base = Url::parse(GITHUB_BASE_URL).map_err(|e| ItweetError::ExtractionError {
        message: format!("invalid base url: {}", e),
    })?;

    let cards: Vec<ElementRef> = html.select(&selectors.card).collect();
    if cards.is_empty() {
        return Err(ItweetError::ExtractionError {
            message: "no repositories found".to_string(),
        });
    }

    let mut repos = Vec::with_capacity(cards.len());
    for (index, card) in cards.into_iter().enumerate() {
        match extract_card(card, &selectors, &base) {
            Some(repo) => repos.push(repo),
            None => tracing::debug!("Skipping trending card #{} without a title link", index + 1),
        }
    }

    tracing::debug!("Extracted {} repositories from trending page", repos.len());
    Ok(repos)
}

fn extract_card(card: ElementRef, selectors: &CardSelectors, base: &Url) -> Option<TrendingRepository> {
    let title = card.select(&selectors.title).next()?;
    let link = title.select(&selectors.link).next()?;
    let href = link.value().attr("href")?.trim();
    let url = base.join(href).ok()?;

    let description = first_text(card, &selectors.description).unwrap_or_default();
    let language = first_text(card, &selectors.language)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| LANGUAGE_PLACEHOLDER.to_string());
    let stars = first_text(card, &selectors.stars)
        .map(|text| parse_star_count(&text))
        .unwrap_or(0);
    let stars_today = first_text(card, &selectors.stars_today)
        .map(|text| parse_star_count(&text))
        .unwrap_or(0);

    Some(TrendingRepository {
        name: clean_repo_name(&link.text().collect::<String>()),
        url: url.to_string(),
        description,
        language,
        stars,
        stars_today,
    })
}

fn first_text(card: ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(|element| {
        element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// `owner /\n repo` -> `owner/repo`
pub fn clean_repo_name(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 解析星數：支援千分位逗號與 `k`/`m` 後綴，無法解析時回傳 0
///
/// `"1,234 stars today"` 只看第一個字串，得到 1234。
pub fn parse_star_count(value: &str) -> u64 {
    let text = value.trim().to_lowercase().replace(',', "");
    let Some(number) = text.split_whitespace().next() else {
        return 0;
    };
    let Some(caps) = STAR_COUNT.captures(number) else {
        return 0;
    };

    let multiplier: u128 = match caps.get(3).map(|m| m.as_str()) {
        Some("k") => 1_000,
        Some("m") => 1_000_000,
        _ => 1,
    };

    let Ok(whole) = caps[1].parse::<u128>() else {
        return 0;
    };
    let fraction = match caps.get(2) {
        // 小數位只取到乘數用得到的精度，其餘截斷
        Some(digits) => {
            let digits = &digits.as_str()[..digits.as_str().len().min(6)];
            let Ok(numerator) = digits.parse::<u128>() else {
                return 0;
            };
            numerator * multiplier / 10u128.pow(digits.len() as u32)
        }
        None => 0,
    };

    whole
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(fraction))
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

pub fn build_trending_url(base: &str, since: Since, language: Option<&str>) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| ItweetError::InvalidConfigValueError {
        field: "trending_url".to_string(),
        value: base.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        url.path_segments_mut()
            .map_err(|_| ItweetError::InvalidConfigValueError {
                field: "trending_url".to_string(),
                value: base.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(language);
    }
    url.query_pairs_mut().clear().append_pair("since", since.as_str());

    Ok(url.to_string())
}

/// 抓取 Trending 頁面並擷取 repository 清單
pub struct TrendingSource<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> TrendingSource<T> {
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, TRENDING_URL)
    }

    pub fn with_base_url(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub async fn fetch(&self, since: Since, language: Option<&str>) -> Result<Vec<TrendingRepository>> {
        let url = build_trending_url(&self.base_url, since, language)?;
        tracing::info!("📡 Fetching GitHub Trending: {}", url);

        let response = self.transport.get(&url, None).await?;
        if response.status != 200 {
            return Err(ItweetError::RemoteRejection {
                status: response.status,
                body: response.snippet(),
            });
        }

        extract_repositories(&response.body)
    }
}
