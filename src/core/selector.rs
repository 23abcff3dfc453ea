//! 交給 AI 從候選 repository 中挑出值得發推的幾個
//!
//! 候選清單以 1 起算的 `id` 編號後轉成 JSON 放進 prompt，回覆必須是
//! `[{id, reason}]`。回覆中型別錯誤或超出範圍的項目直接略過。

use crate::domain::model::{SelectedRepository, TrendingRepository};
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use crate::utils::json_reply::decode_json_array;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PICK: usize = 4;
pub const MISSING_REASON: &str = "-";

#[derive(Debug, Serialize)]
struct CandidateRow<'a> {
    id: usize,
    name: &'a str,
    url: &'a str,
    description: &'a str,
    language: &'a str,
    stars: u64,
    stars_today: u64,
}

pub struct RepositorySelector<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> RepositorySelector<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub async fn select_top(
        &self,
        candidates: &[TrendingRepository],
        limit: usize,
    ) -> Result<Vec<SelectedRepository>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_selection_prompt(candidates, limit)?;
        tracing::debug!("🤖 Asking AI to pick {} of {} repositories", limit, candidates.len());
        let raw = self.generator.generate(&prompt).await?;

        parse_selection(&raw, candidates, limit)
    }
}

pub fn build_selection_prompt(candidates: &[TrendingRepository], limit: usize) -> Result<String> {
    let rows: Vec<CandidateRow> = candidates
        .iter()
        .enumerate()
        .map(|(index, repo)| CandidateRow {
            id: index + 1,
            name: &repo.name,
            url: &repo.url,
            description: &repo.description,
            language: &repo.language,
            stars: repo.stars,
            stars_today: repo.stars_today,
        })
        .collect();
    let payload = serde_json::to_string(&rows)?;

    Ok(format!(
        "You are selecting GitHub repositories for tweeting.\n\
         Pick the top {limit} that are most interesting or newsworthy.\n\
         Return ONLY valid JSON array with objects: {{id, reason}}.\n\
         No extra text.\n\n\
         Repos JSON:\n{payload}\n"
    ))
}

/// 解析 AI 回覆，依回覆順序輸出，最多 `limit` 筆
pub fn parse_selection(
    raw: &str,
    candidates: &[TrendingRepository],
    limit: usize,
) -> Result<Vec<SelectedRepository>> {
    let items = decode_json_array(raw)?;

    let selected: Vec<SelectedRepository> = items
        .iter()
        .take(limit)
        .filter_map(|item| selection_entry(item, candidates))
        .collect();

    tracing::debug!("AI reply had {} entries, {} usable", items.len(), selected.len());
    Ok(selected)
}

fn selection_entry(item: &Value, candidates: &[TrendingRepository]) -> Option<SelectedRepository> {
    let object = item.as_object()?;
    // 只接受 JSON 整數，"2" 或 2.0 都不算
    let id = object.get("id")?.as_u64()?;
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    let repo = candidates.get(index)?;

    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(MISSING_REASON);

    Some(SelectedRepository {
        name: repo.name.clone(),
        url: repo.url.clone(),
        reason: reason.to_string(),
    })
}
