use crate::core::Pipeline;
use crate::domain::model::{DraftBatch, DraftStatus, ReadmeStatus, TrendingRepository};
use crate::utils::error::Result;
use std::fmt::Write as _;

/// 一次執行的結果
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub batch: DraftBatch,
    pub written: Vec<String>,
}

pub struct Engine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> Engine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Fetching trending repositories...");
        let repos = self.pipeline.extract().await?;
        tracing::info!("📦 Extracted {} repositories", repos.len());

        if repos.is_empty() {
            println!("\nNo trending repositories found.");
            return Ok(RunSummary::default());
        }
        print!("{}", render_listing(&repos));

        let batch = self.pipeline.transform(repos).await?;
        if !batch.outcomes.is_empty() {
            print!("{}", render_selection(&batch));
            print!("{}", render_drafts(&batch));
        }

        // 輸出檔寫入失敗只警告，草稿已經印在 stdout
        let written = match self.pipeline.load(&batch).await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!("⚠️ Failed to write output: {}", e);
                eprintln!("⚠️  Failed to write output: {}", e);
                Vec::new()
            }
        };
        for path in &written {
            println!("Saved tweets to: {}", path);
        }

        Ok(RunSummary { batch, written })
    }
}

pub fn render_listing(repos: &[TrendingRepository]) -> String {
    let mut out = String::from("\nTrending repositories:\n\n");
    for (idx, repo) in repos.iter().enumerate() {
        let today = if repo.stars_today > 0 {
            format!(" (+{} today)", repo.stars_today)
        } else {
            String::new()
        };
        let description = if repo.description.is_empty() {
            "-"
        } else {
            repo.description.as_str()
        };
        let _ = writeln!(out, "{}. {} [{}]", idx + 1, repo.name, repo.language);
        let _ = writeln!(out, "   {}", repo.url);
        let _ = writeln!(out, "   ⭐ {}{}", repo.stars, today);
        let _ = writeln!(out, "   {}\n", description);
    }
    out
}

pub fn render_selection(batch: &DraftBatch) -> String {
    let mut out = String::from("\nAI selected:\n\n");
    for (idx, outcome) in batch.outcomes.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, outcome.selected.name);
        let _ = writeln!(out, "   {}", outcome.selected.url);
        let _ = writeln!(out, "   reason: {}", outcome.selected.reason);
        match &outcome.readme {
            ReadmeStatus::Fetched(text) => {
                let _ = writeln!(out, "   README fetched: {} chars\n", text.chars().count());
            }
            ReadmeStatus::Missing(reason) => {
                let _ = writeln!(out, "   README fetch failed: {}\n", reason);
            }
        }
    }
    out
}

pub fn render_drafts(batch: &DraftBatch) -> String {
    let mut out = String::new();
    let mut skipped = false;
    for outcome in &batch.outcomes {
        match &outcome.draft {
            DraftStatus::Generated(text) => {
                let _ = writeln!(out, "- {}\n{}\n", outcome.selected.name, text);
            }
            DraftStatus::Failed(reason) => {
                let _ = writeln!(out, "❌ Failed to generate tweet for {}: {}", outcome.selected.name, reason);
            }
            DraftStatus::Skipped => skipped = true,
        }
    }
    if skipped && out.is_empty() {
        out.push_str("Tip: remove --no-tweets to generate tweet drafts.\n");
    } else if !out.is_empty() {
        out.insert_str(0, "Generating tweet drafts:\n\n");
    }
    out
}
