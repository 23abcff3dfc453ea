use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::Local;

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// 推文草稿輸出：文字檔一行一則，或 JSON 陣列
pub struct OutputWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> OutputWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn write_text(&self, drafts: &[String], filename: Option<&str>) -> Result<String> {
        let name = filename
            .map(str::to_string)
            .unwrap_or_else(|| default_name("txt"));
        let content = render_text(drafts);

        let path = self.storage.write_file(&name, content.as_bytes()).await?;
        tracing::info!("💾 Saved {} drafts to {}", drafts.len(), path);
        Ok(path)
    }

    pub async fn write_json(&self, drafts: &[String], filename: Option<&str>) -> Result<String> {
        let name = filename
            .map(str::to_string)
            .unwrap_or_else(|| default_name("json"));
        let content = serde_json::to_string_pretty(drafts)?;

        let path = self.storage.write_file(&name, content.as_bytes()).await?;
        tracing::info!("💾 Saved {} drafts to {}", drafts.len(), path);
        Ok(path)
    }
}

pub fn render_text(drafts: &[String]) -> String {
    drafts
        .iter()
        .map(|draft| format!("{}\n", draft.trim_end()))
        .collect()
}

/// `tweets_20260101_093000.txt`
pub fn default_name(ext: &str) -> String {
    format!("tweets_{}.{}", Local::now().format("%Y%m%d_%H%M%S"), ext)
}
