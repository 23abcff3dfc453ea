use crate::core::output::OutputWriter;
use crate::core::prompt::build_tweet_prompt;
use crate::core::readme::{ReadmeRetriever, GITHUB_API_URL, RAW_CONTENT_URL};
use crate::core::selector::RepositorySelector;
use crate::core::trending::{TrendingSource, TRENDING_URL};
use crate::core::{ConfigProvider, HttpTransport, Pipeline, Storage, TextGenerator};
use crate::domain::model::{
    DraftBatch, DraftStatus, ReadmeStatus, RepoOutcome, SelectedRepository, TrendingRepository,
    TweetRequest, TweetStyle,
};
use crate::utils::error::{ItweetError, Result};
use futures::stream::{self, StreamExt};

/// 外部服務位址，測試時指向 mock server
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub trending_url: String,
    pub github_api_url: String,
    pub raw_content_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            trending_url: TRENDING_URL.to_string(),
            github_api_url: GITHUB_API_URL.to_string(),
            raw_content_url: RAW_CONTENT_URL.to_string(),
        }
    }
}

/// Trending -> AI 挑選 -> README -> 推文草稿 -> 輸出
pub struct TrendingPipeline<G, T, S, C>
where
    G: TextGenerator,
    T: HttpTransport + Clone,
    S: Storage,
    C: ConfigProvider,
{
    source: TrendingSource<T>,
    readmes: ReadmeRetriever<T>,
    generator: G,
    writer: OutputWriter<S>,
    config: C,
}

impl<G, T, S, C> TrendingPipeline<G, T, S, C>
where
    G: TextGenerator,
    T: HttpTransport + Clone,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(generator: G, transport: T, storage: S, config: C) -> Self {
        Self::with_endpoints(generator, transport, storage, config, Endpoints::default())
    }

    pub fn with_endpoints(generator: G, transport: T, storage: S, config: C, endpoints: Endpoints) -> Self {
        Self {
            source: TrendingSource::with_base_url(transport.clone(), endpoints.trending_url),
            readmes: ReadmeRetriever::with_bases(
                transport,
                endpoints.github_api_url,
                endpoints.raw_content_url,
            ),
            generator,
            writer: OutputWriter::new(storage),
            config,
        }
    }

    async fn fetch_readme(&self, selected: &SelectedRepository) -> ReadmeStatus {
        match self
            .readmes
            .fetch_readme(&selected.url, self.config.readme_chars())
            .await
        {
            Ok(text) => {
                tracing::info!("📄 {}: README fetched: {} chars", selected.name, text.chars().count());
                ReadmeStatus::Fetched(text)
            }
            Err(e) => {
                tracing::warn!("📄 {}: README fetch failed: {}", selected.name, e);
                ReadmeStatus::Missing(e.to_string())
            }
        }
    }

    async fn draft_tweet(&self, repo: &TrendingRepository, readme: &ReadmeStatus, style: &TweetStyle) -> DraftStatus {
        let request = TweetRequest::new(repo, readme.text(), style);
        let prompt = build_tweet_prompt(&request);

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                tracing::info!("✍️ {}: draft generated", repo.name);
                DraftStatus::Generated(text)
            }
            Err(e) => {
                tracing::error!("❌ Failed to generate tweet for {}: {}", repo.name, e);
                DraftStatus::Failed(e.to_string())
            }
        }
    }

    /// 單一 repository 的失敗只記在結果裡，不影響其他 repository
    async fn process_repository(
        &self,
        selected: SelectedRepository,
        candidates: &[TrendingRepository],
        style: &TweetStyle,
    ) -> RepoOutcome {
        let readme = self.fetch_readme(&selected).await;

        let draft = if self.config.no_tweets() {
            DraftStatus::Skipped
        } else {
            match candidates.iter().find(|repo| repo.name == selected.name) {
                Some(repo) => self.draft_tweet(repo, &readme, style).await,
                None => DraftStatus::Skipped,
            }
        };

        RepoOutcome {
            selected,
            readme,
            draft,
        }
    }
}

#[async_trait::async_trait]
impl<G, T, S, C> Pipeline for TrendingPipeline<G, T, S, C>
where
    G: TextGenerator,
    T: HttpTransport + Clone,
    S: Storage,
    C: ConfigProvider,
{
    async fn extract(&self) -> Result<Vec<TrendingRepository>> {
        let mut repos = self
            .source
            .fetch(self.config.since(), self.config.code_language())
            .await?;
        repos.truncate(self.config.limit().max(1));
        Ok(repos)
    }

    async fn transform(&self, repos: Vec<TrendingRepository>) -> Result<DraftBatch> {
        if self.config.list_only() || repos.is_empty() {
            return Ok(DraftBatch {
                candidates: repos,
                outcomes: Vec::new(),
            });
        }

        let pick = self.config.pick().clamp(1, repos.len());
        let selected = RepositorySelector::new(&self.generator)
            .select_top(&repos, pick)
            .await?;
        if selected.is_empty() {
            return Err(ItweetError::NothingSelected);
        }
        tracing::info!("🤖 AI selected {} of {} repositories", selected.len(), repos.len());

        let style = self.config.style();
        let concurrency = self.config.concurrent_requests().max(1);
        // buffered 保留輸入順序，輸出仍是 AI 挑選的順序
        let outcomes: Vec<RepoOutcome> = stream::iter(selected)
            .map(|sel| self.process_repository(sel, &repos, &style))
            .buffered(concurrency)
            .collect()
            .await;

        Ok(DraftBatch {
            candidates: repos,
            outcomes,
        })
    }

    async fn load(&self, batch: &DraftBatch) -> Result<Vec<String>> {
        if self.config.list_only() || self.config.no_tweets() || batch.outcomes.is_empty() {
            return Ok(Vec::new());
        }

        let drafts = batch.drafts();
        let mut paths = Vec::new();
        if let Some(file) = self.config.output_file() {
            paths.push(self.writer.write_text(&drafts, Some(file)).await?);
        }
        if self.config.json_output() {
            paths.push(self.writer.write_json(&drafts, None).await?);
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::domain::model::{HttpResponse, Since};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const PAGE: &str = r#"
<article class="Box-row"><h2><a href="/octo/alpha">octo / alpha</a></h2>
  <p class="col-9 color-fg-muted">Alpha tool</p></article>
<article class="Box-row"><h2><a href="/octo/beta">octo / beta</a></h2></article>
<article class="Box-row"><h2><a href="/octo/gamma">octo / gamma</a></h2></article>
"#;

    #[derive(Default)]
    struct FakeTransport {
        routes: HashMap<String, HttpResponse>,
    }

    impl FakeTransport {
        fn route(mut self, url: &str, status: u16, body: &str) -> Self {
            self.routes.insert(
                url.to_string(),
                HttpResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn get(&self, url: &str, _accept: Option<&str>) -> Result<HttpResponse> {
            Ok(self.routes.get(url).cloned().unwrap_or(HttpResponse {
                status: 404,
                body: String::new(),
            }))
        }
    }

    /// 第一次呼叫是挑選，其後依 prompt 裡的 repo 名稱回覆
    struct FakeGenerator {
        selection: String,
        fail_for: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.starts_with("You are selecting") {
                return Ok(self.selection.clone());
            }
            let name = prompt
                .lines()
                .find_map(|line| line.strip_prefix("- Name: "))
                .unwrap_or("?")
                .to_string();
            if self.fail_for.as_deref() == Some(name.as_str()) {
                return Err(ItweetError::RemoteRejection {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(format!("Tweet about {}", name))
        }
    }

    struct TestConfig {
        list_only: bool,
        no_tweets: bool,
        limit: usize,
        output_file: Option<String>,
        json_output: bool,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                list_only: false,
                no_tweets: false,
                limit: 25,
                output_file: None,
                json_output: false,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn since(&self) -> Since {
            Since::Daily
        }
        fn code_language(&self) -> Option<&str> {
            None
        }
        fn limit(&self) -> usize {
            self.limit
        }
        fn pick(&self) -> usize {
            2
        }
        fn readme_chars(&self) -> usize {
            0
        }
        fn style(&self) -> TweetStyle {
            TweetStyle::default()
        }
        fn list_only(&self) -> bool {
            self.list_only
        }
        fn no_tweets(&self) -> bool {
            self.no_tweets
        }
        fn output_file(&self) -> Option<&str> {
            self.output_file.as_deref()
        }
        fn json_output(&self) -> bool {
            self.json_output
        }
        fn concurrent_requests(&self) -> usize {
            2
        }
    }

    fn endpoints() -> Endpoints {
        Endpoints {
            trending_url: "http://fake/trending".to_string(),
            github_api_url: "http://fake/api".to_string(),
            raw_content_url: "http://fake/raw".to_string(),
        }
    }

    fn transport() -> Arc<FakeTransport> {
        Arc::new(
            FakeTransport::default()
                .route("http://fake/trending?since=daily", 200, PAGE)
                .route("http://fake/raw/octo/gamma/main/README.md", 200, "# Gamma\r\nreadme"),
        )
    }

    fn generator(selection: &str, fail_for: Option<&str>) -> FakeGenerator {
        FakeGenerator {
            selection: selection.to_string(),
            fail_for: fail_for.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn storage(temp_dir: &TempDir) -> LocalStorage {
        LocalStorage::new(temp_dir.path().to_string_lossy().into_owned())
    }

    #[tokio::test]
    async fn test_extract_respects_limit() {
        let temp_dir = TempDir::new().unwrap();
        let config = TestConfig {
            limit: 2,
            ..TestConfig::default()
        };
        let pipeline = TrendingPipeline::with_endpoints(
            generator("[]", None),
            transport(),
            storage(&temp_dir),
            config,
            endpoints(),
        );

        let repos = pipeline.extract().await.unwrap();

        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["octo/alpha", "octo/beta"]);
    }

    #[tokio::test]
    async fn test_transform_isolates_per_repository_failures() {
        let temp_dir = TempDir::new().unwrap();
        let gen = generator(
            r#"[{"id":3,"reason":"docs"},{"id":1,"reason":"fast"}]"#,
            Some("octo/alpha"),
        );
        let pipeline = TrendingPipeline::with_endpoints(
            &gen,
            transport(),
            storage(&temp_dir),
            TestConfig::default(),
            endpoints(),
        );

        let repos = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(repos).await.unwrap();

        assert_eq!(batch.outcomes.len(), 2);
        let gamma = &batch.outcomes[0];
        assert_eq!(gamma.selected.name, "octo/gamma");
        assert_eq!(gamma.readme, ReadmeStatus::Fetched("# Gamma\nreadme".to_string()));
        assert_eq!(gamma.draft, DraftStatus::Generated("Tweet about octo/gamma".to_string()));

        let alpha = &batch.outcomes[1];
        assert!(matches!(alpha.readme, ReadmeStatus::Missing(_)));
        assert!(matches!(alpha.draft, DraftStatus::Failed(_)));
        assert_eq!(batch.drafts(), vec!["Tweet about octo/gamma".to_string()]);

        // 沒有 README 時 prompt 仍然產生，README 區塊為空
        let prompts = gen.prompts.lock().unwrap();
        let alpha_prompt = prompts.iter().find(|p| p.contains("- Name: octo/alpha")).unwrap();
        assert!(alpha_prompt.ends_with("README (truncated):\n\n"));
    }

    #[tokio::test]
    async fn test_nothing_selected_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = TrendingPipeline::with_endpoints(
            generator(r#"[{"id":42}]"#, None),
            transport(),
            storage(&temp_dir),
            TestConfig::default(),
            endpoints(),
        );

        let repos = pipeline.extract().await.unwrap();
        let err = pipeline.transform(repos).await.unwrap_err();

        assert!(matches!(err, ItweetError::NothingSelected));
    }

    #[tokio::test]
    async fn test_list_only_skips_ai() {
        let temp_dir = TempDir::new().unwrap();
        let gen = generator("[]", None);
        let config = TestConfig {
            list_only: true,
            ..TestConfig::default()
        };
        let pipeline =
            TrendingPipeline::with_endpoints(&gen, transport(), storage(&temp_dir), config, endpoints());

        let repos = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(repos).await.unwrap();
        let paths = pipeline.load(&batch).await.unwrap();

        assert_eq!(batch.candidates.len(), 3);
        assert!(batch.outcomes.is_empty());
        assert!(paths.is_empty());
        assert!(gen.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_tweets_fetches_readmes_only() {
        let temp_dir = TempDir::new().unwrap();
        let gen = generator(r#"[{"id":3}]"#, None);
        let config = TestConfig {
            no_tweets: true,
            ..TestConfig::default()
        };
        let pipeline =
            TrendingPipeline::with_endpoints(&gen, transport(), storage(&temp_dir), config, endpoints());

        let repos = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(repos).await.unwrap();

        assert_eq!(batch.outcomes[0].draft, DraftStatus::Skipped);
        assert_eq!(batch.outcomes[0].selected.reason, "-");
        assert!(matches!(batch.outcomes[0].readme, ReadmeStatus::Fetched(_)));
        assert_eq!(gen.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_requested_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let config = TestConfig {
            output_file: Some("drafts.txt".to_string()),
            json_output: true,
            ..TestConfig::default()
        };
        let pipeline = TrendingPipeline::with_endpoints(
            generator(r#"[{"id":2,"reason":"new"}]"#, None),
            transport(),
            storage(&temp_dir),
            config,
            endpoints(),
        );

        let repos = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(repos).await.unwrap();
        let paths = pipeline.load(&batch).await.unwrap();

        assert_eq!(paths.len(), 2);
        let text = std::fs::read_to_string(temp_dir.path().join("drafts.txt")).unwrap();
        assert_eq!(text, "Tweet about octo/beta\n");
        assert!(paths[1].ends_with(".json"));
    }
}
