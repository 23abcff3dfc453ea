use crate::config::normalize_tweet_language;
use crate::core::output::DEFAULT_OUTPUT_DIR;
use crate::core::ConfigProvider;
use crate::domain::model::{Since, TweetStyle};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "itweet")]
#[command(about = "Turn trending GitHub repositories into tweet drafts")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch GitHub Trending, let AI pick top repos, fetch READMEs and draft tweets
    Github(GithubArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GithubArgs {
    #[arg(long, value_enum, ignore_case = true, default_value_t = Since::Daily, help = "Trending time range")]
    pub since: Since,

    #[arg(long = "lang", default_value = "English", help = "Output language for generated tweets")]
    pub tweet_language: String,

    #[arg(long = "code-lang", help = "Filter by programming language (optional)")]
    pub code_language: Option<String>,

    #[arg(long, default_value_t = 25, help = "How many trending repos to consider")]
    pub limit: usize,

    #[arg(long, default_value_t = 4, help = "How many repos the AI should pick")]
    pub pick: usize,

    #[arg(
        long,
        default_value_t = 6000,
        allow_negative_numbers = true,
        help = "Max README characters to fetch per repo (0 = unlimited)"
    )]
    pub readme_chars: i64,

    #[arg(long, help = "Only list trending repos (skip AI selection and README fetching)")]
    pub list_only: bool,

    #[arg(long, help = "Skip tweet generation (only list + AI pick)")]
    pub no_tweets: bool,

    #[arg(long, help = "Generate a short thread (2-3 tweets) per repo instead of a single tweet")]
    pub thread: bool,

    #[arg(long, default_value = "informative", help = "Tone for tweets (e.g. informative, casual, excited)")]
    pub tone: String,

    #[arg(long, default_value_t = 280, help = "Max characters per tweet")]
    pub max_chars: usize,

    #[arg(long, help = "Write tweets to a text file inside the output directory")]
    pub output: Option<String>,

    #[arg(long = "json", help = "Also save tweets as JSON")]
    pub json_output: bool,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, help = "Directory for saved tweet files")]
    pub output_dir: String,

    #[arg(long, help = "OpenRouter model id (overrides the saved config)")]
    pub model: Option<String>,

    #[arg(long, default_value_t = 4, help = "Repositories processed concurrently")]
    pub concurrent_requests: usize,
}

impl GithubArgs {
    /// `--lang` 經過別名表之後的語言
    pub fn tweet_language(&self) -> String {
        normalize_tweet_language(&self.tweet_language)
    }
}

impl ConfigProvider for GithubArgs {
    fn since(&self) -> Since {
        self.since
    }

    fn code_language(&self) -> Option<&str> {
        self.code_language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn pick(&self) -> usize {
        self.pick
    }

    fn readme_chars(&self) -> usize {
        // 負數視為不截斷
        usize::try_from(self.readme_chars).unwrap_or(0)
    }

    fn style(&self) -> TweetStyle {
        TweetStyle {
            output_language: self.tweet_language(),
            tone: self.tone.trim().to_string(),
            max_chars: self.max_chars,
            thread: self.thread,
        }
    }

    fn list_only(&self) -> bool {
        self.list_only
    }

    fn no_tweets(&self) -> bool {
        self.no_tweets
    }

    fn output_file(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn json_output(&self) -> bool {
        self.json_output
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for GithubArgs {
    fn validate(&self) -> Result<()> {
        validate_positive_number("limit", self.limit, 1)?;
        validate_positive_number("pick", self.pick, 1)?;
        validate_range("max_chars", self.max_chars, 1, 25_000)?;
        validate_range("concurrent_requests", self.concurrent_requests, 1, 32)?;
        validate_non_empty_string("tone", &self.tone)?;
        validate_path("output_dir", &self.output_dir)?;

        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        if let Some(model) = &self.model {
            validate_non_empty_string("model", model)?;
        }
        Ok(())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Github(args) => args.validate(),
        }
    }
}
