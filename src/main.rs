use clap::Parser;
use itweet::config::toml_config::CONFIG_FILE_NAME;
use itweet::core::ai_client::DEFAULT_MODEL;
use itweet::core::ConfigProvider;
use itweet::utils::{logger, validation::Validate};
use itweet::{
    CliConfig, Command, CredentialResolver, Engine, LocalConfigStore, LocalStorage,
    OpenRouterClient, ReqwestTransport, TrendingPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting itweet CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let Command::Github(args) = config.command;

    println!("iTweet: GitHub Trending");
    println!("- since: {}", args.since.as_str());
    println!("- code lang: {}", args.code_language().unwrap_or("all"));
    println!("- tweet language: {}", args.tweet_language());

    let store = LocalConfigStore::default_location().unwrap_or_else(|e| {
        tracing::warn!("⚠️ {}; using ./{}", e, CONFIG_FILE_NAME);
        LocalConfigStore::new(CONFIG_FILE_NAME)
    });
    let saved = store.load();
    let resolver = CredentialResolver::new(store);

    // --list-only 不需要 API key
    let api_key = if args.list_only {
        None
    } else {
        let stdin = std::io::stdin();
        match resolver.resolve_or_prompt(stdin.lock(), std::io::stdout()) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::error!("❌ Credential resolution failed: {}", e);
                eprintln!("❌ Error: No API key provided.");
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        }
    };

    let model = args
        .model
        .clone()
        .or_else(|| saved.model().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    tracing::debug!("🤖 Using model {}", model);

    // 創建各元件與管道
    let generator = OpenRouterClient::new(api_key).with_model(model);
    let storage = LocalStorage::new(args.output_dir.clone());
    let pipeline = TrendingPipeline::new(generator, ReqwestTransport::new(), storage, args);

    let engine = Engine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Done: {} selected, {} drafts, {} files written",
                summary.batch.outcomes.len(),
                summary.batch.drafts().len(),
                summary.written.len()
            );
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ itweet failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("\nError: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
