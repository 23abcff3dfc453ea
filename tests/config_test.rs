use anyhow::Result;
use clap::Parser;
use itweet::config::normalize_tweet_language;
use itweet::core::ConfigProvider;
use itweet::utils::validation::Validate;
use itweet::{CliConfig, Command, CredentialResolver, ItweetError, LocalConfigStore};
use std::io::Cursor;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_prompted_key_is_reused_on_next_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join(".itweet_config.toml");

    // first run: nothing configured, key typed at the prompt
    let first = CredentialResolver::with_env_lookup(LocalConfigStore::new(&config_path), no_env);
    assert_eq!(first.resolve(), None);
    let mut shown = Vec::new();
    let key = first.resolve_or_prompt(Cursor::new("sk-or-typed\n"), &mut shown)?;
    assert_eq!(key, "sk-or-typed");

    // second run: read back from the saved file without prompting
    let second = CredentialResolver::with_env_lookup(LocalConfigStore::new(&config_path), no_env);
    let key = second.resolve_or_prompt(Cursor::new(""), Vec::new())?;
    assert_eq!(key, "sk-or-typed");

    let saved = std::fs::read_to_string(&config_path)?;
    assert!(saved.contains("api_key = \"sk-or-typed\""));
    Ok(())
}

#[test]
fn test_env_key_is_not_persisted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join(".itweet_config.toml");
    let resolver = CredentialResolver::with_env_lookup(LocalConfigStore::new(&config_path), |name| {
        (name == "ITWEET_API_KEY").then(|| "sk-env".to_string())
    });

    assert_eq!(resolver.resolve_or_prompt(Cursor::new(""), Vec::new())?, "sk-env");
    assert!(!config_path.exists());
    Ok(())
}

#[test]
fn test_blank_prompt_input_is_missing_credential() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let resolver = CredentialResolver::with_env_lookup(
        LocalConfigStore::new(temp_dir.path().join("config.toml")),
        no_env,
    );

    let err = resolver
        .resolve_or_prompt(Cursor::new("   \n"), Vec::new())
        .unwrap_err();
    assert!(matches!(err, ItweetError::MissingCredential));
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[test]
fn test_cli_args_drive_tweet_style() -> Result<()> {
    let config = CliConfig::try_parse_from([
        "itweet", "github", "--lang", "Bahasa Indonesia", "--tone", "excited", "--readme-chars", "0",
    ])?;
    config.validate()?;

    let Command::Github(args) = config.command;
    let style = args.style();
    assert_eq!(style.output_language, normalize_tweet_language("id"));
    assert_eq!(style.tone, "excited");
    assert_eq!(args.readme_chars(), 0);
    Ok(())
}
