#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, GithubArgs};
pub use credentials::CredentialResolver;
pub use toml_config::{LocalConfig, LocalConfigStore};

pub const DEFAULT_TWEET_LANGUAGE: &str = "English";

const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("en", "English"),
    ("english", "English"),
    ("id", "Indonesian"),
    ("indo", "Indonesian"),
    ("indonesia", "Indonesian"),
    ("indonesian", "Indonesian"),
    ("bahasa indonesia", "Indonesian"),
    ("ms", "Malay"),
    ("malay", "Malay"),
    ("melayu", "Malay"),
    ("malaysia", "Malay"),
    ("malasyia", "Malay"),
    ("es", "Spanish"),
    ("spanish", "Spanish"),
    ("fr", "French"),
    ("french", "French"),
    ("de", "German"),
    ("german", "German"),
    ("ja", "Japanese"),
    ("jp", "Japanese"),
    ("japanese", "Japanese"),
    ("ko", "Korean"),
    ("korean", "Korean"),
    ("zh", "Chinese"),
    ("chinese", "Chinese"),
    ("pt", "Portuguese"),
    ("portuguese", "Portuguese"),
];

/// 語言代碼或別名轉成完整語言名稱；未知的值原樣保留（去掉空白）
pub fn normalize_tweet_language(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_TWEET_LANGUAGE.to_string();
    }

    let key = trimmed.to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, language)| language.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
