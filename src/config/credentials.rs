//! API key 來源：環境變數 -> 本機設定檔 -> 互動輸入
//!
//! 每次執行只建立一個 `CredentialResolver`，解析出的 key 再明確傳給需要的元件。

use crate::config::toml_config::LocalConfigStore;
use crate::utils::error::{ItweetError, Result};
use std::io::{BufRead, Write};

pub const API_KEY_ENV_VARS: [&str; 3] = ["OPENROUTER_API_KEY", "ITWEET_API_KEY", "AI_API_KEY"];
pub const KEYS_URL: &str = "https://openrouter.ai/keys";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct CredentialResolver {
    store: LocalConfigStore,
    env: EnvLookup,
}

impl CredentialResolver {
    pub fn new(store: LocalConfigStore) -> Self {
        Self::with_env_lookup(store, |name| std::env::var(name).ok())
    }

    pub fn with_env_lookup<F>(store: LocalConfigStore, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            store,
            env: Box::new(env),
        }
    }

    pub fn store(&self) -> &LocalConfigStore {
        &self.store
    }

    /// 不互動的解析：環境變數優先，其次是設定檔
    pub fn resolve(&self) -> Option<String> {
        let from_env = API_KEY_ENV_VARS.iter().find_map(|name| {
            (self.env)(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .inspect(|_| tracing::debug!("🔑 Using API key from ${}", name))
        });

        from_env.or_else(|| {
            self.store.load().api_key().map(|key| {
                tracing::debug!("🔑 Using API key from {}", self.store.path().display());
                key.to_string()
            })
        })
    }

    /// 從輸入讀取 key 並存到設定檔；空白或 EOF 回傳 `MissingCredential`
    pub fn prompt<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<String> {
        writeln!(output, "\n🔑 iTweet requires an OpenRouter API key.")?;
        writeln!(output, "Get your key at: {}", KEYS_URL)?;
        write!(output, "\nPlease enter your OpenRouter API key: ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let key = line.trim().to_string();
        if key.is_empty() {
            return Err(ItweetError::MissingCredential);
        }

        match self.store.save_api_key(&key) {
            Ok(()) => writeln!(output, "✓ API Key saved locally to {}", self.store.path().display())?,
            Err(e) => writeln!(output, "⚠️ Warning: Failed to save config: {}", e)?,
        }
        Ok(key)
    }

    pub fn resolve_or_prompt<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<String> {
        match self.resolve() {
            Some(key) => Ok(key),
            None => self.prompt(input, output),
        }
    }
}
