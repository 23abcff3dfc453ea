use crate::utils::error::{ItweetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".itweet_config.toml";

/// 存在使用者家目錄的設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl LocalConfig {
    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ItweetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ItweetError::ConfigError {
            message: format!("TOML serialization error: {}", e),
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LocalConfigStore {
    path: PathBuf,
}

impl LocalConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `~/.itweet_config.toml`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| ItweetError::ConfigError {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 檔案不存在或內容無效時視為空設定
    pub fn load(&self) -> LocalConfig {
        if !self.path.exists() {
            return LocalConfig::default();
        }

        let loaded = std::fs::read_to_string(&self.path)
            .map_err(ItweetError::IoError)
            .and_then(|content| LocalConfig::from_toml_str(&content));

        match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {}: {}", self.path.display(), e);
                LocalConfig::default()
            }
        }
    }

    pub fn save(&self, config: &LocalConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }

    /// 保留其他欄位，只更新 API key
    pub fn save_api_key(&self, api_key: &str) -> Result<()> {
        let mut config = self.load();
        config.api_key = Some(api_key.to_string());
        self.save(&config)
    }
}
