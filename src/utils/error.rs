use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItweetError {
    #[error("Invalid repository reference: {url}")]
    InvalidReference { url: String },

    #[error("AI selection reply was not usable: {message}")]
    InvalidSelectionFormat { message: String },

    #[error("No API key found. Set OPENROUTER_API_KEY or enter a key when prompted")]
    MissingCredential,

    #[error("Network error: {message}")]
    TransportFailure { message: String },

    #[error("Remote service rejected the request (HTTP {status}): {body}")]
    RemoteRejection { status: u16, body: String },

    #[error("Unexpected response format: {message}")]
    MalformedResponse { message: String },

    #[error("Extraction failed: {message}")]
    ExtractionError { message: String },

    #[error("README not found for {repo}")]
    ReadmeNotFound { repo: String },

    #[error("AI did not select any repositories")]
    NothingSelected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for ItweetError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        ItweetError::TransportFailure { message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Credential,
    Network,
    Layout,
    Content,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ItweetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ItweetError::InvalidReference { .. } | ItweetError::InvalidSelectionFormat { .. } => {
                ErrorCategory::Input
            }
            ItweetError::MissingCredential => ErrorCategory::Credential,
            ItweetError::TransportFailure { .. }
            | ItweetError::RemoteRejection { .. }
            | ItweetError::MalformedResponse { .. } => ErrorCategory::Network,
            ItweetError::ExtractionError { .. } => ErrorCategory::Layout,
            ItweetError::ReadmeNotFound { .. } | ItweetError::NothingSelected => {
                ErrorCategory::Content
            }
            ItweetError::ConfigError { .. } | ItweetError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            ItweetError::IoError(_) | ItweetError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ItweetError::ReadmeNotFound { .. } => ErrorSeverity::Low,
            ItweetError::TransportFailure { .. }
            | ItweetError::RemoteRejection { .. }
            | ItweetError::MalformedResponse { .. } => ErrorSeverity::Medium,
            ItweetError::InvalidReference { .. }
            | ItweetError::InvalidSelectionFormat { .. }
            | ItweetError::NothingSelected
            | ItweetError::MissingCredential
            | ItweetError::ConfigError { .. }
            | ItweetError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ItweetError::ExtractionError { .. }
            | ItweetError::IoError(_)
            | ItweetError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// 只影響單一 repository 的錯誤，不應中止整個流程
    pub fn is_per_repository(&self) -> bool {
        matches!(
            self,
            ItweetError::InvalidReference { .. } | ItweetError::ReadmeNotFound { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ItweetError::InvalidReference { .. } => "Use a https://github.com/<owner>/<repo> URL",
            ItweetError::InvalidSelectionFormat { .. } => {
                "Run again; the model sometimes replies with prose instead of JSON"
            }
            ItweetError::MissingCredential => {
                "Get a key at https://openrouter.ai/keys and export OPENROUTER_API_KEY"
            }
            ItweetError::TransportFailure { .. } => "Check your network connection and try again",
            ItweetError::RemoteRejection { status, .. } if *status == 401 || *status == 403 => {
                "Check that your API key is valid"
            }
            ItweetError::RemoteRejection { .. } => "The remote service refused the request; try again later",
            ItweetError::MalformedResponse { .. } => "Try another model with --model",
            ItweetError::ExtractionError { .. } => {
                "The GitHub Trending layout may have changed; check for an update"
            }
            ItweetError::ReadmeNotFound { .. } => "Drafts will be generated without README context",
            ItweetError::NothingSelected => "Run again or raise --limit",
            ItweetError::ConfigError { .. } | ItweetError::InvalidConfigValueError { .. } => {
                "Check the command line options and ~/.itweet_config.toml"
            }
            ItweetError::IoError(_) => "Check file permissions and available disk space",
            ItweetError::SerializationError(_) => "This is likely a bug; please report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ItweetError::MissingCredential => "iTweet requires an OpenRouter API key.".to_string(),
            ItweetError::ExtractionError { .. } => {
                "No repositories found. GitHub layout may have changed.".to_string()
            }
            ItweetError::InvalidSelectionFormat { .. } | ItweetError::NothingSelected => {
                format!("Failed to select repos via AI: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ItweetError>;
