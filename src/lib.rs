pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, ReqwestTransport};
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, GithubArgs};
pub use config::{CredentialResolver, LocalConfigStore};

pub use core::{
    ai_client::OpenRouterClient,
    engine::{Engine, RunSummary},
    pipeline::{Endpoints, TrendingPipeline},
};
pub use utils::error::{ItweetError, Result};
