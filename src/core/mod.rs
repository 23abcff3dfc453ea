pub mod ai_client;
pub mod engine;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod readme;
pub mod selector;
pub mod trending;

pub use crate::domain::model::{
    DraftBatch, RepoRef, SelectedRepository, TrendingRepository, TweetRequest,
};
pub use crate::domain::ports::{ConfigProvider, HttpTransport, Pipeline, Storage, TextGenerator};
pub use crate::utils::error::Result;
