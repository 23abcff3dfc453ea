use crate::domain::model::{DraftBatch, HttpResponse, Since, TrendingRepository, TweetStyle};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 一次執行的參數，由 CLI 或測試提供
pub trait ConfigProvider: Send + Sync {
    fn since(&self) -> Since;
    fn code_language(&self) -> Option<&str>;
    fn limit(&self) -> usize;
    fn pick(&self) -> usize;
    fn readme_chars(&self) -> usize;
    fn style(&self) -> TweetStyle;
    fn list_only(&self) -> bool;
    fn no_tweets(&self) -> bool;
    fn output_file(&self) -> Option<&str>;
    fn json_output(&self) -> bool;
    fn concurrent_requests(&self) -> usize;
}

/// 文字生成服務：送出 prompt，取回生成的文字
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// GET 傳輸層。非 2xx 不算錯誤，只有網路層失敗才回 `TransportFailure`
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse> {
        (**self).get(url, accept).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse> {
        (**self).get(url, accept).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<TrendingRepository>>;
    async fn transform(&self, repos: Vec<TrendingRepository>) -> Result<DraftBatch>;
    async fn load(&self, batch: &DraftBatch) -> Result<Vec<String>>;
}
