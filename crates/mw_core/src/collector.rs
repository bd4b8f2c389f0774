use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait Collector: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Gathers raw articles from this source. An unreachable source yields
    /// an error; callers log it and continue with the other collectors.
    async fn collect(&self) -> Result<Vec<Article>>;
}
