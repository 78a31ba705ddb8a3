mod http;
mod mock;
pub mod prompts;

pub use http::{HttpRewriter, HttpRewriterConfig};
pub use mock::{GatedRewriter, MockRewriter};

use async_trait::async_trait;

use crate::domain::types::Style;

/// リライトエラー
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Rewrite failed: {0}")]
    Failed(String),
    #[error("Rewrite timeout")]
    Timeout,
}

/// テキスト生成コラボレーター trait。
/// 本番は HTTP クライアント、テストは決定的なモックを注入する
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str, style: Style) -> Result<String, RewriteError>;

    fn name(&self) -> &str;
}
