use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{RewriteError, Rewriter};
use crate::domain::types::Style;

/// MockRewriter: ネットワークを使わない決定的なリライター。
/// バックエンド未設定時のフォールバック兼テスト用
pub struct MockRewriter;

/// スタイル別の決定的変換
pub fn transform(text: &str, style: Style) -> String {
    match style {
        Style::Professional => format!("Rephrased: {text}"),
        Style::Casual => format!("So basically, {text}"),
        Style::Formal => format!("It is hereby stated that {text}"),
        Style::Creative => format!("Imagine this: {text} ✨"),
        Style::Funny => format!("Funny version: {text} 😄"),
        Style::Concise => format!("In short: {text}"),
        Style::Detailed => format!("To elaborate: {text}, considered in full detail"),
        Style::Persuasive => format!("You will surely agree: {text}"),
    }
}

#[async_trait]
impl Rewriter for MockRewriter {
    async fn rewrite(&self, text: &str, style: Style) -> Result<String, RewriteError> {
        Ok(transform(text, style))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// 応答を permit で制御するリライター。
/// open(n) が呼ばれるまで rewrite は完了しない。並行ガードのテスト用
pub struct GatedRewriter {
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedRewriter {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// n 件の rewrite を完了させる
    pub fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// rewrite が呼ばれた回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for GatedRewriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rewriter for GatedRewriter {
    async fn rewrite(&self, text: &str, style: Style) -> Result<String, RewriteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| RewriteError::Failed("gate closed".to_string()))?;
        permit.forget();
        Ok(transform(text, style))
    }

    fn name(&self) -> &str {
        "gated"
    }
}
