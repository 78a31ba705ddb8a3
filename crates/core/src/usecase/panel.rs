use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::error::AppError;
use crate::domain::types::{RewriteRequest, Style};
use crate::domain::view::{CharCountLevel, CharCounter};
use crate::infra::output::OutputTarget;
use crate::infra::relay::RelayHandle;

/// パネルの表示状態スナップショット
#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub input: String,
    pub style: Style,
    /// "Using: Funny style" の形のピッカー表示ヒント
    pub style_hint: String,
    pub result: Option<String>,
    pub char_count: usize,
    pub char_level: CharCountLevel,
    pub pending: bool,
}

struct PanelState {
    input: String,
    style: Style,
    result: Option<String>,
    pending: bool,
}

/// Surface UI: ページ選択に依存しない独立パネル。
/// テキストを直接入力してリライトを起動する。文書置換ロジックには
/// 一切触れない
pub struct Panel {
    state: Mutex<PanelState>,
    relay: RelayHandle,
    output: Arc<dyn OutputTarget>,
    counter: CharCounter,
}

impl Panel {
    pub fn new(relay: RelayHandle, output: Arc<dyn OutputTarget>) -> Self {
        Self {
            state: Mutex::new(PanelState {
                input: String::new(),
                style: Style::default(),
                result: None,
                pending: false,
            }),
            relay,
            output,
            counter: CharCounter::default(),
        }
    }

    pub fn set_input(&self, text: &str) -> PanelView {
        let mut state = self.state.lock().unwrap();
        state.input = text.to_string();
        self.view_of(&state)
    }

    pub fn set_style(&self, style: Style) {
        self.state.lock().unwrap().style = style;
    }

    /// リライト実行。入力は trim され、空なら何もしない。
    /// バックエンド失敗は結果領域に "Error: ..." として表示する
    pub async fn rephrase(&self) -> Result<PanelView, AppError> {
        let (text, style) = {
            let mut state = self.state.lock().unwrap();
            if state.pending {
                return Err(AppError::busy("a rewrite request is already in flight"));
            }
            let text = state.input.trim().to_string();
            if text.is_empty() {
                return Ok(self.view_of(&state));
            }
            state.pending = true;
            (text, state.style)
        };

        let result = self
            .relay
            .call_api(RewriteRequest {
                source_text: text,
                style,
            })
            .await;

        let mut state = self.state.lock().unwrap();
        state.pending = false;
        match result {
            Ok(text) => state.result = Some(text),
            Err(e) => state.result = Some(format!("Error: {}", e.message)),
        }
        Ok(self.view_of(&state))
    }

    /// 再生成。現在の入力とスタイルでリライトし直す
    pub async fn regenerate(&self) -> Result<PanelView, AppError> {
        self.rephrase().await
    }

    /// 結果をクリップボードへ
    pub fn copy_result(&self) -> Result<(), AppError> {
        let text = {
            let state = self.state.lock().unwrap();
            state
                .result
                .clone()
                .ok_or_else(|| AppError::internal("no result to copy"))?
        };
        self.output.deliver(&text)
    }

    pub fn view(&self) -> PanelView {
        let state = self.state.lock().unwrap();
        self.view_of(&state)
    }

    fn view_of(&self, state: &PanelState) -> PanelView {
        let char_count = state.input.chars().count();
        PanelView {
            input: state.input.clone(),
            style: state.style,
            style_hint: format!("Using: {} style", state.style.label()),
            result: state.result.clone(),
            char_count,
            char_level: self.counter.level(char_count),
            pending: state.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::infra::output::MemoryOutput;
    use crate::infra::relay::spawn_relay;
    use crate::infra::rewriter::{GatedRewriter, MockRewriter, RewriteError, Rewriter};
    use crate::usecase::coordinator::Coordinator;

    struct FailingRewriter;

    #[async_trait::async_trait]
    impl Rewriter for FailingRewriter {
        async fn rewrite(&self, _text: &str, _style: Style) -> Result<String, RewriteError> {
            Err(RewriteError::Failed("service down".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Harness {
        output: Arc<MemoryOutput>,
        panel: Arc<Panel>,
    }

    fn harness_with(rewriter: Arc<dyn Rewriter>) -> Harness {
        let coordinator = Arc::new(Coordinator::new(rewriter));
        let relay = spawn_relay(coordinator);
        let output = Arc::new(MemoryOutput::new());
        let panel = Arc::new(Panel::new(
            relay,
            Arc::clone(&output) as Arc<dyn OutputTarget>,
        ));
        Harness { output, panel }
    }

    #[tokio::test]
    async fn test_rephrase_with_picked_style() {
        let h = harness_with(Arc::new(MockRewriter));
        h.panel.set_input("hello world");
        h.panel.set_style(Style::Casual);

        let view = h.panel.rephrase().await.unwrap();
        assert_eq!(view.result.as_deref(), Some("So basically, hello world"));
        assert_eq!(view.style_hint, "Using: Casual style");
        assert!(!view.pending);
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_sending() {
        let h = harness_with(Arc::new(MockRewriter));
        h.panel.set_input("  hello  ");

        let view = h.panel.rephrase().await.unwrap();
        assert_eq!(view.result.as_deref(), Some("Rephrased: hello"));
    }

    #[tokio::test]
    async fn test_empty_input_is_a_no_op() {
        let h = harness_with(Arc::new(MockRewriter));
        h.panel.set_input("   ");

        let view = h.panel.rephrase().await.unwrap();
        assert!(view.result.is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_is_shown_inline() {
        let h = harness_with(Arc::new(FailingRewriter));
        h.panel.set_input("hello");

        let view = h.panel.rephrase().await.unwrap();
        let result = view.result.unwrap();
        assert!(result.starts_with("Error: "));
        assert!(result.contains("service down"));
    }

    #[tokio::test]
    async fn test_char_count_tiers_on_input() {
        let h = harness_with(Arc::new(MockRewriter));
        assert_eq!(h.panel.set_input(&"a".repeat(10)).char_level, CharCountLevel::Normal);
        assert_eq!(h.panel.set_input(&"a".repeat(501)).char_level, CharCountLevel::Warning);
        assert_eq!(h.panel.set_input(&"a".repeat(1001)).char_level, CharCountLevel::Alert);
    }

    #[tokio::test]
    async fn test_second_click_is_rejected_while_pending() {
        let rewriter = Arc::new(GatedRewriter::new());
        let h = harness_with(Arc::clone(&rewriter) as Arc<dyn Rewriter>);
        h.panel.set_input("hello");

        let panel = Arc::clone(&h.panel);
        let first = tokio::spawn(async move { panel.rephrase().await });

        while rewriter.calls() < 1 {
            tokio::task::yield_now().await;
        }

        let err = h.panel.rephrase().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);

        rewriter.open(1);
        first.await.unwrap().unwrap();
        assert_eq!(rewriter.calls(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_result() {
        let h = harness_with(Arc::new(MockRewriter));
        h.panel.set_input("hello");
        h.panel.rephrase().await.unwrap();
        h.panel.set_style(Style::Funny);

        let view = h.panel.regenerate().await.unwrap();
        assert_eq!(view.result.as_deref(), Some("Funny version: hello 😄"));
    }

    #[tokio::test]
    async fn test_copy_result() {
        let h = harness_with(Arc::new(MockRewriter));
        h.panel.set_input("hello");
        h.panel.rephrase().await.unwrap();

        h.panel.copy_result().unwrap();
        assert_eq!(h.output.last().as_deref(), Some("Rephrased: hello"));
    }

    #[tokio::test]
    async fn test_copy_without_result_fails() {
        let h = harness_with(Arc::new(MockRewriter));
        assert!(h.panel.copy_result().is_err());
    }
}
