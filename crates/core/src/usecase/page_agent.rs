use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::document::PageDocument;
use crate::domain::error::AppError;
use crate::domain::selection::SelectionTracker;
use crate::domain::types::{RewriteRequest, Style};
use crate::domain::view::{CharCountLevel, CharCounter};
use crate::infra::output::OutputTarget;
use crate::infra::relay::RelayHandle;
use crate::usecase::replacer::{self, ReplaceMethod};

/// ページ実体への共有ハンドル。ホスト（クローム側）と Page Agent が
/// 同じ文書を参照する
pub type SharedDocument = Arc<Mutex<Box<dyn PageDocument>>>;

/// オーバーレイの表示状態スナップショット
#[derive(Debug, Clone, Serialize)]
pub struct OverlayView {
    pub original_text: String,
    pub draft: String,
    pub loading: bool,
    pub char_count: usize,
    pub char_level: CharCountLevel,
}

struct OverlayState {
    original_text: String,
    draft: String,
    loading: bool,
}

/// Page Agent: 訪問中のページに常駐するコンポーネント。
/// 選択トラッキング、オーバーレイ状態、ページ内置換を所有する。
/// Surface UI の経路はここを通らない
pub struct PageAgent {
    document: SharedDocument,
    tracker: Mutex<SelectionTracker>,
    overlay: Mutex<Option<OverlayState>>,
    // 未完了のリライトはサーフェスごとに 1 つまで
    pending: Mutex<bool>,
    style: Mutex<Style>,
    relay: RelayHandle,
    output: Arc<dyn OutputTarget>,
    counter: CharCounter,
}

impl PageAgent {
    pub fn new(document: SharedDocument, relay: RelayHandle, output: Arc<dyn OutputTarget>) -> Self {
        Self {
            document,
            tracker: Mutex::new(SelectionTracker::new()),
            overlay: Mutex::new(None),
            pending: Mutex::new(false),
            style: Mutex::new(Style::default()),
            relay,
            output,
            counter: CharCounter::default(),
        }
    }

    // ==================== Selection ====================

    /// ポインタ/キー解放フック。ライブ選択を観測して記録を更新する
    pub fn on_selection_event(&self) {
        let live = self.document.lock().unwrap().live_selection();
        let now = chrono::Utc::now().to_rfc3339();
        self.tracker.lock().unwrap().observe(live.as_ref(), now);
    }

    pub fn has_selection(&self) -> bool {
        self.tracker.lock().unwrap().has_selection()
    }

    pub fn selection_text(&self) -> Option<String> {
        self.tracker
            .lock()
            .unwrap()
            .current()
            .map(|r| r.text.clone())
    }

    // ==================== Style ====================

    /// オーバーレイにピッカーが無ければデフォルト（professional）のまま
    pub fn set_style(&self, style: Style) {
        *self.style.lock().unwrap() = style;
    }

    pub fn style(&self) -> Style {
        *self.style.lock().unwrap()
    }

    // ==================== Overlay flow ====================

    /// rephraseText トリガーの処理。
    /// ローディング状態のオーバーレイを出し、リライト完了後に結果
    /// （失敗時は "Error: ..." をそのまま結果領域に）を表示する
    pub async fn handle_rephrase(&self, selected_text: &str) -> Result<OverlayView, AppError> {
        self.begin_request()?;

        {
            let mut overlay = self.overlay.lock().unwrap();
            *overlay = Some(OverlayState {
                original_text: selected_text.to_string(),
                draft: String::new(),
                loading: true,
            });
        }

        let request = RewriteRequest {
            source_text: selected_text.to_string(),
            style: self.style(),
        };
        let result = self.relay.call_api(request).await;
        self.end_request();

        let mut overlay = self.overlay.lock().unwrap();
        let state = overlay
            .as_mut()
            .ok_or_else(|| AppError::internal("overlay dismissed during rewrite"))?;
        state.loading = false;
        match result {
            Ok(text) => state.draft = text,
            Err(e) => state.draft = format!("Error: {}", e.message),
        }
        Ok(Self::view_of(state, &self.counter))
    }

    /// 編集フィールドの更新
    pub fn edit_draft(&self, text: &str) -> Result<OverlayView, AppError> {
        let mut overlay = self.overlay.lock().unwrap();
        let state = overlay
            .as_mut()
            .ok_or_else(|| AppError::internal("no overlay to edit"))?;
        state.draft = text.to_string();
        Ok(Self::view_of(state, &self.counter))
    }

    /// 再生成: 同じ原文・同じスタイルでリライトし直す。
    /// 失敗時は編集中のドラフトに触れない
    pub async fn regenerate(&self) -> Result<OverlayView, AppError> {
        self.begin_request()?;

        let source = {
            let overlay = self.overlay.lock().unwrap();
            overlay.as_ref().map(|s| s.original_text.clone())
        };
        let Some(source) = source else {
            self.end_request();
            return Err(AppError::internal("no overlay to regenerate"));
        };

        let request = RewriteRequest {
            source_text: source,
            style: self.style(),
        };
        let result = self.relay.call_api(request).await;
        self.end_request();

        let text = result?;
        let mut overlay = self.overlay.lock().unwrap();
        let state = overlay
            .as_mut()
            .ok_or_else(|| AppError::internal("overlay dismissed during rewrite"))?;
        state.draft = text;
        Ok(Self::view_of(state, &self.counter))
    }

    /// 現在の編集値をクリップボードへ
    pub fn copy_draft(&self) -> Result<(), AppError> {
        let text = {
            let overlay = self.overlay.lock().unwrap();
            overlay
                .as_ref()
                .map(|s| s.draft.clone())
                .ok_or_else(|| AppError::internal("no overlay to copy from"))?
        };
        self.output.deliver(&text)
    }

    /// ページ内置換。元テキストとオーバーレイの「現在の編集値」で
    /// 置換ヒューリスティックを 1 回だけ実行する。
    /// 成功したらオーバーレイを閉じる
    pub fn replace_edited(&self) -> Result<ReplaceMethod, AppError> {
        let (original, draft) = {
            let overlay = self.overlay.lock().unwrap();
            let state = overlay
                .as_ref()
                .ok_or_else(|| AppError::internal("no overlay to replace from"))?;
            (state.original_text.clone(), state.draft.clone())
        };

        let method = {
            let mut doc = self.document.lock().unwrap();
            let mut tracker = self.tracker.lock().unwrap();
            replacer::replace_on_page(doc.as_mut(), &mut tracker, &original, &draft)
                .map_err(|e| AppError::replace(e.to_string()))?
        };

        *self.overlay.lock().unwrap() = None;
        Ok(method)
    }

    pub fn dismiss_overlay(&self) {
        *self.overlay.lock().unwrap() = None;
    }

    pub fn overlay_view(&self) -> Option<OverlayView> {
        let overlay = self.overlay.lock().unwrap();
        overlay.as_ref().map(|s| Self::view_of(s, &self.counter))
    }

    // ==================== Guards ====================

    fn begin_request(&self) -> Result<(), AppError> {
        let mut pending = self.pending.lock().unwrap();
        if *pending {
            return Err(AppError::busy("a rewrite request is already in flight"));
        }
        *pending = true;
        Ok(())
    }

    fn end_request(&self) {
        *self.pending.lock().unwrap() = false;
    }

    fn view_of(state: &OverlayState, counter: &CharCounter) -> OverlayView {
        let char_count = state.draft.chars().count();
        OverlayView {
            original_text: state.original_text.clone(),
            draft: state.draft.clone(),
            loading: state.loading,
            char_count,
            char_level: counter.level(char_count),
        }
    }
}
