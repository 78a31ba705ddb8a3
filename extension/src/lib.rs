//! Text Rephraser のホストクレート。
//! ブラウザクロームに相当する埋め込み側へ、配線済みの 3 コンテキスト
//! （Coordinator / Page Agent / Surface UI パネル）を公開する。
//! クローム自身（メニュー描画・ウィンドウ・ピクセル）は外部コラボレーター

pub mod events;
pub mod handlers;

use std::sync::Arc;

use tr_core::domain::view::ButtonFeedback;
use tr_core::infra::output::{ClipboardOutput, OutputTarget};
use tr_core::infra::relay::{spawn_relay, RelayHandle};
use tr_core::infra::rewriter::{HttpRewriter, HttpRewriterConfig, MockRewriter, Rewriter};
use tr_core::usecase::coordinator::Coordinator;
use tr_core::usecase::page_agent::{PageAgent, SharedDocument};
use tr_core::usecase::panel::Panel;

use events::{EventBus, SurfaceEvent};

/// バックエンド設定の環境変数名
pub const ENV_API_URL: &str = "REPHRASER_API_URL";
pub const ENV_API_KEY: &str = "REPHRASER_API_KEY";
pub const ENV_MODEL: &str = "REPHRASER_MODEL";

/// リライターを構築する（URL 設定あり: HTTP, なし: モック）
pub fn create_rewriter() -> Arc<dyn Rewriter> {
    if let Ok(base_url) = std::env::var(ENV_API_URL) {
        let config = HttpRewriterConfig {
            base_url,
            api_key: std::env::var(ENV_API_KEY).ok(),
            model: std::env::var(ENV_MODEL)
                .unwrap_or_else(|_| HttpRewriterConfig::default().model),
            ..Default::default()
        };
        log::info!("HTTP rewriter selected: {}", config.base_url);
        return Arc::new(HttpRewriter::new(config));
    }

    log::info!("Using mock rewriter");
    Arc::new(MockRewriter)
}

/// 配線済みの拡張。クロームはこのハンドル経由で各コンテキストへ
/// メッセージを配送する
pub struct Extension {
    coordinator: Arc<Coordinator>,
    relay: RelayHandle,
    page: Arc<PageAgent>,
    panel: Arc<Panel>,
    events: EventBus,
}

impl Extension {
    /// 各コンテキストを組み立てる。Tokio ランタイム上で呼ぶこと
    pub fn new(document: SharedDocument, rewriter: Arc<dyn Rewriter>) -> Self {
        let coordinator = Arc::new(Coordinator::new(rewriter));
        log::info!("rewriter: {}", coordinator.rewriter_name());
        // 起動/インストール相当のタイミングでメニューを（再）登録する
        coordinator.register_menu();

        let relay = spawn_relay(Arc::clone(&coordinator));
        let output: Arc<dyn OutputTarget> = Arc::new(ClipboardOutput::new());
        let page = Arc::new(PageAgent::new(
            document,
            relay.clone(),
            Arc::clone(&output),
        ));
        let panel = Arc::new(Panel::new(relay.clone(), output));

        Self {
            coordinator,
            relay,
            page,
            panel,
            events: EventBus::new(),
        }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn relay(&self) -> &RelayHandle {
        &self.relay
    }

    pub fn page(&self) -> &Arc<PageAgent> {
        &self.page
    }

    pub fn panel(&self) -> &Arc<Panel> {
        &self.panel
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }

    /// コンテキストメニューのクリック（background → content の経路）。
    /// 選択テキストが無ければ何もしない
    pub async fn context_menu_click(&self, item_id: &str, selection_text: Option<&str>) {
        let Some(trigger) = self.coordinator.menu_clicked(item_id, selection_text) else {
            return;
        };
        handlers::dispatch(
            self,
            handlers::InboundMessage::RephraseText {
                selected_text: trigger.selected_text,
            },
        )
        .await;
    }

    /// オーバーレイの「ページ内で置換」アクション。
    /// 結果はボタンの一時表示として返し、イベントでも通知する
    pub fn replace_on_page(&self) -> ButtonFeedback {
        match self.page.replace_edited() {
            Ok(method) => {
                self.events.emit(SurfaceEvent::ReplaceDone { method });
                ButtonFeedback::confirm("Replaced!")
            }
            Err(e) => {
                self.events.emit(SurfaceEvent::ReplaceFailed {
                    message: e.message.clone(),
                });
                ButtonFeedback::failure("Failed to replace")
            }
        }
    }
}
