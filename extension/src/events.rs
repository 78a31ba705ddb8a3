use serde::Serialize;
use tokio::sync::broadcast;

use tr_core::domain::error::AppError;
use tr_core::usecase::replacer::ReplaceMethod;

/// イベント名定数
pub const REWRITE_DONE: &str = "rewrite_done";
pub const REPLACE_DONE: &str = "replace_done";
pub const REPLACE_FAILED: &str = "replace_failed";
pub const ERROR: &str = "error";

/// クロームへ通知するサーフェスイベント
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent {
    RewriteDone {
        text: String,
        style: String,
    },
    ReplaceDone {
        method: ReplaceMethod,
    },
    ReplaceFailed {
        message: String,
    },
    Error {
        code: String,
        message: String,
        recoverable: bool,
    },
}

impl SurfaceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RewriteDone { .. } => REWRITE_DONE,
            Self::ReplaceDone { .. } => REPLACE_DONE,
            Self::ReplaceFailed { .. } => REPLACE_FAILED,
            Self::Error { .. } => ERROR,
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::Error {
            code: serde_json::to_value(err.code)
                .ok()
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .unwrap_or_default(),
            message: err.message.clone(),
            recoverable: err.recoverable,
        }
    }
}

/// イベントバス。購読者がいなくても emit は失敗にしない
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SurfaceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.tx.subscribe()
    }

    /// 統一イベント送信関数
    pub fn emit(&self, event: SurfaceEvent) {
        if let Err(e) = self.tx.send(event) {
            log::debug!("イベント送信: 購読者なし [{}]", e.0.name());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
