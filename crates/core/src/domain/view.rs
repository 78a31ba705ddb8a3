use serde::Serialize;

/// 文字数カウンタの表示ティア
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharCountLevel {
    Normal,
    Warning,
    Alert,
}

/// デフォルト閾値（プレゼンテーション定数、契約ではない）
pub const DEFAULT_WARN_THRESHOLD: usize = 500;
pub const DEFAULT_ALERT_THRESHOLD: usize = 1000;

/// 文字数カウンタ。閾値は設定可能
#[derive(Debug, Clone, Copy)]
pub struct CharCounter {
    warn: usize,
    alert: usize,
}

impl CharCounter {
    pub fn new(warn: usize, alert: usize) -> Self {
        Self { warn, alert }
    }

    pub fn level(&self, count: usize) -> CharCountLevel {
        if count > self.alert {
            CharCountLevel::Alert
        } else if count > self.warn {
            CharCountLevel::Warning
        } else {
            CharCountLevel::Normal
        }
    }
}

impl Default for CharCounter {
    fn default() -> Self {
        Self::new(DEFAULT_WARN_THRESHOLD, DEFAULT_ALERT_THRESHOLD)
    }
}

/// ボタンの一時表示。revert_after_ms 経過後に元の表示へ戻す
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonFeedback {
    pub message: String,
    pub revert_after_ms: u64,
}

pub const FEEDBACK_REVERT_MS: u64 = 1000;
pub const FEEDBACK_FAILURE_REVERT_MS: u64 = 2000;

impl ButtonFeedback {
    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            revert_after_ms: FEEDBACK_REVERT_MS,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            revert_after_ms: FEEDBACK_FAILURE_REVERT_MS,
        }
    }
}
