use serde::Serialize;

/// アプリケーション共通エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "E_BACKEND")]
    Backend,
    #[serde(rename = "E_REPLACE")]
    Replace,
    #[serde(rename = "E_BUSY")]
    Busy,
    #[serde(rename = "E_CLIPBOARD")]
    Clipboard,
    #[serde(rename = "E_INTERNAL")]
    Internal,
}

/// アプリケーションエラー（イベントペイロード兼用）
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub recoverable: bool,
}

impl AppError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Backend,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn replace(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Replace,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Busy,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Clipboard,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: msg.into(),
            recoverable: false,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
