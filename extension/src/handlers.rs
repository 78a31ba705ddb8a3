use serde::{Deserialize, Serialize};

use tr_core::domain::error::AppError;
use tr_core::domain::types::{RewriteRequest, Style};

use crate::events::SurfaceEvent;
use crate::Extension;

/// 受信メッセージ。action ごとに 1 ヴァリアントの型付きディスパッチ
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    /// コンテキストメニュー → Page Agent
    #[serde(rename = "rephraseText", rename_all = "camelCase")]
    RephraseText { selected_text: String },
    /// UI サーフェス → Coordinator
    #[serde(rename = "callAPI")]
    CallApi {
        text: String,
        #[serde(default)]
        style: Option<String>,
    },
}

/// callAPI 応答。success で判別されるワイヤ形式
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    #[serde(rename_all = "camelCase")]
    Ok { success: bool, rephrased_text: String },
    Err { success: bool, error: String },
}

impl ApiResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self::Ok {
            success: true,
            rephrased_text: text.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self::Err {
            success: false,
            error: message.into(),
        }
    }
}

impl From<Result<String, AppError>> for ApiResponse {
    fn from(result: Result<String, AppError>) -> Self {
        match result {
            Ok(text) => Self::ok(text),
            Err(e) => Self::err(e.message),
        }
    }
}

/// 受信メッセージを対応するコンテキストへ配送する。
/// 応答を持つのは callAPI のみ
pub async fn dispatch(ext: &Extension, message: InboundMessage) -> Option<ApiResponse> {
    match message {
        InboundMessage::RephraseText { selected_text } => {
            match ext.page().handle_rephrase(&selected_text).await {
                Ok(view) => ext.events().emit(SurfaceEvent::RewriteDone {
                    text: view.draft,
                    style: ext.page().style().as_str().to_string(),
                }),
                Err(e) => ext.events().emit(SurfaceEvent::from_error(&e)),
            }
            None
        }
        InboundMessage::CallApi { text, style } => {
            // 未知のスタイル文字列はデフォルトへフォールバック
            let style = style.as_deref().map(Style::parse).unwrap_or_default();
            let result = ext
                .relay()
                .call_api(RewriteRequest {
                    source_text: text,
                    style,
                })
                .await;
            Some(ApiResponse::from(result))
        }
    }
}

/// JSON 文字列レベルの入口。応答も JSON 文字列で返す
pub async fn dispatch_json(
    ext: &Extension,
    raw: &str,
) -> Result<Option<String>, serde_json::Error> {
    let message: InboundMessage = serde_json::from_str(raw)?;
    match dispatch(ext, message).await {
        Some(response) => Ok(Some(serde_json::to_string(&response)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rephrase_text_wire_format() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"action":"rephraseText","selectedText":"hello"}"#).unwrap();
        match message {
            InboundMessage::RephraseText { selected_text } => {
                assert_eq!(selected_text, "hello");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_call_api_wire_format() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"action":"callAPI","text":"hi","style":"funny"}"#).unwrap();
        match message {
            InboundMessage::CallApi { text, style } => {
                assert_eq!(text, "hi");
                assert_eq!(style.as_deref(), Some("funny"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_call_api_style_is_optional() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"action":"callAPI","text":"hi"}"#).unwrap();
        match message {
            InboundMessage::CallApi { style, .. } => assert!(style.is_none()),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_str::<InboundMessage>(r#"{"action":"explode"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_success_response_shape() {
        let value = serde_json::to_value(ApiResponse::ok("better text")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "rephrasedText": "better text"})
        );
    }

    #[test]
    fn test_failure_response_shape() {
        let value = serde_json::to_value(ApiResponse::err("backend down")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "backend down"}));
    }

    #[test]
    fn test_response_from_result() {
        let ok = ApiResponse::from(Ok("text".to_string()));
        assert!(matches!(ok, ApiResponse::Ok { success: true, .. }));

        let err = ApiResponse::from(Err(AppError::backend("down")));
        match err {
            ApiResponse::Err { success, error } => {
                assert!(!success);
                assert_eq!(error, "down");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
