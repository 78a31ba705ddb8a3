use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::error::AppError;
use crate::domain::types::RewriteRequest;
use crate::usecase::coordinator::Coordinator;

/// リレーへの型付きリクエスト（action ごとに 1 ヴァリアント）
pub enum RelayRequest {
    CallApi {
        request: RewriteRequest,
        reply: oneshot::Sender<Result<String, AppError>>,
    },
}

/// リレーハンドル。UI サーフェスが保持するクライアント側
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayRequest>,
}

/// Coordinator へのリレーを起動する。
/// リクエストごとに独立したタスクを spawn するため、並行呼び出しは
/// 互いに影響せず、順序もキューで直列化されない
pub fn spawn_relay(coordinator: Arc<Coordinator>) -> RelayHandle {
    let (tx, mut rx) = mpsc::channel::<RelayRequest>(16);

    tokio::spawn(async move {
        while let Some(req) = rx.recv().await {
            match req {
                RelayRequest::CallApi { request, reply } => {
                    let coordinator = Arc::clone(&coordinator);
                    let request_id = uuid::Uuid::new_v4().to_string();
                    tokio::spawn(async move {
                        log::debug!(
                            "callAPI {request_id}: {} 文字, style={}",
                            request.source_text.chars().count(),
                            request.style.as_str()
                        );
                        let result = coordinator.rewrite(&request).await;
                        if reply.send(result).is_err() {
                            log::debug!("callAPI {request_id}: 受信側が破棄済み");
                        }
                    });
                }
            }
        }
    });

    RelayHandle { tx }
}

impl RelayHandle {
    /// callAPI: リライトを要求して結果を待つ。
    /// タイムアウトは設けない（応答しないバックエンドは呼び出し側を
    /// 待たせ続ける）
    pub async fn call_api(&self, request: RewriteRequest) -> Result<String, AppError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RelayRequest::CallApi { request, reply })
            .await
            .map_err(|_| AppError::internal("relay is not running"))?;
        rx.await
            .map_err(|_| AppError::internal("relay dropped the request"))?
    }
}
