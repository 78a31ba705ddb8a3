use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::error::AppError;
use crate::domain::types::{RephraseTrigger, RewriteRequest};
use crate::infra::rewriter::Rewriter;

/// 選択テキスト用コンテキストメニューの項目 ID とタイトル
pub const MENU_REPHRASE_ID: &str = "rephraseText";
pub const MENU_REPHRASE_TITLE: &str = "Rephrase this with AI";

/// メニューを表示するコンテキスト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    Selection,
}

/// 登録済みメニュー項目
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

/// Coordinator: UI サーフェスとテキスト生成コラボレーターを結ぶ中継役。
/// リクエスト間で可変状態を持たない（保持するのはメニュー登録表のみ）
pub struct Coordinator {
    rewriter: Arc<dyn Rewriter>,
    menu: Mutex<Vec<MenuItem>>,
}

impl Coordinator {
    pub fn new(rewriter: Arc<dyn Rewriter>) -> Self {
        Self {
            rewriter,
            menu: Mutex::new(Vec::new()),
        }
    }

    /// 起動・インストール時のメニュー登録。
    /// 何度呼んでも項目は常に 1 つ
    pub fn register_menu(&self) {
        let mut menu = self.menu.lock().unwrap();
        menu.retain(|item| item.id != MENU_REPHRASE_ID);
        menu.push(MenuItem {
            id: MENU_REPHRASE_ID.to_string(),
            title: MENU_REPHRASE_TITLE.to_string(),
            contexts: vec![MenuContext::Selection],
        });
        log::info!("コンテキストメニューを登録: {MENU_REPHRASE_ID}");
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.menu.lock().unwrap().clone()
    }

    /// メニュークリック。選択テキストがあれば Page Agent 向けの
    /// トリガーに変換する（スタイルは Page Agent 側で決める）
    pub fn menu_clicked(
        &self,
        item_id: &str,
        selection_text: Option<&str>,
    ) -> Option<RephraseTrigger> {
        if item_id != MENU_REPHRASE_ID {
            return None;
        }
        let text = selection_text.filter(|t| !t.is_empty())?;
        Some(RephraseTrigger {
            selected_text: text.to_string(),
        })
    }

    /// リライト要求をコラボレーターへ中継する。
    /// 失敗はメッセージをそのまま載せたバックエンドエラーとして返す
    pub async fn rewrite(&self, request: &RewriteRequest) -> Result<String, AppError> {
        self.rewriter
            .rewrite(&request.source_text, request.style)
            .await
            .map_err(|e| AppError::backend(e.to_string()))
    }

    pub fn rewriter_name(&self) -> &str {
        self.rewriter.name()
    }
}
