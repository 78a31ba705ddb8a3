use serde::Serialize;

use super::document::{DomRange, LiveSelection};

/// 選択スナップショット（アンカー + テキスト + 取得時刻）。
/// text は取得時点での range の直列化と一致する。文書が変異した後の
/// 整合性は保証しない（アンカーの失効は使用時に検出する）
#[derive(Debug, Clone, Serialize)]
pub struct SelectionRecord {
    pub range: DomRange,
    pub text: String,
    pub captured_at: String,
}

/// 選択トラッカー（単一スロット）。
/// 有効な選択が観測されるたびに無条件で上書きする。マージも履歴もない
pub struct SelectionTracker {
    current: Option<SelectionRecord>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// ポインタ/キー解放時に呼ばれる。折りたたまれておらず trim 後も
    /// 空でない選択だけを記録する。無効な選択は既存レコードを変えない
    pub fn observe(&mut self, live: Option<&LiveSelection>, now: String) {
        let Some(sel) = live else { return };
        if sel.range.is_collapsed() || sel.text.trim().is_empty() {
            return;
        }
        self.current = Some(SelectionRecord {
            range: sel.range,
            text: sel.text.clone(),
            captured_at: now,
        });
    }

    pub fn current(&self) -> Option<&SelectionRecord> {
        self.current.as_ref()
    }

    pub fn has_selection(&self) -> bool {
        self.current.is_some()
    }

    /// 置換成功後の明示的なリセット
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
