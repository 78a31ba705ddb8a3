use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::domain::document::PageDocument;
use crate::domain::selection::SelectionTracker;

/// 置換に使われた戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMethod {
    StoredSelection,
    LiveSelection,
    WholeNode,
    WordBoundary,
}

/// 置換失敗
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    #[error("no matching text found in the document")]
    NoMatch,
}

/// 置換ヒューリスティック。
/// 保存選択 → ライブ選択 → 文書走査（完全一致ノード → 単語境界の
/// 部分一致）の順に試し、最初に成功した戦略で止まる。どの戦略も
/// 一致しなければ文書には一切触れない
pub fn replace_on_page(
    doc: &mut dyn PageDocument,
    tracker: &mut SelectionTracker,
    original_text: &str,
    new_text: &str,
) -> Result<ReplaceMethod, ReplaceError> {
    if original_text.is_empty() {
        return Err(ReplaceError::NoMatch);
    }

    // 戦略 1: 保存された選択。キャプチャ時テキストの完全一致と
    // アンカーの接続を確認してから範囲置換する
    if let Some(record) = tracker.current() {
        if record.text == original_text && doc.is_attached(record.range.start.node) {
            let range = record.range;
            match doc.replace_range(&range, new_text) {
                Ok(()) => {
                    tracker.clear();
                    log::debug!("replaced via stored selection");
                    return Ok(ReplaceMethod::StoredSelection);
                }
                // 失効したアンカーは次の戦略へ黙って降格
                Err(e) => log::debug!("stored selection replacement failed: {e}"),
            }
        }
    }

    // 戦略 2: ライブ選択
    if let Some(sel) = doc.live_selection() {
        if sel.text == original_text {
            match doc.replace_range(&sel.range, new_text) {
                Ok(()) => {
                    doc.collapse_selection();
                    log::debug!("replaced via live selection");
                    return Ok(ReplaceMethod::LiveSelection);
                }
                Err(e) => log::debug!("live selection replacement failed: {e}"),
            }
        }
    }

    // 戦略 3: 文書走査
    let nodes = doc.text_nodes();

    // 第 1 パス: ノード全文の完全一致
    for &node in &nodes {
        if doc.node_text(node).as_deref() == Some(original_text)
            && doc.set_node_text(node, new_text).is_ok()
        {
            log::debug!("replaced exact-content node {node}");
            return Ok(ReplaceMethod::WholeNode);
        }
    }

    // 第 2 パス: 単語境界で区切られた部分一致（最初の 1 箇所のみ）
    if let Some(pattern) = word_boundary_pattern(original_text) {
        for &node in &nodes {
            let Some(text) = doc.node_text(node) else { continue };
            if !pattern.is_match(&text) {
                continue;
            }
            let replaced = pattern.replace(&text, NoExpand(new_text));
            if doc.set_node_text(node, &replaced).is_ok() {
                log::debug!("replaced word-boundary match in node {node}");
                return Ok(ReplaceMethod::WordBoundary);
            }
        }
    }

    Err(ReplaceError::NoMatch)
}

/// 検索テキストをリテラルとしてエスケープした単語境界パターン。
/// 利用者入力の正規表現メタ文字は一切解釈しない
fn word_boundary_pattern(needle: &str) -> Option<Regex> {
    match Regex::new(&format!(r"\b{}\b", regex::escape(needle))) {
        Ok(re) => Some(re),
        Err(e) => {
            log::debug!("word boundary pattern rejected: {e}");
            None
        }
    }
}
