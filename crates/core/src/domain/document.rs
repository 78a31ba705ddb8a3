use serde::{Deserialize, Serialize};

/// 文書内テキストノードの不透明ハンドル
pub type NodeId = u32;

/// ノード内の位置。offset はバイトオフセットで、char 境界上にあること
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

/// 文書内の範囲（選択アンカー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomRange {
    pub start: Position,
    pub end: Position,
}

impl DomRange {
    /// 幅ゼロ（折りたたまれた）範囲か
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// ライブ選択のスナップショット（範囲 + 直列化テキスト）
#[derive(Debug, Clone)]
pub struct LiveSelection {
    pub range: DomRange,
    pub text: String,
}

/// 文書操作エラー
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("node {0} is no longer attached to the document")]
    Detached(NodeId),
    #[error("range does not fall on valid text boundaries")]
    InvalidRange,
}

/// 抽象文書コラボレーター。
/// 置換ヒューリスティックをブラウザなしでテスト可能にするための seam。
/// 実装はテキストノード列の提供と範囲置換だけを担い、一致判定は
/// 呼び出し側（usecase::replacer）が行う。
pub trait PageDocument: Send {
    /// 文書順のテキストノード列。script/style 配下と
    /// オーバーレイ自身のサブツリーは含めない。
    fn text_nodes(&self) -> Vec<NodeId>;

    /// ノードの全テキスト。切り離し済みノードは None
    fn node_text(&self, node: NodeId) -> Option<String>;

    /// ノードの全テキストを置き換える
    fn set_node_text(&mut self, node: NodeId, text: &str) -> Result<(), DocumentError>;

    /// ノードがまだ文書に接続されているか
    fn is_attached(&self, node: NodeId) -> bool;

    /// 範囲の内容を削除し、その位置に text を挿入する
    fn replace_range(&mut self, range: &DomRange, text: &str) -> Result<(), DocumentError>;

    /// 現在のライブ選択（なければ None）
    fn live_selection(&self) -> Option<LiveSelection>;

    /// ライブ選択を解除する
    fn collapse_selection(&mut self);
}
