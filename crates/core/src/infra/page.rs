use crate::domain::document::{
    DocumentError, DomRange, LiveSelection, NodeId, PageDocument, Position,
};

/// オーバーレイのサブツリーを表すコンテナ名。
/// この配下のノードは走査対象から除外される
pub const OVERLAY_CONTAINER: &str = "rephraser-overlay";

const EXCLUDED_CONTAINERS: [&str; 2] = ["script", "style"];

#[derive(Debug, Clone)]
struct TextNode {
    id: NodeId,
    container: String,
    text: String,
    attached: bool,
}

/// インメモリ文書モデル。
/// 文書をフラットなテキストノード列として表現する PageDocument 実装で、
/// ホストが保持するページ実体とテスト用フェイクを兼ねる
pub struct PageBuffer {
    nodes: Vec<TextNode>,
    next_id: NodeId,
    selection: Option<DomRange>,
}

impl PageBuffer {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 1,
            selection: None,
        }
    }

    /// コンテナタグを指定してテキストノードを末尾に追加する
    pub fn push_node(&mut self, container: &str, text: &str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push(TextNode {
            id,
            container: container.to_string(),
            text: text.to_string(),
            attached: true,
        });
        id
    }

    /// ノードを文書から切り離す（ページ側の DOM 変異に相当）
    pub fn detach(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.attached = false;
        }
        if let Some(sel) = self.selection {
            if sel.start.node == node || sel.end.node == node {
                self.selection = None;
            }
        }
    }

    /// ノード全体を選択する
    pub fn select_node(&mut self, node: NodeId) -> Option<DomRange> {
        let len = self.node(node).filter(|n| n.attached)?.text.len();
        let range = DomRange {
            start: Position { node, offset: 0 },
            end: Position { node, offset: len },
        };
        self.selection = Some(range);
        Some(range)
    }

    /// ノード内の部分文字列（最初の出現）を選択する
    pub fn select_substring(&mut self, node: NodeId, needle: &str) -> Option<DomRange> {
        let start = self
            .node(node)
            .filter(|n| n.attached)?
            .text
            .find(needle)?;
        let range = DomRange {
            start: Position { node, offset: start },
            end: Position {
                node,
                offset: start + needle.len(),
            },
        };
        self.selection = Some(range);
        Some(range)
    }

    /// 任意の範囲を選択する（複数ノードにまたがってよい）
    pub fn select_range(&mut self, range: DomRange) {
        self.selection = Some(range);
    }

    /// 接続中ノードの全テキスト連結（アサーション用）
    pub fn full_text(&self) -> String {
        self.nodes
            .iter()
            .filter(|n| n.attached)
            .map(|n| n.text.as_str())
            .collect()
    }

    fn node(&self, id: NodeId) -> Option<&TextNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut TextNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// 文書順での位置。切り離し済みノードは Detached
    fn index_of(&self, id: NodeId) -> Result<usize, DocumentError> {
        let idx = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(DocumentError::Detached(id))?;
        if !self.nodes[idx].attached {
            return Err(DocumentError::Detached(id));
        }
        Ok(idx)
    }

    fn check_boundary(text: &str, offset: usize) -> Result<(), DocumentError> {
        if offset > text.len() || !text.is_char_boundary(offset) {
            return Err(DocumentError::InvalidRange);
        }
        Ok(())
    }

    /// 範囲の内容を直列化する（ノード間の区切りは入れない）
    fn range_text(&self, range: &DomRange) -> Result<String, DocumentError> {
        let si = self.index_of(range.start.node)?;
        let ei = self.index_of(range.end.node)?;
        if si > ei || (si == ei && range.start.offset > range.end.offset) {
            return Err(DocumentError::InvalidRange);
        }

        let start_text = &self.nodes[si].text;
        let end_text = &self.nodes[ei].text;
        Self::check_boundary(start_text, range.start.offset)?;
        Self::check_boundary(end_text, range.end.offset)?;

        if si == ei {
            return Ok(start_text[range.start.offset..range.end.offset].to_string());
        }

        let mut out = String::new();
        out.push_str(&start_text[range.start.offset..]);
        for node in &self.nodes[si + 1..ei] {
            if node.attached {
                out.push_str(&node.text);
            }
        }
        out.push_str(&end_text[..range.end.offset]);
        Ok(out)
    }

    fn is_excluded(container: &str) -> bool {
        EXCLUDED_CONTAINERS.contains(&container) || container == OVERLAY_CONTAINER
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDocument for PageBuffer {
    fn text_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.attached && !Self::is_excluded(&n.container))
            .map(|n| n.id)
            .collect()
    }

    fn node_text(&self, node: NodeId) -> Option<String> {
        self.node(node)
            .filter(|n| n.attached)
            .map(|n| n.text.clone())
    }

    fn set_node_text(&mut self, node: NodeId, text: &str) -> Result<(), DocumentError> {
        let n = self
            .node_mut(node)
            .ok_or(DocumentError::Detached(node))?;
        if !n.attached {
            return Err(DocumentError::Detached(node));
        }
        n.text = text.to_string();
        Ok(())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).map(|n| n.attached).unwrap_or(false)
    }

    fn replace_range(&mut self, range: &DomRange, text: &str) -> Result<(), DocumentError> {
        let si = self.index_of(range.start.node)?;
        let ei = self.index_of(range.end.node)?;
        if si > ei || (si == ei && range.start.offset > range.end.offset) {
            return Err(DocumentError::InvalidRange);
        }
        Self::check_boundary(&self.nodes[si].text, range.start.offset)?;
        Self::check_boundary(&self.nodes[ei].text, range.end.offset)?;

        if si == ei {
            let node_text = &self.nodes[si].text;
            let mut replaced =
                String::with_capacity(node_text.len() - (range.end.offset - range.start.offset) + text.len());
            replaced.push_str(&node_text[..range.start.offset]);
            replaced.push_str(text);
            replaced.push_str(&node_text[range.end.offset..]);
            self.nodes[si].text = replaced;
        } else {
            let suffix = self.nodes[ei].text[range.end.offset..].to_string();
            self.nodes[si].text.truncate(range.start.offset);
            self.nodes[si].text.push_str(text);
            for node in &mut self.nodes[si + 1..ei] {
                node.attached = false;
            }
            self.nodes[ei].text = suffix;
        }

        // 置換で無効になった選択は解除する
        if let Some(sel) = self.selection {
            let touches = |id: NodeId| id == range.start.node || id == range.end.node;
            if touches(sel.start.node) || touches(sel.end.node) {
                self.selection = None;
            }
        }

        Ok(())
    }

    fn live_selection(&self) -> Option<LiveSelection> {
        let range = self.selection?;
        let text = self.range_text(&range).ok()?;
        Some(LiveSelection { range, text })
    }

    fn collapse_selection(&mut self) {
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_nodes_in_document_order() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "first");
        let b = page.push_node("div", "second");
        assert_eq!(page.text_nodes(), vec![a, b]);
    }

    #[test]
    fn test_text_nodes_exclude_script_style_and_overlay() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "visible");
        page.push_node("script", "var x = 1;");
        page.push_node("style", ".a { color: red }");
        page.push_node(OVERLAY_CONTAINER, "overlay text");
        assert_eq!(page.text_nodes(), vec![a]);
    }

    #[test]
    fn test_select_node_serializes_full_text() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello world");
        page.select_node(a).unwrap();
        let sel = page.live_selection().unwrap();
        assert_eq!(sel.text, "hello world");
    }

    #[test]
    fn test_select_substring() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "say hello world now");
        page.select_substring(a, "hello world").unwrap();
        assert_eq!(page.live_selection().unwrap().text, "hello world");
    }

    #[test]
    fn test_multi_node_selection_text() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello ");
        let b = page.push_node("em", "brave ");
        let c = page.push_node("p", "world");
        page.select_range(DomRange {
            start: Position { node: a, offset: 0 },
            end: Position { node: c, offset: 5 },
        });
        let _ = b;
        assert_eq!(page.live_selection().unwrap().text, "hello brave world");
    }

    #[test]
    fn test_replace_range_within_node() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "say hello world now");
        let range = page.select_substring(a, "hello world").unwrap();
        page.replace_range(&range, "goodbye").unwrap();
        assert_eq!(page.node_text(a).as_deref(), Some("say goodbye now"));
    }

    #[test]
    fn test_replace_range_across_nodes_detaches_middle() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello ");
        let b = page.push_node("em", "brave ");
        let c = page.push_node("p", "world!");
        let range = DomRange {
            start: Position { node: a, offset: 0 },
            end: Position { node: c, offset: 5 },
        };
        page.replace_range(&range, "bye").unwrap();
        assert_eq!(page.node_text(a).as_deref(), Some("bye"));
        assert!(!page.is_attached(b));
        assert_eq!(page.node_text(c).as_deref(), Some("!"));
    }

    #[test]
    fn test_replace_range_clears_selection() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello world");
        let range = page.select_node(a).unwrap();
        page.replace_range(&range, "replaced").unwrap();
        assert!(page.live_selection().is_none());
    }

    #[test]
    fn test_detach_invalidates_node_and_selection() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello");
        page.select_node(a).unwrap();
        page.detach(a);
        assert!(!page.is_attached(a));
        assert!(page.node_text(a).is_none());
        assert!(page.live_selection().is_none());
    }

    #[test]
    fn test_replace_range_on_detached_node_fails() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello");
        let range = page.select_node(a).unwrap();
        page.detach(a);
        let err = page.replace_range(&range, "x").unwrap_err();
        assert!(matches!(err, DocumentError::Detached(_)));
    }

    #[test]
    fn test_replace_range_rejects_non_char_boundary() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "日本語テキスト");
        let range = DomRange {
            start: Position { node: a, offset: 1 },
            end: Position { node: a, offset: 4 },
        };
        let err = page.replace_range(&range, "x").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidRange));
    }

    #[test]
    fn test_replace_range_rejects_inverted_range() {
        let mut page = PageBuffer::new();
        let a = page.push_node("p", "hello");
        let range = DomRange {
            start: Position { node: a, offset: 4 },
            end: Position { node: a, offset: 1 },
        };
        assert!(matches!(
            page.replace_range(&range, "x"),
            Err(DocumentError::InvalidRange)
        ));
    }

    #[test]
    fn test_full_text_skips_detached() {
        let mut page = PageBuffer::new();
        page.push_node("p", "one ");
        let b = page.push_node("p", "two ");
        page.push_node("p", "three");
        page.detach(b);
        assert_eq!(page.full_text(), "one three");
    }
}
