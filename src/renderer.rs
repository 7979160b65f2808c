//! Renderer - pure conversion from a comment forest to its display tree
//!
//! Nothing here touches the network or the terminal. All user-controlled
//! text is escaped before it enters the display representation.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_TIMESTAMP_FORMAT;
use crate::models::Comment;

/// Affordances attached to every rendered comment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeAction {
    Reply,
    Delete,
}

impl NodeAction {
    pub const ALL: [NodeAction; 2] = [NodeAction::Reply, NodeAction::Delete];

    pub fn label(&self) -> &'static str {
        match self {
            NodeAction::Reply => "reply",
            NodeAction::Delete => "delete",
        }
    }

    /// Key bound to the action in the tree panel
    pub fn key(&self) -> char {
        match self {
            NodeAction::Reply => 'r',
            NodeAction::Delete => 'd',
        }
    }
}

/// One rendered comment
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNode {
    pub id: i64,
    pub author: String,
    pub timestamp: String,
    /// Escaped content
    pub content: String,
    pub depth: usize,
    pub actions: [NodeAction; 2],
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(DisplayNode::count).sum::<usize>()
    }

    /// Single-line summary, e.g. `#2 user 8 · 2024-01-01 00:00:00`
    pub fn header(&self) -> String {
        format!("#{} {} · {}", self.id, self.author, self.timestamp)
    }
}

/// A flattened view of one node, used for selectable lists
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRow {
    pub id: i64,
    pub depth: usize,
    pub header: String,
    pub content: String,
}

/// Display representation of a whole forest
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn roots(&self) -> &[DisplayNode] {
        &self.nodes
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.nodes.iter().map(DisplayNode::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order rows, parents before their replies
    pub fn rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::with_capacity(self.len());
        fn walk(nodes: &[DisplayNode], rows: &mut Vec<DisplayRow>) {
            for node in nodes {
                rows.push(DisplayRow {
                    id: node.id,
                    depth: node.depth,
                    header: node.header(),
                    content: node.content.clone(),
                });
                walk(&node.children, rows);
            }
        }
        walk(&self.nodes, &mut rows);
        rows
    }

    /// Find a node anywhere in the tree
    pub fn find(&self, id: i64) -> Option<&DisplayNode> {
        fn find_in(nodes: &[DisplayNode], id: i64) -> Option<&DisplayNode> {
            nodes.iter().find_map(|n| {
                if n.id == id {
                    Some(n)
                } else {
                    find_in(&n.children, id)
                }
            })
        }
        find_in(&self.nodes, id)
    }

    /// Nested `<ul><li>` markup, indented 16px per level
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html_list(&mut out, &self.nodes);
        out
    }
}

fn write_html_list(out: &mut String, nodes: &[DisplayNode]) {
    out.push_str("<ul>");
    for node in nodes {
        out.push_str(&format!(
            "<li style=\"margin-left:{}px\"><div class=\"comment\">#{} <strong>{}</strong> · <span class=\"date\">{}</span><br>{}<div class=\"actions\">",
            node.depth * 16,
            node.id,
            node.author,
            node.timestamp,
            node.content,
        ));
        for action in node.actions {
            out.push_str(&format!(
                "<button data-action=\"{}\" data-id=\"{}\">{}</button>",
                action.label(),
                node.id,
                action.label()
            ));
        }
        out.push_str("</div></div>");
        if !node.is_leaf() {
            write_html_list(out, &node.children);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

/// Escape `& < > " '` for safe insertion into markup
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Whether chrono can render `format` without error
pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Converts comments into display nodes
#[derive(Clone, Debug)]
pub struct Renderer {
    timestamp_format: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl Renderer {
    /// An unusable `timestamp_format` falls back to the default
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        let mut timestamp_format = timestamp_format.into();
        if !is_valid_timestamp_format(&timestamp_format) {
            tracing::warn!(format = %timestamp_format, "Invalid timestamp format, using default");
            timestamp_format = String::from(DEFAULT_TIMESTAMP_FORMAT);
        }
        Renderer { timestamp_format }
    }

    /// Render a forest, preserving the given order at every level
    pub fn render(&self, forest: &[Comment]) -> DisplayTree {
        DisplayTree {
            nodes: forest.iter().map(|c| self.render_node(c, 0)).collect(),
        }
    }

    /// Render a flat list (search results), capped at `limit`
    pub fn render_flat(&self, comments: &[Comment], limit: usize) -> Vec<DisplayRow> {
        comments
            .iter()
            .take(limit)
            .map(|c| {
                let node = self.leaf(c, 0);
                DisplayRow {
                    id: node.id,
                    depth: 0,
                    header: node.header(),
                    content: node.content,
                }
            })
            .collect()
    }

    fn render_node(&self, comment: &Comment, depth: usize) -> DisplayNode {
        let mut node = self.leaf(comment, depth);
        node.children = comment
            .children
            .iter()
            .map(|c| self.render_node(c, depth + 1))
            .collect();
        node
    }

    fn leaf(&self, comment: &Comment, depth: usize) -> DisplayNode {
        DisplayNode {
            id: comment.id,
            author: format!("user {}", comment.user_id),
            timestamp: self.format_timestamp(comment.created_at),
            content: escape_html(&comment.content),
            depth,
            actions: NodeAction::ALL,
            children: Vec::new(),
        }
    }

    fn format_timestamp(&self, at: Option<DateTime<Utc>>) -> String {
        match at {
            Some(at) => at.format(&self.timestamp_format).to_string(),
            None => String::from("-"),
        }
    }
}

/// Render with the default timestamp format
pub fn render(forest: &[Comment]) -> DisplayTree {
    Renderer::default().render(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{forest_len, Forest};

    fn comment(id: i64, content: &str, children: Vec<Comment>) -> Comment {
        Comment {
            id,
            user_id: id * 10,
            content: content.to_string(),
            created_at: None,
            updated_at: None,
            parent_id: None,
            children,
        }
    }

    #[test]
    fn test_scenario_nested_reply() {
        let json = r#"[{"id":1,"user_id":7,"content":"<b>hi</b>","created_at":"2024-01-01T00:00:00Z",
            "children":[{"id":2,"user_id":8,"content":"re","parent_id":1,"children":[]}]}]"#;
        let forest: Forest = serde_json::from_str(json).unwrap();
        let tree = render(&forest);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.roots().len(), 1);
        let root = &tree.roots()[0];
        assert_eq!(root.content, "&lt;b&gt;hi&lt;/b&gt;");
        assert_eq!(root.author, "user 7");
        assert_eq!(root.timestamp, "2024-01-01 00:00:00");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].id, 2);
        assert_eq!(root.children[0].depth, 1);
        assert!(root.children[0].is_leaf());
    }

    #[test]
    fn test_counts_match_forest() {
        let forest = vec![
            comment(1, "a", vec![comment(2, "b", vec![comment(3, "c", vec![])]), comment(4, "d", vec![])]),
            comment(5, "e", vec![]),
            comment(6, "f", vec![comment(7, "g", vec![])]),
        ];
        let tree = render(&forest);
        assert_eq!(tree.roots().len(), forest.len());
        assert_eq!(tree.len(), forest_len(&forest));

        let order: Vec<i64> = tree.rows().iter().map(|r| r.id).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7]);
        let depths: Vec<usize> = tree.rows().iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0, 0, 1]);
    }

    #[test]
    fn test_empty_forest() {
        let tree = render(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.rows().is_empty());
        assert_eq!(tree.to_html(), "<ul></ul>");
    }

    #[test]
    fn test_script_content_is_neutralized() {
        let raw = r#"<script>alert("x" + 'y' && 1)</script>"#;
        let tree = render(&[comment(1, raw, vec![])]);
        let content = &tree.roots()[0].content;
        for c in ['<', '>', '"', '\''] {
            assert!(!content.contains(c), "found {c:?} in {content}");
        }
        assert_eq!(content.matches('&').count(), content.matches(';').count());
        assert_eq!(
            content,
            "&lt;script&gt;alert(&quot;x&quot; + &#39;y&#39; &amp;&amp; 1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_every_node_carries_both_actions() {
        let tree = render(&[comment(1, "a", vec![comment(2, "b", vec![])])]);
        assert_eq!(tree.roots()[0].actions, [NodeAction::Reply, NodeAction::Delete]);
        assert_eq!(tree.find(2).map(|n| n.actions), Some(NodeAction::ALL));
        assert!(tree.find(99).is_none());
    }

    #[test]
    fn test_html_leaf_has_no_nested_list() {
        let tree = render(&[comment(1, "a & b", vec![comment(2, "c", vec![])])]);
        let html = tree.to_html();
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("margin-left:16px"));
        assert!(html.contains("data-action=\"delete\" data-id=\"2\""));
    }

    #[test]
    fn test_flat_render_is_capped() {
        let results: Vec<Comment> = (1..=30).map(|i| comment(i, "match", vec![])).collect();
        let rows = Renderer::default().render_flat(&results, 20);
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[19].id, 20);
        assert!(rows.iter().all(|r| r.depth == 0));
    }

    #[test]
    fn test_custom_timestamp_format() {
        let mut c = comment(1, "a", vec![]);
        c.created_at = Some("2024-05-06T07:08:09Z".parse().unwrap());
        let tree = Renderer::new("%d.%m.%Y").render(&[c]);
        assert_eq!(tree.roots()[0].timestamp, "06.05.2024");
        assert_eq!(tree.roots()[0].header(), "#1 user 10 · 06.05.2024");
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        assert!(!is_valid_timestamp_format("%Q"));
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));

        let mut c = comment(1, "a", vec![]);
        c.created_at = Some("2024-05-06T07:08:09Z".parse().unwrap());
        let tree = Renderer::new("%Q").render(&[c]);
        assert_eq!(tree.roots()[0].timestamp, "2024-05-06 07:08:09");
    }
}
