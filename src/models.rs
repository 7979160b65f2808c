use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single comment, possibly with nested replies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Replies, pre-nested by the backend in display order
    #[serde(default)]
    pub children: Vec<Comment>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of comments in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Comment::count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Comment::depth).max().unwrap_or(0)
    }
}

/// Root comments with their nested descendants, as returned by one list call
pub type Forest = Vec<Comment>;

/// Total number of comments in a forest
pub fn forest_len(forest: &[Comment]) -> usize {
    forest.iter().map(Comment::count).sum()
}

/// Body of a create request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Root ordering accepted by the list endpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggle(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Optional parameters of `GET /comments`
///
/// The default value sends no query string at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Fetch only the subtree rooted at this comment
    pub parent: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<SortOrder>,
}

impl ListQuery {
    /// Query pairs in the order the backend documents them
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(parent) = self.parent {
            pairs.push(("parent", parent.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }

    pub fn is_default(&self) -> bool {
        *self == ListQuery::default()
    }
}

/// Error body returned by the backend on non-2xx responses
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_forest() {
        let json = r#"[{"id":1,"user_id":7,"content":"<b>hi</b>","created_at":"2024-01-01T00:00:00Z",
            "children":[{"id":2,"user_id":8,"content":"re","parent_id":1,"children":[]}]}]"#;
        let forest: Forest = serde_json::from_str(json).unwrap();
        assert_eq!(forest.len(), 1);
        assert!(forest[0].is_root());
        assert_eq!(forest[0].children[0].parent_id, Some(1));
        assert_eq!(forest[0].children[0].created_at, None);
        assert_eq!(forest_len(&forest), 2);
        assert_eq!(forest[0].depth(), 2);
    }

    #[test]
    fn test_missing_children_is_leaf() {
        let json = r#"{"id":5,"user_id":1,"content":"x","created_at":"2024-03-02T10:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert!(comment.children.is_empty());
        assert_eq!(comment.count(), 1);
    }

    #[test]
    fn test_new_comment_omits_missing_parent() {
        let body = NewComment { user_id: 3, content: "hello".into(), parent_id: None };
        let value = serde_json::to_value(&body).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("parent_id"));
        assert_eq!(object["user_id"], 3);

        let reply = NewComment { parent_id: Some(9), ..body };
        assert_eq!(serde_json::to_value(&reply).unwrap()["parent_id"], 9);
    }

    #[test]
    fn test_default_list_query_has_no_pairs() {
        assert!(ListQuery::default().to_pairs().is_empty());

        let query = ListQuery {
            parent: Some(4),
            page: Some(2),
            limit: None,
            sort: Some(SortOrder::Desc),
        };
        assert_eq!(
            query.to_pairs(),
            vec![("parent", "4".to_string()), ("page", "2".to_string()), ("sort", "desc".to_string())]
        );
    }
}
