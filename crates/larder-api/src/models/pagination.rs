//! Relay-style connection types.

use serde::{Deserialize, Serialize};

/// Forward pagination input: `{ first, after }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageArgs {
    /// Page size.
    pub first: u32,
    /// End cursor of the previous page; absent for the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl PageArgs {
    /// Arguments for the first page.
    #[must_use]
    pub fn first(first: u32) -> Self {
        Self { first, after: None }
    }

    /// Arguments for the page following `cursor`.
    #[must_use]
    pub fn after(first: u32, cursor: Option<&str>) -> Self {
        Self {
            first,
            after: cursor.map(ToOwned::to_owned),
        }
    }
}

/// A page of `Node`s plus the information needed to fetch the next one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<Node> {
    pub edges: Vec<Edge<Node>>,
    pub page_info: PageInfo,
    /// Only some connections report a total.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<Node> Connection<Node> {
    /// Consume the page, keeping only the nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.edges.iter().map(|e| &e.node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.page_info.end_cursor.as_deref()
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }
}

/// One node in a connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Edge<Node> {
    pub node: Node,
    /// Per-edge cursor. Pagination only relies on `PageInfo::end_cursor`.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Position of a page within its connection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_connection_shape() {
        let raw = r#"{
            "edges": [{ "node": 1 }, { "node": 2, "cursor": "c2" }],
            "pageInfo": { "hasNextPage": true, "hasPreviousPage": false, "endCursor": "c2" }
        }"#;
        let conn: Connection<u32> = serde_json::from_str(raw).unwrap();
        assert_eq!(conn.len(), 2);
        assert_eq!(conn.end_cursor(), Some("c2"));
        assert!(conn.has_next_page());
        assert_eq!(conn.into_nodes(), vec![1, 2]);
    }

    #[test]
    fn null_end_cursor_is_none() {
        let raw = r#"{ "edges": [], "pageInfo": { "hasNextPage": false, "endCursor": null } }"#;
        let conn: Connection<u32> = serde_json::from_str(raw).unwrap();
        assert!(conn.is_empty());
        assert_eq!(conn.end_cursor(), None);
    }

    #[test]
    fn first_page_args_omit_after() {
        let json = serde_json::to_value(PageArgs::first(20)).unwrap();
        assert_eq!(json, serde_json::json!({ "first": 20 }));
    }
}
