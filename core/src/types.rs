//! The todo item entity.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// A single todo item as stored and returned to callers.
///
/// Serializes to `{"id": "<token>", "title": "...", "done": false}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: ItemId,
    pub title: String,
    pub done: bool,
}

impl TodoItem {
    /// A freshly created item. Items always start out not done.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_with_token_id() {
        let id: ItemId = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
        let item = TodoItem::new(id, "Buy milk");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["done"], false);
    }

    #[test]
    fn item_rejects_malformed_id_in_json() {
        let result: Result<TodoItem, _> =
            serde_json::from_str(r#"{"id":"nope","title":"Buy milk","done":false}"#);
        assert!(result.is_err());
    }
}
