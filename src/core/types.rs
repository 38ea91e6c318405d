use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a todo item.
///
/// Server ids live below [`TodoId::PLACEHOLDER_BIT`]; ids handed out for
/// speculative inserts always carry that bit. The two ranges never overlap
/// and every placeholder sorts above every server id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TodoId(u64);

impl TodoId {
    pub const PLACEHOLDER_BIT: u64 = 1 << 63;

    /// Server-assigned id. Returns `None` if `raw` falls in the placeholder range.
    pub const fn server(raw: u64) -> Option<Self> {
        if raw & Self::PLACEHOLDER_BIT == 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn placeholder(seed: u64) -> Self {
        Self(seed | Self::PLACEHOLDER_BIT)
    }

    pub const fn is_placeholder(self) -> bool {
        self.0 & Self::PLACEHOLDER_BIT != 0
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for TodoId {
    type Error = String;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::server(raw).ok_or_else(|| format!("id {raw} is in the reserved placeholder range"))
    }
}

impl From<TodoId> for u64 {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            write!(f, "pending:{}", self.0 & !Self::PLACEHOLDER_BIT)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Set on speculative inserts that the server has not confirmed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optimistic: bool,
}

impl Todo {
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            optimistic: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub(crate) fn speculative(draft: &NewTodo, id: TodoId) -> Self {
        Self {
            id,
            text: draft.text.clone(),
            completed: draft.completed,
            optimistic: true,
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Body of a partial update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn has_changes(&self) -> bool {
        self.text.is_some() || self.completed.is_some()
    }
}

impl From<&Todo> for TodoPatch {
    fn from(todo: &Todo) -> Self {
        Self {
            text: Some(todo.text.clone()),
            completed: Some(todo.completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholders_sort_above_server_ids() {
        let newest_server = TodoId::server(TodoId::PLACEHOLDER_BIT - 1).unwrap();
        let placeholder = TodoId::placeholder(0);
        assert!(placeholder > newest_server);
        assert!(placeholder.is_placeholder());
        assert!(!newest_server.is_placeholder());
    }

    #[test]
    fn server_rejects_reserved_range() {
        assert_eq!(TodoId::server(TodoId::PLACEHOLDER_BIT | 7), None);
        assert_eq!(TodoId::server(7).map(TodoId::value), Some(7));
    }

    #[test]
    fn decoding_skips_missing_transient_fields() {
        let todo: Todo = serde_json::from_value(json!({"id": 4, "text": "x"})).unwrap();
        assert_eq!(todo, Todo::new(TodoId::server(4).unwrap(), "x"));
    }

    #[test]
    fn decoding_rejects_placeholder_ids() {
        let raw = json!({"id": TodoId::PLACEHOLDER_BIT | 1, "text": "x"});
        assert!(serde_json::from_value::<Todo>(raw).is_err());
    }

    #[test]
    fn optimistic_flag_is_not_serialized_when_clear() {
        let todo = Todo::new(TodoId::server(1).unwrap(), "a").completed(true);
        assert_eq!(
            serde_json::to_value(&todo).unwrap(),
            json!({"id": 1, "text": "a", "completed": true})
        );
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        assert!(patch.has_changes());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"completed": true}));
        assert!(!TodoPatch::default().has_changes());
    }
}
