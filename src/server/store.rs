use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::core::{NewTodo, Todo, TodoId, TodoPatch};

#[derive(Debug, Default)]
struct Inner {
    todos: BTreeMap<TodoId, Todo>,
    last_id: u64,
}

/// In-memory `todos` table with server-assigned, increasing ids.
#[derive(Debug, Default)]
pub struct TodoStore {
    inner: RwLock<Inner>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; ids keep counting from the highest seeded id.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let mut inner = Inner::default();
        for mut todo in todos {
            todo.optimistic = false;
            inner.last_id = inner.last_id.max(todo.id.value());
            inner.todos.insert(todo.id, todo);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub async fn list(&self) -> Vec<Todo> {
        self.inner.read().await.todos.values().cloned().collect()
    }

    pub async fn get(&self, id: TodoId) -> Option<Todo> {
        self.inner.read().await.todos.get(&id).cloned()
    }

    /// Returns `None` once the id space is exhausted.
    pub async fn create(&self, draft: NewTodo) -> Option<Todo> {
        let mut inner = self.inner.write().await;
        let id = TodoId::server(inner.last_id + 1)?;
        inner.last_id = id.value();

        let todo = Todo::new(id, draft.text).completed(draft.completed);
        inner.todos.insert(id, todo.clone());
        Some(todo)
    }

    pub async fn patch(&self, id: TodoId, patch: TodoPatch) -> Option<Todo> {
        let mut inner = self.inner.write().await;
        let todo = inner.todos.get_mut(&id)?;
        if let Some(text) = patch.text {
            todo.text = text;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Some(todo.clone())
    }

    pub async fn delete(&self, id: TodoId) -> Option<Todo> {
        self.inner.write().await.todos.remove(&id)
    }
}
