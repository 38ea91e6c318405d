#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todo_cache::{
    CacheError, Collection, NewTodo, OptimisticCollectionCache, PlaceholderIds, Result, Todo,
    TodoId, TodoPatch, TodoTransport,
};
use tokio::sync::oneshot;

pub fn id(raw: u64) -> TodoId {
    TodoId::server(raw).expect("test ids stay below the placeholder range")
}

pub fn todo(raw: u64) -> Todo {
    Todo::new(id(raw), format!("todo {raw}"))
}

pub fn todos(ids: &[u64]) -> Vec<Todo> {
    ids.iter().map(|raw| todo(*raw)).collect()
}

pub fn ids_of(collection: &Collection) -> Vec<u64> {
    collection.iter().map(|item| item.id.value()).collect()
}

/// Fails with a 500, the way a broken backend would.
pub fn server_error() -> CacheError {
    CacheError::server(500, "boom")
}

enum Reply<T> {
    Now(Result<T>),
    Later(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Self::Now(result) => result,
            Self::Later(rx) => rx
                .await
                .unwrap_or_else(|_| Err(CacheError::transport("reply sender dropped"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(String),
    Update(TodoId, TodoPatch),
    Delete(TodoId),
}

#[derive(Default)]
struct Server {
    todos: Vec<Todo>,
    last_id: u64,
    list_error: Option<CacheError>,
}

/// In-memory stand-in for the remote resource.
///
/// Requests succeed against an internal list unless a reply was scripted
/// for them: creates are keyed by draft text, updates and deletes by id.
#[derive(Default)]
pub struct ScriptedTransport {
    server: Mutex<Server>,
    creates: Mutex<HashMap<String, Reply<Todo>>>,
    updates: Mutex<HashMap<TodoId, Reply<()>>>,
    deletes: Mutex<HashMap<TodoId, Reply<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let last_id = todos.iter().map(|item| item.id.value()).max().unwrap_or(0);
        Arc::new(Self {
            server: Mutex::new(Server {
                todos,
                last_id,
                list_error: None,
            }),
            ..Self::default()
        })
    }

    pub fn fail_list(&self, error: Option<CacheError>) {
        self.server.lock().unwrap().list_error = error;
    }

    pub fn set_server_todos(&self, todos: Vec<Todo>) {
        self.server.lock().unwrap().todos = todos;
    }

    pub fn fail_create(&self, text: &str, error: CacheError) {
        self.creates
            .lock()
            .unwrap()
            .insert(text.to_string(), Reply::Now(Err(error)));
    }

    pub fn gate_create(&self, text: &str) -> oneshot::Sender<Result<Todo>> {
        let (tx, rx) = oneshot::channel();
        self.creates
            .lock()
            .unwrap()
            .insert(text.to_string(), Reply::Later(rx));
        tx
    }

    pub fn fail_update(&self, id: TodoId, error: CacheError) {
        self.updates.lock().unwrap().insert(id, Reply::Now(Err(error)));
    }

    pub fn fail_delete(&self, id: TodoId, error: CacheError) {
        self.deletes.lock().unwrap().insert(id, Reply::Now(Err(error)));
    }

    pub fn gate_delete(&self, id: TodoId) -> oneshot::Sender<Result<()>> {
        let (tx, rx) = oneshot::channel();
        self.deletes.lock().unwrap().insert(id, Reply::Later(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Server-side creation without going through the cache.
    pub fn insert_on_server(&self, text: &str) -> Todo {
        let mut server = self.server.lock().unwrap();
        server.last_id += 1;
        let created = Todo::new(id(server.last_id), text);
        server.todos.push(created.clone());
        created
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TodoTransport for ScriptedTransport {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.record(Call::List);
        let server = self.server.lock().unwrap();
        match &server.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(server.todos.clone()),
        }
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo> {
        self.record(Call::Create(draft.text.clone()));
        let scripted = self.creates.lock().unwrap().remove(&draft.text);
        match scripted {
            Some(reply) => reply.resolve().await,
            None => {
                let created = self.insert_on_server(&draft.text).completed(draft.completed);
                Ok(created)
            }
        }
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<()> {
        self.record(Call::Update(id, patch.clone()));
        let scripted = self.updates.lock().unwrap().remove(&id);
        if let Some(reply) = scripted {
            return reply.resolve().await;
        }

        let mut server = self.server.lock().unwrap();
        let item = server
            .todos
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CacheError::server(404, "todo not found"))?;
        if let Some(text) = &patch.text {
            item.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            item.completed = completed;
        }
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        self.record(Call::Delete(id));
        let scripted = self.deletes.lock().unwrap().remove(&id);
        if let Some(reply) = scripted {
            return reply.resolve().await;
        }

        let mut server = self.server.lock().unwrap();
        let before = server.todos.len();
        server.todos.retain(|item| item.id != id);
        if server.todos.len() == before {
            return Err(CacheError::server(404, "todo not found"));
        }
        Ok(())
    }
}

/// Cache over `transport` with placeholders counting up from 9999999999,
/// already loaded from the transport's list.
pub async fn loaded_cache(transport: &Arc<ScriptedTransport>) -> OptimisticCollectionCache {
    let cache = OptimisticCollectionCache::with_placeholders(
        transport.clone(),
        PlaceholderIds::sequential(9_999_999_999),
    );
    cache.fetch_all().await.expect("initial fetch succeeds");
    cache
}

/// Counts entries that represent the draft `text`, placeholder or confirmed.
pub fn representations(collection: &Collection, text: &str) -> usize {
    collection.iter().filter(|item| item.text == text).count()
}
