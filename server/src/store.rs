//! In-memory todo store.
//!
//! # Design
//! A single `tokio::sync::RwLock` guards both the record map and the id
//! counter. Reads (`list`, `get`) share the lock; every mutation holds the
//! write guard for its whole read-modify-write, so an `update` can never
//! interleave with another mutation. Ids start at 1 and only ever grow; a
//! deleted id is gone for good.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A single todo record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub done: bool,
}

/// Partial update. `None` leaves the stored field untouched.
#[derive(Clone, Debug, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("title is required")]
    TitleRequired,

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("todo not found")]
    NotFound,
}

struct Inner {
    next_id: u64,
    items: HashMap<u64, Todo>,
}

pub struct Store {
    inner: RwLock<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                items: HashMap::new(),
            }),
        }
    }

    /// Snapshot of every record, in no particular order.
    pub async fn list(&self) -> Vec<Todo> {
        self.inner.read().await.items.values().cloned().collect()
    }

    pub async fn create(&self, title: &str, done: bool) -> Result<Todo, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::TitleRequired);
        }

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let todo = Todo {
            id,
            title: title.to_string(),
            done,
        };
        inner.items.insert(id, todo.clone());
        Ok(todo)
    }

    pub async fn get(&self, id: u64) -> Result<Todo, StoreError> {
        self.inner
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Apply `patch` to the record with `id`.
    ///
    /// The record is left untouched when any field of the patch is invalid.
    pub async fn update(&self, id: u64, patch: TodoPatch) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        let todo = inner.items.get_mut(&id).ok_or(StoreError::NotFound)?;

        let title = match patch.title {
            Some(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(StoreError::EmptyTitle);
                }
                Some(title.to_string())
            }
            None => None,
        };

        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(done) = patch.done {
            todo.done = done;
        }
        Ok(todo.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
