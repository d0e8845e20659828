//! Session Store: per-conversation message log, model binding, and naming.
//! The only shared mutable state in the system; access is serialized per
//! session id via a per-entry lock, while distinct ids proceed in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::Message;

/// A bounded conversation context keyed by an opaque identifier.
///
/// Invariant: `message_count() == messages.len()` always; `last_active`
/// is monotonic non-decreasing across the session's lifetime.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub model_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    fn new(id: Uuid, name: Option<String>, model_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.unwrap_or_else(|| format!("session-{}", &id.to_string()[..8])),
            model_id: model_id.unwrap_or_else(|| "default".to_string()),
            messages: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.last_active {
            self.last_active = now;
        }
    }
}

/// Patch applied by [`SessionStore::update`]; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub model_id: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
}

/// In-memory mapping from session id to [`Session`].
///
/// Eviction is read-side only: `list(include_empty = false)` filters out
/// idle-empty sessions, but nothing ever removes an entry in the
/// background — deletion is always explicit via [`SessionStore::delete`].
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<RwLock<Session>>>,
}

/// Sessions are included in a read-side empty-exclusion listing if they have
/// at least one message, or were active within the last hour.
fn idle_empty_threshold() -> chrono::Duration {
    chrono::Duration::hours(1)
}

impl SessionStore {
    pub fn new() -> Self {
        Self { sessions: DashMap::new() }
    }

    /// Creates a new session with a freshly generated id.
    pub fn create(&self, name: Option<String>, model_id: Option<String>) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session::new(id, name, model_id);
        self.sessions.insert(id, Arc::new(RwLock::new(session)));
        id
    }

    /// Returns the session for `id`, creating it if absent. Idempotent:
    /// a second call with the same `id` returns the existing session
    /// unchanged, message log intact.
    pub async fn get_or_create(
        &self,
        id: Uuid,
        name: Option<String>,
        model_id: Option<String>,
    ) -> Session {
        if let Some(entry) = self.sessions.get(&id) {
            return entry.read().await.clone();
        }
        let session = Session::new(id, name, model_id);
        let snapshot = session.clone();
        self.sessions
            .entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(session)));
        snapshot
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let entry = self.sessions.get(&id)?;
        Some(entry.read().await.clone())
    }

    pub async fn update(&self, id: Uuid, patch: SessionPatch) -> Result<Session, SessionError> {
        let entry = self.sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        let mut session = entry.write().await;
        if let Some(name) = patch.name {
            session.name = name;
        }
        if let Some(model_id) = patch.model_id {
            session.model_id = model_id;
        }
        session.touch();
        Ok(session.clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Lists sessions ordered by `last_active` descending. When
    /// `include_empty` is false, a session is included only if it has at
    /// least one message or was active within the last hour.
    pub async fn list(&self, include_empty: bool) -> Vec<Session> {
        let mut snapshots = Vec::with_capacity(self.sessions.len());
        for entry in self.sessions.iter() {
            snapshots.push(entry.value().read().await.clone());
        }
        let now = Utc::now();
        if !include_empty {
            snapshots.retain(|s| s.message_count() > 0 || now - s.last_active < idle_empty_threshold());
        }
        snapshots.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        snapshots
    }

    pub async fn append_message(&self, id: Uuid, message: Message) -> Result<(), SessionError> {
        let entry = self.sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        let mut session = entry.write().await;
        session.messages.push(message);
        session.touch();
        Ok(())
    }

    pub async fn clear_messages(&self, id: Uuid) -> Result<(), SessionError> {
        let entry = self.sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        let mut session = entry.write().await;
        session.messages.clear();
        session.touch();
        Ok(())
    }

    pub async fn set_model(&self, id: Uuid, model_id: String) -> Result<(), SessionError> {
        self.update(id, SessionPatch { name: None, model_id: Some(model_id) })
            .await
            .map(|_| ())
    }

    pub async fn rename(&self, id: Uuid, name: String) -> Result<(), SessionError> {
        self.update(id, SessionPatch { name: Some(name), model_id: None })
            .await
            .map(|_| ())
    }
}
