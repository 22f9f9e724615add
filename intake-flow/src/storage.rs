use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::{error::Result, transcript::Session};

/// Trait for storing and retrieving interview sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: Session) -> Result<()>;
    async fn get(&self, id: u64) -> Result<Option<Session>>;
    async fn delete(&self, id: u64) -> Result<()>;
}

/// In-memory implementation of SessionStorage
#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<DashMap<u64, Session>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Session>> {
        Ok(self.sessions.get(&id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.sessions.remove(&id);
        Ok(())
    }
}
