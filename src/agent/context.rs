//! Per-user conversation context

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::types::{ContextMap, UserId};

/// In-memory per-user key/value context
///
/// Entries are created on first write and grow by shallow merge. Nothing is
/// evicted and nothing survives a restart.
#[derive(Debug, Default)]
pub struct ContextStore {
    entries: RwLock<HashMap<UserId, ContextMap>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a user, empty if the user has none yet
    pub fn get(&self, user_id: UserId) -> ContextMap {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Shallow-merge `update` into the user's context; existing keys are overwritten
    pub fn merge(&self, user_id: UserId, update: ContextMap) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(user_id).or_default().extend(update);
    }

    /// Drop a user's context, returning what was stored
    pub fn clear(&self, user_id: UserId) -> Option<ContextMap> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
    }

    /// Number of users with context
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
