use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use cikulche_models::User;

use super::{StoreError, UserStore};

/// In-memory user store keyed by normalized email.
///
/// Clones share the underlying map, so a test can hold a handle and inspect
/// state while the service owns another. `DashMap::entry` keeps the
/// uniqueness check and the insert atomic under concurrent registration.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey("email".to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(user.clone());
                Ok(user)
            }
        }
    }
}
