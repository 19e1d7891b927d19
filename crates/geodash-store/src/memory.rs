//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock
//! poisoning only occurs when another thread panicked while holding the
//! lock, which is an unrecoverable state. Production runs use the SQLite
//! backend.

use async_trait::async_trait;
use chrono::Utc;
use geodash_core::error::{DashError, Result};
use geodash_core::models::{Facility, FacilityId, NewFacility, NewUser, UserAccount};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::auth::hash_password;
use crate::ports::{FacilityStore, UserStore};

/// In-memory implementation of UserStore.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    accounts: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &NewUser) -> Result<()> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(&user.username) {
            return Err(DashError::DuplicateUser { username: user.username.clone() });
        }
        accounts.insert(
            user.username.clone(),
            UserAccount {
                username: user.username.clone(),
                email: user.email.clone(),
                password_digest: hash_password(&user.password),
                role: user.role,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts.get(username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let accounts = self.accounts.read().unwrap();
        let mut users: Vec<UserAccount> = accounts.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

/// In-memory implementation of FacilityStore.
#[derive(Debug, Clone, Default)]
pub struct MemoryFacilityStore {
    facilities: Arc<RwLock<Vec<Facility>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MemoryFacilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FacilityStore for MemoryFacilityStore {
    async fn create_facility(&self, facility: &NewFacility) -> Result<FacilityId> {
        let mut facilities = self.facilities.write().unwrap();
        if facilities
            .iter()
            .any(|f| f.commune == facility.commune && f.name == facility.name)
        {
            return Err(DashError::DuplicateFacility {
                name: facility.name.clone(),
                commune: facility.commune.clone(),
            });
        }

        let mut next_id = self.next_id.write().unwrap();
        *next_id += 1;
        let id = FacilityId(*next_id);

        facilities.push(Facility {
            id,
            province: facility.province.clone(),
            commune: facility.commune.clone(),
            kind: facility.kind.clone(),
            name: facility.name.clone(),
            latitude: facility.latitude,
            longitude: facility.longitude,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_facilities(&self) -> Result<Vec<Facility>> {
        let facilities = self.facilities.read().unwrap();
        let mut all = facilities.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodash_core::models::Role;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.org", username),
            password: "s3cret".to_string(),
            role: Role::Client,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_first_retrievable() {
        let store = MemoryUserStore::new();
        store.create_user(&new_user("aicha")).await.unwrap();

        let mut second = new_user("aicha");
        second.email = "other@example.org".to_string();
        let err = store.create_user(&second).await.unwrap_err();
        assert!(matches!(err, DashError::DuplicateUser { .. }));

        // First account untouched.
        let stored = store.get_user("aicha").await.unwrap().unwrap();
        assert_eq!(stored.email, "aicha@example.org");
    }

    #[tokio::test]
    async fn test_verify_user_roundtrip() {
        let store = MemoryUserStore::new();
        store.create_user(&new_user("aicha")).await.unwrap();

        assert_eq!(store.verify_user("aicha", "s3cret").await.unwrap(), Some(Role::Client));
        assert_eq!(store.verify_user("aicha", "wrong").await.unwrap(), None);
        assert_eq!(store.verify_user("nobody", "s3cret").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_facility_rejected() {
        let store = MemoryFacilityStore::new();
        let facility = NewFacility {
            province: "Driouch".to_string(),
            commune: "Midar".to_string(),
            kind: "ecole".to_string(),
            name: "Ecole Al Amal".to_string(),
            latitude: 34.95,
            longitude: -3.53,
        };

        store.create_facility(&facility).await.unwrap();
        let err = store.create_facility(&facility).await.unwrap_err();
        assert!(matches!(err, DashError::DuplicateFacility { .. }));

        // Same name in another commune is a distinct facility.
        let mut other = facility.clone();
        other.commune = "Ben Taieb".to_string();
        store.create_facility(&other).await.unwrap();

        assert_eq!(store.list_facilities().await.unwrap().len(), 2);
    }
}
