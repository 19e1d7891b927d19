//! Storage ports.

use async_trait::async_trait;
use geodash_core::error::Result;
use geodash_core::models::{Facility, FacilityId, NewFacility, NewUser, Role, UserAccount};

use crate::auth::digest_matches;

/// Port for the account table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert an account. Duplicate usernames are rejected with
    /// `DashError::DuplicateUser`, leaving the existing account intact.
    async fn create_user(&self, user: &NewUser) -> Result<()>;

    /// Look up an account by username.
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>>;

    /// All accounts, for the admin listing.
    async fn list_users(&self) -> Result<Vec<UserAccount>>;

    /// Check credentials and return the role on success. This is the login
    /// flow's single entry point.
    async fn verify_user(&self, username: &str, password: &str) -> Result<Option<Role>> {
        Ok(self
            .get_user(username)
            .await?
            .filter(|account| digest_matches(password, &account.password_digest))
            .map(|account| account.role))
    }
}

/// Port for the facility table.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Insert a facility record. A record with the same commune and name is
    /// rejected with `DashError::DuplicateFacility`.
    async fn create_facility(&self, facility: &NewFacility) -> Result<FacilityId>;

    /// All facility records, newest first.
    async fn list_facilities(&self) -> Result<Vec<Facility>>;
}
