//! Shared application state and the session table.

use geodash_core::config::PortalConfig;
use geodash_core::models::{MetricCatalog, ReferenceMeans, Role};
use geodash_core::session::SessionContext;
use geodash_store::ports::{FacilityStore, UserStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "geodash_session";

#[derive(Clone)]
pub struct AppState {
    pub portal: PortalConfig,
    pub catalog: MetricCatalog,
    pub means: ReferenceMeans,
    pub users: Arc<dyn UserStore>,
    pub facilities: Arc<dyn FacilityStore>,

    /// Live sessions by token. Each session owns its dataset cache.
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SessionContext>>>>,
}

impl AppState {
    pub fn new(
        portal: PortalConfig,
        catalog: MetricCatalog,
        means: ReferenceMeans,
        users: Arc<dyn UserStore>,
        facilities: Arc<dyn FacilityStore>,
    ) -> Self {
        Self {
            portal,
            catalog,
            means,
            users,
            facilities,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a session for a verified login and return its token.
    pub fn create_session(&self, username: &str, role: Role) -> Uuid {
        let token = Uuid::new_v4();
        let context = Arc::new(SessionContext::new(username, role));
        self.sessions.write().unwrap().insert(token, context);
        tracing::info!(username = %username, role = %role, "Session opened");
        token
    }

    pub fn session(&self, token: Uuid) -> Option<Arc<SessionContext>> {
        self.sessions.read().unwrap().get(&token).cloned()
    }

    pub fn drop_session(&self, token: Uuid) {
        if let Some(context) = self.sessions.write().unwrap().remove(&token) {
            tracing::info!(username = %context.username, "Session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodash_core::config::{PortalConfig, ViewConfig};
    use geodash_store::memory::{MemoryFacilityStore, MemoryUserStore};
    use std::path::PathBuf;

    fn test_state() -> AppState {
        let portal = PortalConfig {
            data_dir: PathBuf::from("data"),
            database: PathBuf::from("test.db"),
            port: 0,
            catalog_file: "codes.csv".to_string(),
            means_file: "means.csv".to_string(),
            views: vec![ViewConfig {
                slug: "social".to_string(),
                title_fr: "Social".to_string(),
                title_ar: None,
                dataset: "communes.geojson".to_string(),
                name_column: "commune_fr".to_string(),
                codes: Vec::new(),
                aliases: Default::default(),
                overlays: Vec::new(),
                ramp: Default::default(),
                center: [34.95, -3.39],
                zoom: 9,
                click_select: true,
            }],
        };
        AppState::new(
            portal,
            MetricCatalog::default(),
            ReferenceMeans::default(),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryFacilityStore::new()),
        )
    }

    #[test]
    fn test_session_lifecycle() {
        let state = test_state();
        let token = state.create_session("aicha", Role::Client);

        let session = state.session(token).unwrap();
        assert_eq!(session.username, "aicha");
        assert_eq!(session.role, Role::Client);

        state.drop_session(token);
        assert!(state.session(token).is_none());
    }

    #[test]
    fn test_unknown_token_is_none() {
        let state = test_state();
        assert!(state.session(Uuid::new_v4()).is_none());
    }
}
