use super::admin::AdminSecret;
use super::config::ServerConfig;
use crate::room_runtime::RoomRegistry;
use crate::visits::VisitStore;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub visits: VisitStore,
    pub admin_secret: Option<AdminSecret>,
}

impl AppState {
    pub fn new(config: &ServerConfig, visits: VisitStore) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new(config.game)),
            visits,
            admin_secret: config.admin_password.as_deref().map(AdminSecret::new),
        }
    }
}
