use std::sync::Arc;

use crate::core::Config;
use crate::gateway::Gateway;
use crate::intake::SessionStore;
use crate::lifecycle::{GuardStore, PendingResolutions};
use crate::store::ComplaintRepository;

/// Shared application state.
///
/// One instance per process, cloned cheaply via `Arc` into every handler
/// and background loop. Holds the immutable config, the gateway and
/// repository collaborators, and the in-memory coordination maps
/// (intake sessions, duplicate-action guards, pending resolution prompts).
///
/// All of the maps are process-local; a restart loses draft forms and
/// re-arms the guards, the record store stays authoritative.
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn Gateway>,
    pub repo: ComplaintRepository,
    pub sessions: SessionStore,
    pub guards: GuardStore,
    pub pending_resolutions: PendingResolutions,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>, repo: ComplaintRepository) -> Arc<Self> {
        Arc::new(Self {
            config,
            gateway,
            repo,
            sessions: SessionStore::new(),
            guards: GuardStore::new(),
            pending_resolutions: PendingResolutions::new(),
        })
    }
}
