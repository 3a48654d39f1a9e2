use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::auth::{AuthSession, AuthState};
use crate::config::Config;
use crate::entities::{ProjectFeature, ProjectUserProfile, ScenarioStatus, ScenarioType, StoryPriority, StoryStatus};
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::generation::GenerationService;
use crate::store::LocalStore;
use crate::sync::{SyncCoordinator, SyncMode, SyncOutcome};

mod project_operations;
mod scenario_operations;
mod story_operations;
mod wireframe_operations;

/// Shared application context exposing the sync core to page
/// controllers. Constructed once at process start and passed by
/// reference; there are no module-level singletons.
#[derive(Clone)]
pub struct AppContext {
    config: Config,
    store: Arc<LocalStore>,
    gateway: Arc<dyn RemoteGateway>,
    auth: Arc<AuthState>,
    sync: Arc<SyncCoordinator>,
    generation: Arc<GenerationService>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(&config));
        Self::with_gateway(config, gateway)
    }

    /// Construct with a caller-supplied gateway; tests substitute an
    /// in-memory one here.
    pub fn with_gateway(config: Config, gateway: Arc<dyn RemoteGateway>) -> Result<Self> {
        let store = Arc::new(LocalStore::open(config.data_dir.clone())?);
        let auth = Arc::new(AuthState::load(&config.data_dir));
        let sync = Arc::new(SyncCoordinator::new(
            store.clone(),
            gateway.clone(),
            auth.clone(),
        ));
        let generation = Arc::new(GenerationService::new(
            store.clone(),
            gateway.clone(),
            auth.clone(),
        ));

        Ok(Self {
            config,
            store,
            gateway,
            auth,
            sync,
            generation,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<dyn RemoteGateway> {
        &self.gateway
    }

    pub fn auth(&self) -> &Arc<AuthState> {
        &self.auth
    }

    pub fn sync(&self) -> &Arc<SyncCoordinator> {
        &self.sync
    }

    pub fn generation(&self) -> &Arc<GenerationService> {
        &self.generation
    }

    // ----- Auth convenience --------------------------------------------

    pub fn sign_in(&self, token: impl Into<String>, account: Option<String>) -> Result<AuthSession> {
        Ok(self.auth.sign_in(token, account)?)
    }

    pub fn sign_out(&self) -> bool {
        self.auth.sign_out()
    }

    pub fn operating_mode(&self) -> SyncMode {
        self.generation.operating_mode()
    }
}

// ----- Public types -----

/// A local snapshot of one collection plus the sync outcome that
/// produced it; what a page controller renders from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot<E> {
    pub items: Vec<E>,
    pub outcome: SyncOutcome,
}

/// Partial project update; `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub objective: Option<String>,
    pub scope_notes: Option<String>,
    pub flow_notes: Option<String>,
    pub additional_info: Option<String>,
    pub users_data: Option<Vec<ProjectUserProfile>>,
    pub features_data: Option<Vec<ProjectFeature>>,
}

impl ProjectUpdate {
    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// Partial user-story update. Changing any of role/action/benefit
/// re-derives `story_text`.
#[derive(Clone, Debug, Default)]
pub struct StoryUpdate {
    pub role: Option<String>,
    pub action: Option<String>,
    pub benefit: Option<String>,
    pub feature: Option<String>,
    pub acceptance_criteria: Option<Vec<String>>,
    pub priority: Option<StoryPriority>,
    pub story_points: Option<u8>,
    pub status: Option<StoryStatus>,
}

/// Partial scenario update. Changing the steps recomputes the
/// structural-validity flag; the scenario type is normalized.
#[derive(Clone, Debug, Default)]
pub struct ScenarioUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scenario_type: Option<ScenarioType>,
    pub steps: Option<Vec<String>>,
    pub status: Option<ScenarioStatus>,
    pub user_story_id: Option<Option<String>>,
}
