//! Mode Selector and the three-tier generation fallback chain.
//!
//! Tier 1: authenticated remote generation (backend LLM, id-keyed).
//! Tier 2: anonymous local-project generation (full payload, capped
//! artifact samples). Tier 3: deterministic domain templates — pure
//! local computation, the system's availability floor. Each tier's
//! failure falls through with a warning; nothing past the top level
//! ever raises because of the network.
//!
//! Regeneration is append-only: entity ids already in the Local Store
//! are skipped, never overwritten, so accepted or approved artifacts
//! survive a "Regenerate" click.

pub mod templates;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::AuthState;
use crate::entities::{Project, Scenario, UserStory, Wireframe};
use crate::errors::{GenerationError, GenerationResult};
use crate::gateway::{AnonymousGenerationRequest, RemoteGateway};
use crate::store::{LocalStore, StoredEntity};
use crate::sync::{CancelToken, SyncMode};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    DatabaseGenerated,
    LocalApiGenerated,
    TemplateFallback,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationSource::DatabaseGenerated => "database_generated",
            GenerationSource::LocalApiGenerated => "local_api_generated",
            GenerationSource::TemplateFallback => "template_fallback",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub source: GenerationSource,
    pub created_count: usize,
    pub skipped_count: usize,
    /// Entities in the Local Store for the project after persisting.
    pub local_count: usize,
}

pub struct GenerationService {
    store: Arc<LocalStore>,
    gateway: Arc<dyn RemoteGateway>,
    auth: Arc<AuthState>,
}

impl GenerationService {
    pub fn new(store: Arc<LocalStore>, gateway: Arc<dyn RemoteGateway>, auth: Arc<AuthState>) -> Self {
        Self {
            store,
            gateway,
            auth,
        }
    }

    /// Online when a cached session exists, offline otherwise.
    pub fn operating_mode(&self) -> SyncMode {
        if self.auth.is_authenticated() {
            SyncMode::Online
        } else {
            SyncMode::Offline
        }
    }

    pub async fn generate_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> GenerationResult<GenerationOutcome> {
        let project = self
            .store
            .get::<Project>(project_id)
            .ok_or_else(|| GenerationError::ProjectNotFound(project_id.to_string()))?;

        // tier 1: authenticated remote generation
        if let Some(token) = self.auth.token() {
            match self.gateway.generate_user_stories(project_id, &token).await {
                Ok(stories) => {
                    return self.persist_batch(project_id, stories, GenerationSource::DatabaseGenerated, cancel)
                }
                Err(err) => {
                    if err.is_session_expired() {
                        self.auth.sign_out();
                    }
                    warn!("remote story generation failed, falling back: {}", err);
                }
            }
        }

        // tier 2: anonymous local-project generation
        let request = self.anonymous_request(&project, project_id);
        match self.gateway.generate_user_stories_anonymous(&request).await {
            Ok(stories) => {
                return self.persist_batch(project_id, stories, GenerationSource::LocalApiGenerated, cancel)
            }
            Err(err) => warn!("anonymous story generation failed, falling back: {}", err),
        }

        // tier 3: deterministic templates, cannot fail
        let stories = templates::template_user_stories(&project);
        info!(
            "template fallback produced {} stories for {}",
            stories.len(),
            project_id
        );
        self.persist_batch(project_id, stories, GenerationSource::TemplateFallback, cancel)
    }

    pub async fn generate_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> GenerationResult<GenerationOutcome> {
        let project = self
            .store
            .get::<Project>(project_id)
            .ok_or_else(|| GenerationError::ProjectNotFound(project_id.to_string()))?;

        if let Some(token) = self.auth.token() {
            match self.gateway.generate_scenarios(project_id, &token).await {
                Ok(scenarios) => {
                    return self.persist_scenarios(project_id, scenarios, GenerationSource::DatabaseGenerated, cancel)
                }
                Err(err) => {
                    if err.is_session_expired() {
                        self.auth.sign_out();
                    }
                    warn!("remote scenario generation failed, falling back: {}", err);
                }
            }
        }

        let request = self.anonymous_request(&project, project_id);
        match self.gateway.generate_scenarios_anonymous(&request).await {
            Ok(scenarios) => {
                return self.persist_scenarios(project_id, scenarios, GenerationSource::LocalApiGenerated, cancel)
            }
            Err(err) => warn!("anonymous scenario generation failed, falling back: {}", err),
        }

        let stories = self.store.list_by_project::<UserStory>(project_id);
        let wireframes = self.store.list_by_project::<Wireframe>(project_id);
        let scenarios = templates::template_scenarios(&project, &stories, &wireframes);
        info!(
            "template fallback produced {} scenarios for {}",
            scenarios.len(),
            project_id
        );
        self.persist_scenarios(project_id, scenarios, GenerationSource::TemplateFallback, cancel)
    }

    fn anonymous_request(&self, project: &Project, project_id: &str) -> AnonymousGenerationRequest {
        let stories = self.store.list_by_project::<UserStory>(project_id);
        let wireframes = self.store.list_by_project::<Wireframe>(project_id);
        AnonymousGenerationRequest::for_project(project, &stories, &wireframes)
    }

    fn persist_scenarios(
        &self,
        project_id: &str,
        mut scenarios: Vec<Scenario>,
        source: GenerationSource,
        cancel: &CancelToken,
    ) -> GenerationResult<GenerationOutcome> {
        for scenario in &mut scenarios {
            scenario.revalidate();
        }
        self.persist_batch(project_id, scenarios, source, cancel)
    }

    /// Append-only persist: ids already present are skipped, never
    /// overwritten.
    fn persist_batch<E: StoredEntity>(
        &self,
        project_id: &str,
        entities: Vec<E>,
        source: GenerationSource,
        cancel: &CancelToken,
    ) -> GenerationResult<GenerationOutcome> {
        let mut created_count = 0;
        let mut skipped_count = 0;

        for entity in entities {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            if !entity.id().is_empty() && self.store.contains::<E>(entity.id()) {
                skipped_count += 1;
                continue;
            }
            self.store.insert(entity)?;
            created_count += 1;
        }

        Ok(GenerationOutcome {
            source,
            created_count,
            skipped_count,
            local_count: self.store.count_for_project::<E>(project_id),
        })
    }
}
