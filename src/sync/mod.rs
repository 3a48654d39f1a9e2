//! Sync Coordinator: reconciles the Local Store with the Remote Gateway
//! for one project's collection at a time, idempotently and without data
//! loss.
//!
//! Policy summary:
//! - unauthenticated → offline outcome, no network call
//! - remote non-empty + local empty → pull, preserving remote ids
//! - local non-empty + remote empty → local kept, flagged `needs_sync`
//! - both non-empty → status badge only; merging is reserved for the
//!   explicit [`SyncCoordinator::two_way_sync_user_stories`] family
//! - network-class failures degrade to an offline outcome; a 401 clears
//!   the cached session and surfaces [`SyncError::SessionExpired`]

mod cancel;
mod guard;

pub use cancel::CancelToken;
pub use guard::{InFlightGuard, InFlightPermit};

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthState;
use crate::entities::{Scenario, UserStory, Wireframe};
use crate::errors::{GatewayError, GatewayResult, SyncError, SyncResult};
use crate::gateway::{FetchedCollection, RemoteGateway};
use crate::store::{LocalStore, StoredEntity};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Online,
    Offline,
}

/// Status badge surfaced to the UI instead of blocking dialogs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Offline,
    Empty,
    InSync,
    NeedsSync,
    SyncedFromDb,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub collection: String,
    pub mode: SyncMode,
    pub status: SyncStatus,
    pub synced_from_db: bool,
    pub pulled_count: usize,
    pub pushed_count: usize,
    pub local_count: usize,
    pub remote_count: usize,
    pub needs_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncOutcome {
    fn offline(collection: &str, local_count: usize) -> Self {
        Self {
            collection: collection.to_string(),
            mode: SyncMode::Offline,
            status: SyncStatus::Offline,
            synced_from_db: false,
            pulled_count: 0,
            pushed_count: 0,
            local_count,
            remote_count: 0,
            needs_sync: false,
            message: None,
        }
    }

    fn offline_degraded(collection: &str, local_count: usize, message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::offline(collection, local_count)
        }
    }

    fn online(collection: &str, status: SyncStatus) -> Self {
        Self {
            mode: SyncMode::Online,
            status,
            ..Self::offline(collection, 0)
        }
    }
}

/// Continue-on-error upload report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReport {
    pub success: bool,
    pub synced_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub message: String,
}

// ----- Collection ports ------------------------------------------------

/// Per-collection adapter so reconciliation policy is written once.
#[async_trait]
trait CollectionPort: Send + Sync {
    type Entity: StoredEntity;

    /// Wireframes are read-only for the sync core.
    const SUPPORTS_PUSH: bool = true;

    async fn fetch(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Self::Entity>>;

    async fn push(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        entity: &Self::Entity,
        token: &str,
    ) -> GatewayResult<()>;
}

struct StoryPort;

#[async_trait]
impl CollectionPort for StoryPort {
    type Entity = UserStory;

    async fn fetch(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<UserStory>> {
        gateway.fetch_user_stories(project_id, token).await
    }

    async fn push(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        entity: &UserStory,
        token: &str,
    ) -> GatewayResult<()> {
        gateway.push_user_story(project_id, entity, token).await
    }
}

struct ScenarioPort;

#[async_trait]
impl CollectionPort for ScenarioPort {
    type Entity = Scenario;

    async fn fetch(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Scenario>> {
        gateway.fetch_scenarios(project_id, token).await
    }

    async fn push(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        entity: &Scenario,
        token: &str,
    ) -> GatewayResult<()> {
        gateway.push_scenario(project_id, entity, token).await
    }
}

struct WireframePort;

#[async_trait]
impl CollectionPort for WireframePort {
    type Entity = Wireframe;

    const SUPPORTS_PUSH: bool = false;

    async fn fetch(
        &self,
        gateway: &dyn RemoteGateway,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Wireframe>> {
        gateway.fetch_wireframes(project_id, token).await
    }

    async fn push(
        &self,
        _gateway: &dyn RemoteGateway,
        _project_id: &str,
        _entity: &Wireframe,
        _token: &str,
    ) -> GatewayResult<()> {
        Ok(())
    }
}

// ----- Coordinator -----------------------------------------------------

pub struct SyncCoordinator {
    store: Arc<LocalStore>,
    gateway: Arc<dyn RemoteGateway>,
    auth: Arc<AuthState>,
    in_flight: InFlightGuard,
}

impl SyncCoordinator {
    pub fn new(store: Arc<LocalStore>, gateway: Arc<dyn RemoteGateway>, auth: Arc<AuthState>) -> Self {
        Self {
            store,
            gateway,
            auth,
            in_flight: InFlightGuard::default(),
        }
    }

    pub fn is_sync_in_flight(&self, project_id: &str) -> bool {
        self.in_flight.is_busy(project_id)
    }

    // ----- Public per-collection surface -------------------------------

    pub async fn auto_sync_user_stories_on_entry(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.auto_sync_on_entry(&StoryPort, project_id, cancel).await
    }

    pub async fn auto_sync_scenarios_on_entry(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.auto_sync_on_entry(&ScenarioPort, project_id, cancel).await
    }

    pub async fn auto_sync_wireframes_on_entry(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.auto_sync_on_entry(&WireframePort, project_id, cancel).await
    }

    pub async fn two_way_sync_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.two_way_sync(&StoryPort, project_id, cancel).await
    }

    pub async fn two_way_sync_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.two_way_sync(&ScenarioPort, project_id, cancel).await
    }

    pub async fn push_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<PushReport> {
        self.push_local_to_remote(&StoryPort, project_id, cancel).await
    }

    pub async fn push_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<PushReport> {
        self.push_local_to_remote(&ScenarioPort, project_id, cancel).await
    }

    pub async fn pull_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.pull_remote_to_local(&StoryPort, project_id, cancel).await
    }

    pub async fn pull_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.pull_remote_to_local(&ScenarioPort, project_id, cancel).await
    }

    pub async fn pull_wireframes(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        self.pull_remote_to_local(&WireframePort, project_id, cancel).await
    }

    // ----- Policy ------------------------------------------------------

    async fn auto_sync_on_entry<P: CollectionPort>(
        &self,
        port: &P,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        let name = P::Entity::COLLECTION.display_name();
        let local_count = self.store.count_for_project::<P::Entity>(project_id);

        let Some(token) = self.auth.token() else {
            debug!("{} sync skipped for {}: not authenticated", name, project_id);
            return Ok(SyncOutcome::offline(name, local_count));
        };
        let _permit = self
            .in_flight
            .try_begin(project_id)
            .ok_or_else(|| SyncError::SyncInProgress(project_id.to_string()))?;

        let remote = match port.fetch(self.gateway.as_ref(), project_id, &token).await {
            Ok(remote) => remote,
            Err(err) => return self.degrade(err, name, local_count),
        };
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let local: Vec<P::Entity> = self.store.list_by_project(project_id);
        let remote_count = remote.items.len();

        if local.is_empty() && remote_count > 0 {
            let mut pulled = 0;
            for entity in remote.items {
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }
                self.store.insert(entity)?;
                pulled += 1;
            }
            info!("pulled {} {} from remote for {}", pulled, name, project_id);
            return Ok(SyncOutcome {
                synced_from_db: true,
                pulled_count: pulled,
                local_count: pulled,
                remote_count,
                ..SyncOutcome::online(name, SyncStatus::SyncedFromDb)
            });
        }

        if !local.is_empty() && remote_count == 0 {
            // never overwrite a populated cache with an empty remote
            let needs_sync = P::SUPPORTS_PUSH;
            debug!(
                "{} for {}: {} local, remote empty, flagged for push",
                name,
                project_id,
                local.len()
            );
            return Ok(SyncOutcome {
                local_count: local.len(),
                needs_sync,
                ..SyncOutcome::online(
                    name,
                    if needs_sync { SyncStatus::NeedsSync } else { SyncStatus::InSync },
                )
            });
        }

        if local.is_empty() && remote_count == 0 {
            return Ok(SyncOutcome::online(name, SyncStatus::Empty));
        }

        // both sides populated: report a badge from counts only; merging
        // is reserved for the explicit two-way sync
        let in_sync = local.len() == remote_count;
        Ok(SyncOutcome {
            local_count: local.len(),
            remote_count,
            needs_sync: !in_sync && P::SUPPORTS_PUSH,
            ..SyncOutcome::online(
                name,
                if in_sync { SyncStatus::InSync } else { SyncStatus::NeedsSync },
            )
        })
    }

    async fn two_way_sync<P: CollectionPort>(
        &self,
        port: &P,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        let name = P::Entity::COLLECTION.display_name();
        let local_count = self.store.count_for_project::<P::Entity>(project_id);

        let Some(token) = self.auth.token() else {
            return Ok(SyncOutcome::offline(name, local_count));
        };
        let _permit = self
            .in_flight
            .try_begin(project_id)
            .ok_or_else(|| SyncError::SyncInProgress(project_id.to_string()))?;

        let remote = match port.fetch(self.gateway.as_ref(), project_id, &token).await {
            Ok(remote) => remote,
            Err(err) => return self.degrade(err, name, local_count),
        };
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let local: Vec<P::Entity> = self.store.list_by_project(project_id);
        let remote_ids: HashSet<String> =
            remote.items.iter().map(|e| e.id().to_string()).collect();

        // pull before push, so stale local entities cannot shadow what
        // the remote already corrected
        let mut pulled = 0;
        let mut replaced = 0;
        let mut local_newer = 0;
        for remote_entity in &remote.items {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            match local.iter().find(|l| l.id() == remote_entity.id()) {
                None => {
                    self.store.insert(remote_entity.clone())?;
                    pulled += 1;
                }
                // same id on both sides: the remote copy wins only when
                // it is strictly newer; a newer local edit is kept and
                // stays flagged for sync
                Some(local_entity) => {
                    if remote_entity.updated_at() > local_entity.updated_at() {
                        self.store.replace(remote_entity.clone())?;
                        replaced += 1;
                    } else if local_entity.updated_at() > remote_entity.updated_at() {
                        local_newer += 1;
                    }
                }
            }
        }

        let mut pushed = 0;
        let mut failed = 0;
        if P::SUPPORTS_PUSH {
            for local_entity in &local {
                if remote_ids.contains(local_entity.id()) {
                    continue;
                }
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }
                match port
                    .push(self.gateway.as_ref(), project_id, local_entity, &token)
                    .await
                {
                    Ok(()) => pushed += 1,
                    Err(err) if err.is_session_expired() => {
                        self.auth.sign_out();
                        return Err(SyncError::SessionExpired);
                    }
                    Err(err) => {
                        warn!("push of {} {} failed: {}", name, local_entity.id(), err);
                        failed += 1;
                    }
                }
            }
        }

        let needs_sync = failed > 0 || local_newer > 0;
        let final_count = self.store.count_for_project::<P::Entity>(project_id);
        info!(
            "two-way sync of {} for {}: {} pulled, {} replaced, {} pushed, {} failed",
            name, project_id, pulled, replaced, pushed, failed
        );
        Ok(SyncOutcome {
            synced_from_db: pulled + replaced > 0,
            pulled_count: pulled + replaced,
            pushed_count: pushed,
            local_count: final_count,
            remote_count: remote.items.len(),
            needs_sync,
            message: (failed > 0).then(|| format!("{} uploads failed", failed)),
            ..SyncOutcome::online(
                name,
                if needs_sync { SyncStatus::NeedsSync } else { SyncStatus::InSync },
            )
        })
    }

    async fn push_local_to_remote<P: CollectionPort>(
        &self,
        port: &P,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<PushReport> {
        let name = P::Entity::COLLECTION.display_name();

        let Some(token) = self.auth.token() else {
            return Ok(PushReport {
                success: false,
                synced_count: 0,
                skipped_count: 0,
                failed_count: 0,
                message: "not authenticated, nothing uploaded".to_string(),
            });
        };
        let _permit = self
            .in_flight
            .try_begin(project_id)
            .ok_or_else(|| SyncError::SyncInProgress(project_id.to_string()))?;

        // fetch remote ids first so entities the remote already knows
        // are skipped instead of re-created
        let remote = match port.fetch(self.gateway.as_ref(), project_id, &token).await {
            Ok(remote) => remote,
            Err(err) if err.is_session_expired() => {
                self.auth.sign_out();
                return Err(SyncError::SessionExpired);
            }
            Err(err) => {
                warn!("{} push skipped, remote unavailable: {}", name, err);
                return Ok(PushReport {
                    success: false,
                    synced_count: 0,
                    skipped_count: 0,
                    failed_count: 0,
                    message: format!("remote unavailable: {}", err),
                });
            }
        };
        let remote_ids: HashSet<String> =
            remote.items.iter().map(|e| e.id().to_string()).collect();

        let local: Vec<P::Entity> = self.store.list_by_project(project_id);
        let mut synced_count = 0;
        let mut skipped_count = 0;
        let mut failed_count = 0;

        for entity in &local {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            if remote_ids.contains(entity.id()) {
                skipped_count += 1;
                continue;
            }
            match port
                .push(self.gateway.as_ref(), project_id, entity, &token)
                .await
            {
                Ok(()) => synced_count += 1,
                Err(err) if err.is_session_expired() => {
                    self.auth.sign_out();
                    return Err(SyncError::SessionExpired);
                }
                Err(err) => {
                    warn!("push of {} {} failed: {}", name, entity.id(), err);
                    failed_count += 1;
                }
            }
        }

        Ok(PushReport {
            success: failed_count == 0,
            synced_count,
            skipped_count,
            failed_count,
            message: format!(
                "{} uploaded, {} already synced, {} failed",
                synced_count, skipped_count, failed_count
            ),
        })
    }

    async fn pull_remote_to_local<P: CollectionPort>(
        &self,
        port: &P,
        project_id: &str,
        cancel: &CancelToken,
    ) -> SyncResult<SyncOutcome> {
        let name = P::Entity::COLLECTION.display_name();
        let local_count = self.store.count_for_project::<P::Entity>(project_id);

        let Some(token) = self.auth.token() else {
            return Ok(SyncOutcome::offline(name, local_count));
        };
        let _permit = self
            .in_flight
            .try_begin(project_id)
            .ok_or_else(|| SyncError::SyncInProgress(project_id.to_string()))?;

        let remote = match port.fetch(self.gateway.as_ref(), project_id, &token).await {
            Ok(remote) => remote,
            Err(err) => return self.degrade(err, name, local_count),
        };

        // additive only: entities absent from the remote response are
        // never deleted locally
        let mut pulled = 0;
        for entity in remote.items.iter() {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            if !self.store.contains::<P::Entity>(entity.id()) {
                self.store.insert(entity.clone())?;
                pulled += 1;
            }
        }

        let final_count = self.store.count_for_project::<P::Entity>(project_id);
        Ok(SyncOutcome {
            synced_from_db: pulled > 0,
            pulled_count: pulled,
            local_count: final_count,
            remote_count: remote.items.len(),
            ..SyncOutcome::online(
                name,
                if pulled > 0 { SyncStatus::SyncedFromDb } else { SyncStatus::InSync },
            )
        })
    }

    fn degrade(
        &self,
        err: GatewayError,
        collection: &str,
        local_count: usize,
    ) -> SyncResult<SyncOutcome> {
        if err.is_session_expired() {
            self.auth.sign_out();
            return Err(SyncError::SessionExpired);
        }
        warn!("{} sync degraded to offline: {}", collection, err);
        Ok(SyncOutcome::offline_degraded(
            collection,
            local_count,
            err.to_string(),
        ))
    }
}
