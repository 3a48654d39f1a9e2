use anyhow::Result;

use super::{AppContext, CollectionSnapshot, ScenarioUpdate};
use crate::entities::Scenario;
use crate::generation::GenerationOutcome;
use crate::sync::{CancelToken, PushReport, SyncOutcome};

impl AppContext {
    // ----- Scenario helpers ------------------------------------------------

    pub async fn scenarios_for_project(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot<Scenario>> {
        let outcome = self
            .sync()
            .auto_sync_scenarios_on_entry(project_id, cancel)
            .await?;
        Ok(CollectionSnapshot {
            items: self.store().list_by_project(project_id),
            outcome,
        })
    }

    pub fn scenarios_for_story(&self, project_id: &str, story_id: &str) -> Vec<Scenario> {
        self.store()
            .list_by_project::<Scenario>(project_id)
            .into_iter()
            .filter(|s| s.user_story_id.as_deref() == Some(story_id))
            .collect()
    }

    /// Scenarios with no owning user story.
    pub fn orphaned_scenarios(&self, project_id: &str) -> Vec<Scenario> {
        self.store()
            .list_by_project::<Scenario>(project_id)
            .into_iter()
            .filter(Scenario::is_orphaned)
            .collect()
    }

    pub async fn generate_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<GenerationOutcome> {
        Ok(self
            .generation()
            .generate_scenarios(project_id, cancel)
            .await?)
    }

    pub fn get_scenario(&self, id: &str) -> Option<Scenario> {
        self.store().get::<Scenario>(id)
    }

    pub fn update_scenario(&self, id: &str, update: ScenarioUpdate) -> Result<Option<Scenario>> {
        Ok(self.store().update::<Scenario, _>(id, |scenario| {
            if let Some(title) = update.title {
                scenario.title = title;
            }
            if let Some(description) = update.description {
                scenario.description = description;
            }
            if let Some(scenario_type) = update.scenario_type {
                scenario.scenario_type = scenario_type;
            }
            if let Some(steps) = update.steps {
                scenario.steps = steps;
                scenario.revalidate();
            }
            if let Some(status) = update.status {
                scenario.status = status;
            }
            if let Some(user_story_id) = update.user_story_id {
                scenario.user_story_id = user_story_id;
            }
        })?)
    }

    pub fn delete_scenario(&self, id: &str) -> Result<bool> {
        Ok(self.store().delete::<Scenario>(id)?)
    }

    pub async fn sync_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<SyncOutcome> {
        Ok(self
            .sync()
            .two_way_sync_scenarios(project_id, cancel)
            .await?)
    }

    pub async fn push_scenarios(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<PushReport> {
        Ok(self.sync().push_scenarios(project_id, cancel).await?)
    }
}
