use anyhow::{anyhow, Result};

use super::{AppContext, CollectionSnapshot, StoryUpdate};
use crate::entities::UserStory;
use crate::generation::GenerationOutcome;
use crate::sync::{CancelToken, PushReport, SyncOutcome};

impl AppContext {
    // ----- User story helpers ----------------------------------------------

    /// Entry point for the user-story page: reconcile with the remote
    /// when possible, then hand back the local snapshot. The snapshot is
    /// readable regardless of how the sync went.
    pub async fn user_stories_for_project(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot<UserStory>> {
        let outcome = self
            .sync()
            .auto_sync_user_stories_on_entry(project_id, cancel)
            .await?;
        Ok(CollectionSnapshot {
            items: self.store().list_by_project(project_id),
            outcome,
        })
    }

    /// Run the generation chain for user stories; the result is already
    /// persisted when this returns.
    pub async fn generate_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<GenerationOutcome> {
        Ok(self
            .generation()
            .generate_user_stories(project_id, cancel)
            .await?)
    }

    pub fn get_user_story(&self, id: &str) -> Option<UserStory> {
        self.store().get::<UserStory>(id)
    }

    pub fn update_user_story(&self, id: &str, update: StoryUpdate) -> Result<Option<UserStory>> {
        for (field, value) in [
            ("role", &update.role),
            ("action", &update.action),
            ("benefit", &update.benefit),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(anyhow!("Story {} cannot be empty", field));
                }
            }
        }

        Ok(self.store().update::<UserStory, _>(id, |story| {
            let mut clause_changed = false;
            if let Some(role) = update.role {
                story.role = role;
                clause_changed = true;
            }
            if let Some(action) = update.action {
                story.action = action;
                clause_changed = true;
            }
            if let Some(benefit) = update.benefit {
                story.benefit = benefit;
                clause_changed = true;
            }
            if let Some(feature) = update.feature {
                story.feature = feature;
            }
            if let Some(acceptance_criteria) = update.acceptance_criteria {
                story.acceptance_criteria = acceptance_criteria;
            }
            if let Some(priority) = update.priority {
                story.priority = priority;
            }
            if let Some(story_points) = update.story_points {
                story.story_points = story_points;
            }
            if let Some(status) = update.status {
                story.status = status;
            }
            if clause_changed {
                story.iteration += 1;
                story.refresh_story_text();
            }
        })?)
    }

    pub fn delete_user_story(&self, id: &str) -> Result<bool> {
        Ok(self.store().delete::<UserStory>(id)?)
    }

    /// Explicit user-triggered two-way reconciliation.
    pub async fn sync_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<SyncOutcome> {
        Ok(self
            .sync()
            .two_way_sync_user_stories(project_id, cancel)
            .await?)
    }

    pub async fn push_user_stories(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<PushReport> {
        Ok(self.sync().push_user_stories(project_id, cancel).await?)
    }
}
