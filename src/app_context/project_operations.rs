use anyhow::{anyhow, Result};
use tracing::warn;

use super::{AppContext, ProjectUpdate};
use crate::entities::{Project, ProjectDomain, Scenario, UserStory, Wireframe};
use crate::gateway::ProjectPatch;

impl AppContext {
    // ----- Project helpers -------------------------------------------------

    /// Most recently updated first.
    pub fn list_projects(&self) -> Vec<Project> {
        let mut projects = self.store().list_all::<Project>();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        projects
    }

    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.store().get::<Project>(id)
    }

    pub fn create_project(
        &self,
        title: impl Into<String>,
        domain: &str,
        objective: impl Into<String>,
    ) -> Result<Project> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(anyhow!("Project title cannot be empty"));
        }

        let project = Project::new(title, ProjectDomain::parse(domain), objective);
        Ok(self.store().insert(project)?)
    }

    pub async fn update_project(&self, id: &str, update: ProjectUpdate) -> Result<Project> {
        let patch = ProjectPatch {
            title: update.title.clone(),
            objective: update.objective.clone(),
            scope_notes: update.scope_notes.clone(),
            flow_notes: update.flow_notes.clone(),
            additional_info: update.additional_info.clone(),
        };

        let updated = self
            .store()
            .update::<Project, _>(id, |project| {
                if let Some(title) = update.title {
                    project.title = title;
                }
                if let Some(objective) = update.objective {
                    project.objective = objective;
                }
                if let Some(scope_notes) = update.scope_notes {
                    project.scope_notes = scope_notes;
                }
                if let Some(flow_notes) = update.flow_notes {
                    project.flow_notes = flow_notes;
                }
                if let Some(additional_info) = update.additional_info {
                    project.additional_info = additional_info;
                }
                if let Some(users_data) = update.users_data {
                    project.users_data = users_data;
                }
                if let Some(features_data) = update.features_data {
                    project.features_data = features_data;
                }
            })?
            .ok_or_else(|| anyhow!("Project {} not found", id))?;

        // best-effort remote update; local state is already durable
        if let Some(token) = self.auth().token() {
            if !patch.is_empty() {
                match self.gateway().update_project(id, &patch, &token).await {
                    Ok(()) => {}
                    Err(err) if err.is_session_expired() => {
                        self.auth().sign_out();
                    }
                    Err(err) => warn!("remote update of project {} failed: {}", id, err),
                }
            }
        }

        Ok(updated)
    }

    /// Delete a project and cascade to its dependent collections
    /// locally. The remote delete is best-effort; the backend owns its
    /// own cascade.
    pub async fn delete_project(&self, id: &str) -> Result<()> {
        if self.store().get::<Project>(id).is_none() {
            return Err(anyhow!("Project {} not found", id));
        }

        if let Some(token) = self.auth().token() {
            match self.gateway().delete_project(id, &token).await {
                Ok(()) => {}
                Err(err) if err.is_session_expired() => {
                    self.auth().sign_out();
                }
                Err(err) => warn!("remote delete of project {} failed: {}", id, err),
            }
        }

        self.store().delete::<Project>(id)?;
        self.store().delete_by_project::<UserStory>(id)?;
        self.store().delete_by_project::<Wireframe>(id)?;
        self.store().delete_by_project::<Scenario>(id)?;
        Ok(())
    }
}
