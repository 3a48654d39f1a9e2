use anyhow::Result;

use super::{AppContext, CollectionSnapshot};
use crate::entities::Wireframe;
use crate::sync::CancelToken;

impl AppContext {
    // ----- Wireframe helpers -----------------------------------------------

    /// Wireframes are pull-only: the page reconciles downward and reads
    /// the local snapshot; nothing is ever pushed or edited here.
    pub async fn wireframes_for_project(
        &self,
        project_id: &str,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot<Wireframe>> {
        let outcome = self
            .sync()
            .auto_sync_wireframes_on_entry(project_id, cancel)
            .await?;
        Ok(CollectionSnapshot {
            items: self.store().list_by_project(project_id),
            outcome,
        })
    }

    pub fn get_wireframe(&self, id: &str) -> Option<Wireframe> {
        self.store().get::<Wireframe>(id)
    }
}
