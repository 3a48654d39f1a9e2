use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, StoredEntity};

/// A generated page wireframe. Read-only for the sync core: wireframes
/// are pulled from the remote and consumed when building
/// scenario-to-page associations, never pushed or edited locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wireframe {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub page_name: String,
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wireframe {
    pub fn new(
        project_id: impl Into<String>,
        page_name: impl Into<String>,
        page_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            project_id: project_id.into(),
            page_name: page_name.into(),
            page_type: page_type.into(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl StoredEntity for Wireframe {
    const COLLECTION: Collection = Collection::Wireframes;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
