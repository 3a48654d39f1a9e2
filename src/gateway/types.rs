use serde::{Deserialize, Serialize};

use crate::entities::{Project, Scenario, UserStory, Wireframe};

/// Anonymous generation requests carry a bounded sample of existing
/// artifacts so payload size stays predictable.
pub const MAX_STORY_SAMPLE: usize = 3;
pub const MAX_WIREFRAME_SAMPLE: usize = 2;

/// `GET /projects/{id}/{collection}/` response envelope.
#[derive(Debug, Deserialize)]
pub struct CollectionEnvelope<E> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<CollectionData<E>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData<E> {
    #[serde(default = "Vec::new")]
    pub items: Vec<E>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub project_title: Option<String>,
}

/// `POST /projects/{id}/generate-{collection}/` response envelope.
#[derive(Debug, Deserialize)]
pub struct GenerateEnvelope<E> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<GeneratedData<E>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedData<E> {
    #[serde(default = "Vec::new")]
    pub generated: Vec<E>,
    #[serde(default)]
    pub count: usize,
}

/// Generic `{success, error}` acknowledgement for writes.
#[derive(Debug, Deserialize)]
pub struct AckEnvelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Single-entity `{success, data, error}` envelope (project GET).
#[derive(Debug, Deserialize)]
pub struct ItemEnvelope<E> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<E>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the sync core reads out of a collection fetch.
#[derive(Debug, Clone)]
pub struct FetchedCollection<E> {
    pub items: Vec<E>,
    pub count: usize,
    pub project_title: Option<String>,
}

/// Body for `POST /local-projects/generate-{collection}/`. The server
/// has no database record for an anonymous project, so the full project
/// payload travels with the request, plus capped artifact samples.
#[derive(Debug, Serialize)]
pub struct AnonymousGenerationRequest {
    pub project_data: Project,
    pub project_id: String,
    pub user_stories: Vec<UserStory>,
    pub wireframes: Vec<Wireframe>,
}

impl AnonymousGenerationRequest {
    pub fn for_project(
        project: &Project,
        user_stories: &[UserStory],
        wireframes: &[Wireframe],
    ) -> Self {
        Self {
            project_id: project.id.clone(),
            project_data: project.clone(),
            user_stories: user_stories.iter().take(MAX_STORY_SAMPLE).cloned().collect(),
            wireframes: wireframes
                .iter()
                .take(MAX_WIREFRAME_SAMPLE)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnonymousStoriesResponse {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub stories: Vec<UserStory>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnonymousScenariosResponse {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Partial project update sent with `PUT /projects/{id}/`. `None`
/// fields are omitted from the body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl ProjectPatch {
    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.objective.is_none()
            && self.scope_notes.is_none()
            && self.flow_notes.is_none()
            && self.additional_info.is_none()
    }
}
