//! Remote Gateway: the contract the sync core holds against the
//! authenticated backend. The backend itself (generation, persistence,
//! auth) is a black box behind this trait; [`HttpGateway`] is the
//! production implementation, tests substitute their own.

mod http;
mod types;

pub use http::HttpGateway;
pub use types::{
    AnonymousGenerationRequest, AnonymousScenariosResponse, AnonymousStoriesResponse,
    CollectionData, CollectionEnvelope, FetchedCollection, GenerateEnvelope, ProjectPatch,
    MAX_STORY_SAMPLE, MAX_WIREFRAME_SAMPLE,
};

use async_trait::async_trait;

use crate::entities::{Project, Scenario, UserStory, Wireframe};
use crate::errors::GatewayResult;

/// One method per backend endpoint. Authenticated calls take the bearer
/// token; the anonymous generation endpoints ship the full project
/// payload instead and need none.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_project(&self, project_id: &str, token: &str) -> GatewayResult<Option<Project>>;

    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
        token: &str,
    ) -> GatewayResult<()>;

    async fn delete_project(&self, project_id: &str, token: &str) -> GatewayResult<()>;

    async fn fetch_user_stories(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<UserStory>>;

    async fn push_user_story(
        &self,
        project_id: &str,
        story: &UserStory,
        token: &str,
    ) -> GatewayResult<()>;

    async fn fetch_scenarios(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Scenario>>;

    async fn push_scenario(
        &self,
        project_id: &str,
        scenario: &Scenario,
        token: &str,
    ) -> GatewayResult<()>;

    async fn fetch_wireframes(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Wireframe>>;

    async fn generate_user_stories(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<Vec<UserStory>>;

    async fn generate_scenarios(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<Vec<Scenario>>;

    async fn generate_user_stories_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<UserStory>>;

    async fn generate_scenarios_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<Scenario>>;
}
