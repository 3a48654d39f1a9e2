use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::entities::{Project, Scenario, UserStory, Wireframe};
use crate::errors::{GatewayError, GatewayResult};
use crate::store::Collection;

use super::types::{
    AckEnvelope, AnonymousGenerationRequest, AnonymousScenariosResponse,
    AnonymousStoriesResponse, CollectionEnvelope, FetchedCollection, GenerateEnvelope,
    ItemEnvelope, ProjectPatch,
};
use super::RemoteGateway;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production gateway speaking the backend's JSON contract over HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.api_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map HTTP status into the gateway taxonomy; 401 is the universal
    /// session-expired signal.
    fn check_status(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
        let status = response.status();
        if status.as_u16() == 401 {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Malformed(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> GatewayResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_body(Self::check_status(response)?).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> GatewayResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Self::parse_body(Self::check_status(response)?).await
    }

    async fn fetch_collection<E: DeserializeOwned>(
        &self,
        collection: Collection,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<E>> {
        let path = format!("projects/{}/{}/", project_id, collection.endpoint_segment());
        let envelope: CollectionEnvelope<E> = self.get_json(&path, token).await?;

        if !envelope.success {
            return Err(malformed(envelope.error, "success flag was false"));
        }
        let data = envelope
            .data
            .ok_or_else(|| GatewayError::Malformed("response data missing".to_string()))?;
        Ok(FetchedCollection {
            items: data.items,
            count: data.count,
            project_title: data.project_title,
        })
    }

    async fn push_entity<E: Serialize + Sync>(
        &self,
        collection: Collection,
        project_id: &str,
        entity: &E,
        token: &str,
    ) -> GatewayResult<()> {
        let path = format!("projects/{}/{}/", project_id, collection.endpoint_segment());
        let ack: AckEnvelope = self.post_json(&path, entity, Some(token)).await?;
        if !ack.success {
            return Err(malformed(ack.error, "create was rejected"));
        }
        Ok(())
    }

    async fn generate_collection<E: DeserializeOwned>(
        &self,
        collection: Collection,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<Vec<E>> {
        let path = format!(
            "projects/{}/generate-{}/",
            project_id,
            collection.endpoint_segment()
        );
        let envelope: GenerateEnvelope<E> =
            self.post_json(&path, &serde_json::json!({}), Some(token)).await?;

        if !envelope.success {
            return Err(malformed(envelope.error, "generation was rejected"));
        }
        let data = envelope
            .data
            .ok_or_else(|| GatewayError::Malformed("generated payload missing".to_string()))?;
        Ok(data.generated)
    }
}

fn malformed(error: Option<String>, fallback: &str) -> GatewayError {
    GatewayError::Malformed(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_project(&self, project_id: &str, token: &str) -> GatewayResult<Option<Project>> {
        let path = format!("projects/{}/", project_id);
        let envelope: ItemEnvelope<Project> = match self.get_json(&path, token).await {
            Ok(envelope) => envelope,
            Err(GatewayError::Status(404)) => return Ok(None),
            Err(err) => return Err(err),
        };

        if !envelope.success {
            return Err(malformed(envelope.error, "success flag was false"));
        }
        Ok(envelope.data)
    }

    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
        token: &str,
    ) -> GatewayResult<()> {
        let path = format!("projects/{}/", project_id);
        let response = self
            .client
            .put(self.url(&path))
            .bearer_auth(token)
            .json(patch)
            .send()
            .await?;
        let ack: AckEnvelope = Self::parse_body(Self::check_status(response)?).await?;
        if !ack.success {
            return Err(malformed(ack.error, "update was rejected"));
        }
        Ok(())
    }

    async fn delete_project(&self, project_id: &str, token: &str) -> GatewayResult<()> {
        let path = format!("projects/{}/", project_id);
        let response = self
            .client
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn fetch_user_stories(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<UserStory>> {
        self.fetch_collection(Collection::UserStories, project_id, token)
            .await
    }

    async fn push_user_story(
        &self,
        project_id: &str,
        story: &UserStory,
        token: &str,
    ) -> GatewayResult<()> {
        self.push_entity(Collection::UserStories, project_id, story, token)
            .await
    }

    async fn fetch_scenarios(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Scenario>> {
        self.fetch_collection(Collection::Scenarios, project_id, token)
            .await
    }

    async fn push_scenario(
        &self,
        project_id: &str,
        scenario: &Scenario,
        token: &str,
    ) -> GatewayResult<()> {
        self.push_entity(Collection::Scenarios, project_id, scenario, token)
            .await
    }

    async fn fetch_wireframes(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<FetchedCollection<Wireframe>> {
        self.fetch_collection(Collection::Wireframes, project_id, token)
            .await
    }

    async fn generate_user_stories(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<Vec<UserStory>> {
        self.generate_collection(Collection::UserStories, project_id, token)
            .await
    }

    async fn generate_scenarios(
        &self,
        project_id: &str,
        token: &str,
    ) -> GatewayResult<Vec<Scenario>> {
        self.generate_collection(Collection::Scenarios, project_id, token)
            .await
    }

    async fn generate_user_stories_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<UserStory>> {
        let response: AnonymousStoriesResponse = self
            .post_json("local-projects/generate-user-stories/", request, None)
            .await?;
        if !response.success {
            return Err(malformed(response.error, "anonymous generation failed"));
        }
        Ok(response.stories)
    }

    async fn generate_scenarios_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<Scenario>> {
        let response: AnonymousScenariosResponse = self
            .post_json("local-projects/generate-scenarios/", request, None)
            .await?;
        if !response.success {
            return Err(malformed(response.error, "anonymous generation failed"));
        }
        Ok(response.scenarios)
    }
}
