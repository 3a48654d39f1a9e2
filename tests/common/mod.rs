#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use storycanvas::entities::{Project, Scenario, UserStory, Wireframe};
use storycanvas::errors::{GatewayError, GatewayResult};
use storycanvas::gateway::{AnonymousGenerationRequest, FetchedCollection, ProjectPatch, RemoteGateway};
use storycanvas::{AppContext, Config};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Failure {
    Network,
    Unauthorized,
    Malformed,
}

impl Failure {
    fn to_error(self) -> GatewayError {
        match self {
            Failure::Network => GatewayError::Network("connection refused".to_string()),
            Failure::Unauthorized => GatewayError::Unauthorized,
            Failure::Malformed => GatewayError::Malformed("success flag was false".to_string()),
        }
    }
}

/// In-memory stand-in for the backend: remote collections, canned
/// generation payloads, per-call failure injection, and call counters.
#[derive(Default)]
pub struct MockGateway {
    pub remote_stories: Mutex<Vec<UserStory>>,
    pub remote_scenarios: Mutex<Vec<Scenario>>,
    pub remote_wireframes: Mutex<Vec<Wireframe>>,

    pub generated_stories: Mutex<Vec<UserStory>>,
    pub generated_scenarios: Mutex<Vec<Scenario>>,
    pub anonymous_stories: Mutex<Vec<UserStory>>,
    pub anonymous_scenarios: Mutex<Vec<Scenario>>,

    pub fetch_failure: Mutex<Option<Failure>>,
    pub push_failure: Mutex<Option<Failure>>,
    pub generate_failure: Mutex<Option<Failure>>,
    pub anonymous_failure: Mutex<Option<Failure>>,
    /// Pushes of these entity ids fail with a network error while the
    /// rest of the batch continues.
    pub push_fail_ids: Mutex<HashSet<String>>,

    pub fetch_calls: AtomicUsize,
    pub push_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub anonymous_calls: AtomicUsize,
    /// Ids the mock received through push, in order.
    pub pushed_ids: Mutex<Vec<String>>,
    /// Sample sizes observed on the last anonymous request.
    pub last_anonymous_sample: Mutex<Option<(usize, usize)>>,

    /// Artificial latency before fetch returns, for racing tests.
    pub fetch_delay_ms: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_remote_stories(&self, stories: Vec<UserStory>) {
        *self.remote_stories.lock().unwrap() = stories;
    }

    pub fn set_remote_scenarios(&self, scenarios: Vec<Scenario>) {
        *self.remote_scenarios.lock().unwrap() = scenarios;
    }

    pub fn set_generated_stories(&self, stories: Vec<UserStory>) {
        *self.generated_stories.lock().unwrap() = stories;
    }

    pub fn set_anonymous_stories(&self, stories: Vec<UserStory>) {
        *self.anonymous_stories.lock().unwrap() = stories;
    }

    pub fn set_anonymous_scenarios(&self, scenarios: Vec<Scenario>) {
        *self.anonymous_scenarios.lock().unwrap() = scenarios;
    }

    pub fn fail_fetches(&self, failure: Failure) {
        *self.fetch_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_generates(&self, failure: Failure) {
        *self.generate_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_anonymous(&self, failure: Failure) {
        *self.anonymous_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_everything(&self) {
        self.fail_fetches(Failure::Network);
        *self.push_failure.lock().unwrap() = Some(Failure::Network);
        self.fail_generates(Failure::Network);
        self.fail_anonymous(Failure::Network);
    }

    fn check(&self, slot: &Mutex<Option<Failure>>) -> GatewayResult<()> {
        match *slot.lock().unwrap() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    async fn fetch<E: Clone>(
        &self,
        collection: &Mutex<Vec<E>>,
        project_id: &str,
        by_project: impl Fn(&E) -> bool,
    ) -> GatewayResult<FetchedCollection<E>> {
        let _ = project_id;
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        self.check(&self.fetch_failure)?;
        let items: Vec<E> = collection
            .lock()
            .unwrap()
            .iter()
            .filter(|e| by_project(e))
            .cloned()
            .collect();
        let count = items.len();
        Ok(FetchedCollection {
            items,
            count,
            project_title: None,
        })
    }

    fn record_push(&self, id: &str) -> GatewayResult<()> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.check(&self.push_failure)?;
        if self.push_fail_ids.lock().unwrap().contains(id) {
            return Err(GatewayError::Network("push dropped".to_string()));
        }
        self.pushed_ids.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn fetch_project(&self, _project_id: &str, _token: &str) -> GatewayResult<Option<Project>> {
        self.check(&self.fetch_failure)?;
        Ok(None)
    }

    async fn update_project(
        &self,
        _project_id: &str,
        _patch: &ProjectPatch,
        _token: &str,
    ) -> GatewayResult<()> {
        self.check(&self.push_failure)
    }

    async fn delete_project(&self, _project_id: &str, _token: &str) -> GatewayResult<()> {
        self.check(&self.push_failure)
    }

    async fn fetch_user_stories(
        &self,
        project_id: &str,
        _token: &str,
    ) -> GatewayResult<FetchedCollection<UserStory>> {
        self.fetch(&self.remote_stories, project_id, |s: &UserStory| {
            s.project_id == project_id
        })
        .await
    }

    async fn push_user_story(
        &self,
        _project_id: &str,
        story: &UserStory,
        _token: &str,
    ) -> GatewayResult<()> {
        self.record_push(&story.id)?;
        self.remote_stories.lock().unwrap().push(story.clone());
        Ok(())
    }

    async fn fetch_scenarios(
        &self,
        project_id: &str,
        _token: &str,
    ) -> GatewayResult<FetchedCollection<Scenario>> {
        self.fetch(&self.remote_scenarios, project_id, |s: &Scenario| {
            s.project_id == project_id
        })
        .await
    }

    async fn push_scenario(
        &self,
        _project_id: &str,
        scenario: &Scenario,
        _token: &str,
    ) -> GatewayResult<()> {
        self.record_push(&scenario.id)?;
        self.remote_scenarios.lock().unwrap().push(scenario.clone());
        Ok(())
    }

    async fn fetch_wireframes(
        &self,
        project_id: &str,
        _token: &str,
    ) -> GatewayResult<FetchedCollection<Wireframe>> {
        self.fetch(&self.remote_wireframes, project_id, |w: &Wireframe| {
            w.project_id == project_id
        })
        .await
    }

    async fn generate_user_stories(
        &self,
        _project_id: &str,
        _token: &str,
    ) -> GatewayResult<Vec<UserStory>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.check(&self.generate_failure)?;
        Ok(self.generated_stories.lock().unwrap().clone())
    }

    async fn generate_scenarios(
        &self,
        _project_id: &str,
        _token: &str,
    ) -> GatewayResult<Vec<Scenario>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.check(&self.generate_failure)?;
        Ok(self.generated_scenarios.lock().unwrap().clone())
    }

    async fn generate_user_stories_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<UserStory>> {
        self.anonymous_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_anonymous_sample.lock().unwrap() =
            Some((request.user_stories.len(), request.wireframes.len()));
        self.check(&self.anonymous_failure)?;
        Ok(self.anonymous_stories.lock().unwrap().clone())
    }

    async fn generate_scenarios_anonymous(
        &self,
        request: &AnonymousGenerationRequest,
    ) -> GatewayResult<Vec<Scenario>> {
        self.anonymous_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_anonymous_sample.lock().unwrap() =
            Some((request.user_stories.len(), request.wireframes.len()));
        self.check(&self.anonymous_failure)?;
        Ok(self.anonymous_scenarios.lock().unwrap().clone())
    }
}

// ----- Fixtures --------------------------------------------------------

pub struct TestApp {
    pub ctx: AppContext,
    pub gateway: std::sync::Arc<MockGateway>,
    // dropped with the fixture, deleting the store directory
    _data_dir: TempDir,
}

/// App context over a tempdir store and a mock gateway.
pub fn test_app() -> TestApp {
    let data_dir = TempDir::new().expect("tempdir");
    let gateway = std::sync::Arc::new(MockGateway::new());
    let config = Config::new("http://mock.invalid/api", data_dir.path());
    let ctx = AppContext::with_gateway(config, gateway.clone()).expect("app context");
    TestApp {
        ctx,
        gateway,
        _data_dir: data_dir,
    }
}

pub fn remote_story(project_id: &str, id: &str, action: &str) -> UserStory {
    let mut story = UserStory::new(project_id, "customer", action, "things keep working");
    story.id = id.to_string();
    story.generated_by_llm = true;
    story
}

pub fn remote_scenario(project_id: &str, id: &str, title: &str) -> Scenario {
    let mut scenario = Scenario::new(
        project_id,
        title,
        storycanvas::entities::ScenarioType::HappyPath,
        vec![
            "Given a signed-in customer".to_string(),
            "When they complete the flow".to_string(),
            "Then the result is saved".to_string(),
        ],
    );
    scenario.id = id.to_string();
    scenario.generated_by_llm = true;
    scenario
}
