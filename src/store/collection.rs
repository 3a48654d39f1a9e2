use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The logical collections held by the Local Store, one durable file per
/// collection. Entities are never partitioned per project; each carries
/// a `project_id` used for client-side filtering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Collection {
    Projects,
    UserStories,
    Wireframes,
    Scenarios,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects.json",
            Collection::UserStories => "user_stories.json",
            Collection::Wireframes => "wireframes.json",
            Collection::Scenarios => "scenarios.json",
        }
    }

    /// Path segment used by the Remote Gateway for this collection.
    pub fn endpoint_segment(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::UserStories => "user-stories",
            Collection::Wireframes => "wireframes",
            Collection::Scenarios => "scenarios",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::UserStories => "user stories",
            Collection::Wireframes => "wireframes",
            Collection::Scenarios => "scenarios",
        }
    }
}

/// Implemented by every entity the Local Store can hold.
pub trait StoredEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Owning project id; a `Project` returns its own id.
    fn project_id(&self) -> &str;

    fn updated_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, now: DateTime<Utc>);
}
