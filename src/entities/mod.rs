pub mod projects;
pub mod scenarios;
pub mod user_stories;
pub mod wireframes;

pub use projects::{Project, ProjectDomain, ProjectFeature, ProjectUserProfile};
pub use scenarios::{Scenario, ScenarioStatus, ScenarioType};
pub use user_stories::{StoryPriority, StoryStatus, UserStory};
pub use wireframes::Wireframe;
