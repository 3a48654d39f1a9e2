use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, StoredEntity};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl StoryPriority {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => StoryPriority::Low,
            "high" => StoryPriority::High,
            "critical" => StoryPriority::Critical,
            _ => StoryPriority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryPriority::Low => "low",
            StoryPriority::Medium => "medium",
            StoryPriority::High => "high",
            StoryPriority::Critical => "critical",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    #[default]
    Draft,
    Reviewed,
    Approved,
    Implemented,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "draft",
            StoryStatus::Reviewed => "reviewed",
            StoryStatus::Approved => "approved",
            StoryStatus::Implemented => "implemented",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub role: String,
    pub action: String,
    pub benefit: String,
    /// Always derivable from role/action/benefit; refreshed on every
    /// clause mutation.
    #[serde(default)]
    pub story_text: String,
    #[serde(default)]
    pub feature: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub priority: StoryPriority,
    #[serde(default)]
    pub story_points: u8,
    #[serde(default)]
    pub status: StoryStatus,
    #[serde(default)]
    pub generated_by_llm: bool,
    #[serde(default)]
    pub iteration: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserStory {
    pub fn new(
        project_id: impl Into<String>,
        role: impl Into<String>,
        action: impl Into<String>,
        benefit: impl Into<String>,
    ) -> Self {
        let role = role.into();
        let action = action.into();
        let benefit = benefit.into();
        let story_text = Self::compose_story_text(&role, &action, &benefit);
        let now = Utc::now();
        Self {
            id: String::new(),
            project_id: project_id.into(),
            role,
            action,
            benefit,
            story_text,
            feature: String::new(),
            acceptance_criteria: Vec::new(),
            priority: StoryPriority::Medium,
            story_points: 3,
            status: StoryStatus::Draft,
            generated_by_llm: false,
            iteration: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn compose_story_text(role: &str, action: &str, benefit: &str) -> String {
        format!("As a {}, I want to {} so that {}", role, action, benefit)
    }

    /// Re-derive `story_text` from the current clauses. Call after any
    /// role/action/benefit mutation.
    pub fn refresh_story_text(&mut self) {
        self.story_text = Self::compose_story_text(&self.role, &self.action, &self.benefit);
    }

    pub fn story_text_is_consistent(&self) -> bool {
        self.story_text == Self::compose_story_text(&self.role, &self.action, &self.benefit)
    }
}

impl StoredEntity for UserStory {
    const COLLECTION: Collection = Collection::UserStories;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_text_is_derived_on_construction() {
        let story = UserStory::new("p-1", "customer", "track my order", "I know when it arrives");
        assert_eq!(
            story.story_text,
            "As a customer, I want to track my order so that I know when it arrives"
        );
        assert!(story.story_text_is_consistent());
    }

    #[test]
    fn test_refresh_story_text_after_mutation() {
        let mut story = UserStory::new("p-1", "customer", "browse products", "I can compare options");
        story.role = "guest".to_string();
        assert!(!story.story_text_is_consistent());

        story.refresh_story_text();
        assert!(story.story_text_is_consistent());
        assert!(story.story_text.starts_with("As a guest, "));
    }

    #[test]
    fn test_priority_parse_defaults_to_medium() {
        assert_eq!(StoryPriority::parse("CRITICAL"), StoryPriority::Critical);
        assert_eq!(StoryPriority::parse("unknown"), StoryPriority::Medium);
    }
}
