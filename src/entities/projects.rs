use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, StoredEntity};

/// Closed set of project domains the template tables are keyed by.
/// Free-text category strings parse lossily; anything unrecognized lands
/// on `Generic` so the fallback behavior is a visible branch rather than
/// a map miss.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectDomain {
    Ecommerce,
    Finance,
    Healthcare,
    Education,
    #[default]
    Generic,
}

impl ProjectDomain {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "ecommerce" | "e-commerce" | "commerce" | "retail" => ProjectDomain::Ecommerce,
            "finance" | "fintech" | "banking" => ProjectDomain::Finance,
            "healthcare" | "health" | "medical" => ProjectDomain::Healthcare,
            "education" | "edtech" | "learning" => ProjectDomain::Education,
            _ => ProjectDomain::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectDomain::Ecommerce => "ecommerce",
            ProjectDomain::Finance => "finance",
            ProjectDomain::Healthcare => "healthcare",
            ProjectDomain::Education => "education",
            ProjectDomain::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ProjectDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user type captured during onboarding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUserProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A planned feature captured during onboarding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFeature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub domain: ProjectDomain,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub scope_notes: String,
    #[serde(default)]
    pub flow_notes: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub users_data: Vec<ProjectUserProfile>,
    #[serde(default)]
    pub features_data: Vec<ProjectFeature>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: impl Into<String>, domain: ProjectDomain, objective: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: title.into(),
            domain,
            objective: objective.into(),
            scope_notes: String::new(),
            flow_notes: String::new(),
            additional_info: String::new(),
            users_data: Vec::new(),
            features_data: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl StoredEntity for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn project_id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
