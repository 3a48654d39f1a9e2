use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, StoredEntity};

const GHERKIN_PREFIXES: [&str; 5] = ["Given", "When", "Then", "And", "But"];

/// Closed scenario-type enumeration. Free-form inputs from any source
/// must pass through [`ScenarioType::normalize`] before storage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    #[default]
    HappyPath,
    AlternatePath,
    ExceptionPath,
    BoundaryCase,
    Other,
}

impl ScenarioType {
    /// Map a free-form scenario-type string into the closed set.
    ///
    /// Total and pure: every input yields exactly one variant, same
    /// input yields the same output. Precedence is substring "boundary",
    /// then "exception", "alternate", "happy" (case-insensitive), then
    /// the legacy exact value `boundary_path`, then exact canonical
    /// names. Anything else is treated as the default flow and maps to
    /// `HappyPath`, not `Other`.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();

        if lowered.contains("boundary") {
            return ScenarioType::BoundaryCase;
        }
        if lowered.contains("exception") {
            return ScenarioType::ExceptionPath;
        }
        if lowered.contains("alternate") {
            return ScenarioType::AlternatePath;
        }
        if lowered.contains("happy") {
            return ScenarioType::HappyPath;
        }
        if lowered == "boundary_path" {
            return ScenarioType::BoundaryCase;
        }

        match lowered.as_str() {
            "happy_path" => ScenarioType::HappyPath,
            "alternate_path" => ScenarioType::AlternatePath,
            "exception_path" => ScenarioType::ExceptionPath,
            "boundary_case" => ScenarioType::BoundaryCase,
            "other" => ScenarioType::Other,
            _ => ScenarioType::HappyPath,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::HappyPath => "happy_path",
            ScenarioType::AlternatePath => "alternate_path",
            ScenarioType::ExceptionPath => "exception_path",
            ScenarioType::BoundaryCase => "boundary_case",
            ScenarioType::Other => "other",
        }
    }
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn scenario_type_from_wire<'de, D>(deserializer: D) -> Result<ScenarioType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(ScenarioType::normalize(&raw))
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    #[default]
    Draft,
    Accepted,
    Rejected,
}

impl ScenarioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStatus::Draft => "draft",
            ScenarioStatus::Accepted => "accepted",
            ScenarioStatus::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    /// None for a project-level ("orphaned") scenario.
    #[serde(default)]
    pub user_story_id: Option<String>,
    /// Free-form on the wire; normalized into the closed set on ingest.
    #[serde(default, deserialize_with = "scenario_type_from_wire")]
    pub scenario_type: ScenarioType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered Given/When/Then/And/But prefixed steps.
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub structurally_valid: bool,
    #[serde(default)]
    pub generated_by_llm: bool,
    #[serde(default)]
    pub status: ScenarioStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scenario {
    pub fn new(
        project_id: impl Into<String>,
        title: impl Into<String>,
        scenario_type: ScenarioType,
        steps: Vec<String>,
    ) -> Self {
        let structurally_valid = Self::steps_are_structurally_valid(&steps);
        let now = Utc::now();
        Self {
            id: String::new(),
            project_id: project_id.into(),
            user_story_id: None,
            scenario_type,
            title: title.into(),
            description: String::new(),
            steps,
            structurally_valid,
            generated_by_llm: false,
            status: ScenarioStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.user_story_id.is_none()
    }

    /// Structural validity: at least one step, every step carries a
    /// Gherkin prefix, and Given/When/Then each appear at least once.
    pub fn steps_are_structurally_valid(steps: &[String]) -> bool {
        if steps.is_empty() {
            return false;
        }

        let all_prefixed = steps.iter().all(|step| {
            GHERKIN_PREFIXES
                .iter()
                .any(|prefix| step.trim_start().starts_with(prefix))
        });
        if !all_prefixed {
            return false;
        }

        ["Given", "When", "Then"].iter().all(|required| {
            steps
                .iter()
                .any(|step| step.trim_start().starts_with(required))
        })
    }

    /// Recompute and store the structural-validity flag.
    pub fn revalidate(&mut self) {
        self.structurally_valid = Self::steps_are_structurally_valid(&self.steps);
    }
}

impl StoredEntity for Scenario {
    const COLLECTION: Collection = Collection::Scenarios;

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
