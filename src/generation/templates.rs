//! Deterministic template tables: the last-resort generation tier.
//!
//! Pure local computation keyed by the closed [`ProjectDomain`] set, so
//! a project with nothing but a domain always yields a usable set of
//! stories and scenarios. Each role contributes `3 + (role_index % 3)`
//! stories, taken in order from its template list.

use crate::entities::{
    Project, ProjectDomain, Scenario, ScenarioType, StoryPriority, UserStory, Wireframe,
};

pub struct StoryTemplate {
    pub action: &'static str,
    pub benefit: &'static str,
    pub feature: &'static str,
}

pub struct RoleTemplate {
    pub role: &'static str,
    pub stories: &'static [StoryTemplate],
}

pub fn stories_per_role(role_index: usize) -> usize {
    3 + (role_index % 3)
}

pub fn templates_for_domain(domain: ProjectDomain) -> &'static [RoleTemplate] {
    match domain {
        ProjectDomain::Ecommerce => ECOMMERCE,
        ProjectDomain::Finance => FINANCE,
        ProjectDomain::Healthcare => HEALTHCARE,
        ProjectDomain::Education => EDUCATION,
        ProjectDomain::Generic => GENERIC,
    }
}

static ECOMMERCE: &[RoleTemplate] = &[
    RoleTemplate {
        role: "customer",
        stories: &[
            StoryTemplate {
                action: "browse the product catalog",
                benefit: "I can find items I want to buy",
                feature: "catalog",
            },
            StoryTemplate {
                action: "add items to my shopping cart",
                benefit: "I can purchase several items at once",
                feature: "cart",
            },
            StoryTemplate {
                action: "track the status of my order",
                benefit: "I know when my delivery will arrive",
                feature: "orders",
            },
            StoryTemplate {
                action: "save products to a wishlist",
                benefit: "I can come back to them later",
                feature: "wishlist",
            },
            StoryTemplate {
                action: "leave a review on a purchased product",
                benefit: "other shoppers can learn from my experience",
                feature: "reviews",
            },
        ],
    },
    RoleTemplate {
        role: "seller",
        stories: &[
            StoryTemplate {
                action: "list a new product with photos and pricing",
                benefit: "customers can discover and buy it",
                feature: "catalog",
            },
            StoryTemplate {
                action: "update stock levels for my products",
                benefit: "customers never order items that are sold out",
                feature: "inventory",
            },
            StoryTemplate {
                action: "view sales reports for my store",
                benefit: "I can see which products perform best",
                feature: "reporting",
            },
            StoryTemplate {
                action: "respond to customer questions",
                benefit: "buyers get answers before purchasing",
                feature: "messaging",
            },
            StoryTemplate {
                action: "offer discounts on selected products",
                benefit: "I can move slow inventory",
                feature: "promotions",
            },
        ],
    },
    RoleTemplate {
        role: "admin",
        stories: &[
            StoryTemplate {
                action: "review and approve new seller accounts",
                benefit: "only legitimate sellers reach customers",
                feature: "moderation",
            },
            StoryTemplate {
                action: "remove listings that violate policy",
                benefit: "the marketplace stays trustworthy",
                feature: "moderation",
            },
            StoryTemplate {
                action: "configure payment providers",
                benefit: "customers can pay with their preferred method",
                feature: "payments",
            },
            StoryTemplate {
                action: "monitor platform-wide order volume",
                benefit: "I can spot operational problems early",
                feature: "reporting",
            },
            StoryTemplate {
                action: "manage promotional banners on the storefront",
                benefit: "campaigns reach every visitor",
                feature: "promotions",
            },
        ],
    },
    RoleTemplate {
        role: "shipper",
        stories: &[
            StoryTemplate {
                action: "see the queue of orders ready for dispatch",
                benefit: "I can plan the day's deliveries",
                feature: "fulfillment",
            },
            StoryTemplate {
                action: "mark an order as delivered",
                benefit: "customers and sellers see the final status",
                feature: "fulfillment",
            },
            StoryTemplate {
                action: "report a failed delivery attempt",
                benefit: "the customer can reschedule",
                feature: "fulfillment",
            },
            StoryTemplate {
                action: "print shipping labels in bulk",
                benefit: "dispatch preparation takes less time",
                feature: "fulfillment",
            },
            StoryTemplate {
                action: "view the delivery route for my shift",
                benefit: "I spend less time navigating",
                feature: "logistics",
            },
        ],
    },
];

static FINANCE: &[RoleTemplate] = &[
    RoleTemplate {
        role: "account holder",
        stories: &[
            StoryTemplate {
                action: "view my account balance and recent transactions",
                benefit: "I always know where my money is",
                feature: "accounts",
            },
            StoryTemplate {
                action: "transfer money to another account",
                benefit: "I can pay people without visiting a branch",
                feature: "transfers",
            },
            StoryTemplate {
                action: "set up a recurring payment",
                benefit: "my bills are paid on time automatically",
                feature: "payments",
            },
            StoryTemplate {
                action: "download statements for a date range",
                benefit: "I have records for my accounting",
                feature: "statements",
            },
            StoryTemplate {
                action: "freeze my card instantly",
                benefit: "a lost card cannot be abused",
                feature: "cards",
            },
        ],
    },
    RoleTemplate {
        role: "advisor",
        stories: &[
            StoryTemplate {
                action: "see a client's portfolio at a glance",
                benefit: "meetings start from current numbers",
                feature: "portfolio",
            },
            StoryTemplate {
                action: "flag unusual account activity for review",
                benefit: "potential fraud is caught early",
                feature: "compliance",
            },
            StoryTemplate {
                action: "share a savings plan proposal with a client",
                benefit: "clients can decide with full information",
                feature: "planning",
            },
            StoryTemplate {
                action: "schedule a review meeting from the client record",
                benefit: "follow-ups never fall through the cracks",
                feature: "planning",
            },
            StoryTemplate {
                action: "compare a portfolio against a benchmark",
                benefit: "performance conversations are grounded",
                feature: "portfolio",
            },
        ],
    },
    RoleTemplate {
        role: "auditor",
        stories: &[
            StoryTemplate {
                action: "search the immutable transaction log",
                benefit: "any movement of funds can be traced",
                feature: "audit",
            },
            StoryTemplate {
                action: "export evidence for a compliance case",
                benefit: "regulators receive complete records",
                feature: "audit",
            },
            StoryTemplate {
                action: "review permission changes across accounts",
                benefit: "privilege escalation is visible",
                feature: "compliance",
            },
            StoryTemplate {
                action: "subscribe to alerts on high-value transfers",
                benefit: "significant movements are reviewed same-day",
                feature: "alerts",
            },
            StoryTemplate {
                action: "annotate findings directly on a transaction",
                benefit: "the audit trail keeps its context",
                feature: "audit",
            },
        ],
    },
];

static HEALTHCARE: &[RoleTemplate] = &[
    RoleTemplate {
        role: "patient",
        stories: &[
            StoryTemplate {
                action: "book an appointment with my doctor",
                benefit: "I get care without phone queues",
                feature: "appointments",
            },
            StoryTemplate {
                action: "view my test results as soon as they are ready",
                benefit: "I am never left waiting for news",
                feature: "records",
            },
            StoryTemplate {
                action: "request a repeat prescription",
                benefit: "my medication never runs out",
                feature: "prescriptions",
            },
            StoryTemplate {
                action: "receive reminders before appointments",
                benefit: "I do not miss scheduled visits",
                feature: "notifications",
            },
            StoryTemplate {
                action: "message my care team securely",
                benefit: "small questions do not need a visit",
                feature: "messaging",
            },
        ],
    },
    RoleTemplate {
        role: "clinician",
        stories: &[
            StoryTemplate {
                action: "see my schedule of appointments for the day",
                benefit: "I can prepare for each patient",
                feature: "appointments",
            },
            StoryTemplate {
                action: "record consultation notes against a patient",
                benefit: "the care history stays complete",
                feature: "records",
            },
            StoryTemplate {
                action: "order lab tests electronically",
                benefit: "results route back without paperwork",
                feature: "orders",
            },
            StoryTemplate {
                action: "review a patient's medication history",
                benefit: "prescriptions avoid dangerous interactions",
                feature: "prescriptions",
            },
            StoryTemplate {
                action: "refer a patient to a specialist",
                benefit: "handovers carry full context",
                feature: "referrals",
            },
        ],
    },
    RoleTemplate {
        role: "receptionist",
        stories: &[
            StoryTemplate {
                action: "manage the clinic's appointment calendar",
                benefit: "double bookings never happen",
                feature: "appointments",
            },
            StoryTemplate {
                action: "register a new patient",
                benefit: "first visits start without delays",
                feature: "registration",
            },
            StoryTemplate {
                action: "check patients in on arrival",
                benefit: "clinicians see who is waiting",
                feature: "appointments",
            },
            StoryTemplate {
                action: "reschedule appointments when a clinician is away",
                benefit: "patients are notified before they travel",
                feature: "appointments",
            },
            StoryTemplate {
                action: "collect consent forms digitally",
                benefit: "records are complete before treatment",
                feature: "registration",
            },
        ],
    },
];

static EDUCATION: &[RoleTemplate] = &[
    RoleTemplate {
        role: "student",
        stories: &[
            StoryTemplate {
                action: "enroll in a course from the catalog",
                benefit: "I can start learning immediately",
                feature: "enrollment",
            },
            StoryTemplate {
                action: "submit assignments before the deadline",
                benefit: "my work is recorded and graded",
                feature: "assignments",
            },
            StoryTemplate {
                action: "track my grades across courses",
                benefit: "I know where to focus my effort",
                feature: "grades",
            },
            StoryTemplate {
                action: "discuss lessons with classmates in a forum",
                benefit: "I can learn from other perspectives",
                feature: "discussions",
            },
            StoryTemplate {
                action: "download course materials for offline study",
                benefit: "I can learn without a connection",
                feature: "materials",
            },
        ],
    },
    RoleTemplate {
        role: "instructor",
        stories: &[
            StoryTemplate {
                action: "publish a new lesson with attachments",
                benefit: "students always have current material",
                feature: "materials",
            },
            StoryTemplate {
                action: "grade submitted assignments with feedback",
                benefit: "students understand their results",
                feature: "assignments",
            },
            StoryTemplate {
                action: "see which students are falling behind",
                benefit: "I can intervene before exams",
                feature: "analytics",
            },
            StoryTemplate {
                action: "schedule a live session for my class",
                benefit: "students can plan to attend",
                feature: "sessions",
            },
            StoryTemplate {
                action: "reuse a course structure for a new term",
                benefit: "course setup takes minutes, not days",
                feature: "materials",
            },
        ],
    },
    RoleTemplate {
        role: "administrator",
        stories: &[
            StoryTemplate {
                action: "create accounts for incoming students",
                benefit: "everyone can sign in on day one",
                feature: "registration",
            },
            StoryTemplate {
                action: "assign instructors to courses",
                benefit: "every course has an owner",
                feature: "enrollment",
            },
            StoryTemplate {
                action: "export completion reports per cohort",
                benefit: "accreditation evidence is a click away",
                feature: "analytics",
            },
            StoryTemplate {
                action: "archive finished courses",
                benefit: "the catalog stays current",
                feature: "materials",
            },
            StoryTemplate {
                action: "configure the academic calendar",
                benefit: "deadlines align across departments",
                feature: "enrollment",
            },
        ],
    },
];

static GENERIC: &[RoleTemplate] = &[
    RoleTemplate {
        role: "user",
        stories: &[
            StoryTemplate {
                action: "create an account and sign in",
                benefit: "my data is kept under my identity",
                feature: "authentication",
            },
            StoryTemplate {
                action: "create and edit the records I work with",
                benefit: "my information stays current",
                feature: "records",
            },
            StoryTemplate {
                action: "search and filter my records",
                benefit: "I find what I need quickly",
                feature: "search",
            },
            StoryTemplate {
                action: "receive notifications about relevant changes",
                benefit: "I never miss an important update",
                feature: "notifications",
            },
            StoryTemplate {
                action: "export my data",
                benefit: "I can use it outside the application",
                feature: "export",
            },
        ],
    },
    RoleTemplate {
        role: "manager",
        stories: &[
            StoryTemplate {
                action: "invite teammates to the workspace",
                benefit: "the whole team works in one place",
                feature: "collaboration",
            },
            StoryTemplate {
                action: "assign work items to teammates",
                benefit: "responsibilities are explicit",
                feature: "collaboration",
            },
            StoryTemplate {
                action: "view progress dashboards",
                benefit: "status is visible without meetings",
                feature: "reporting",
            },
            StoryTemplate {
                action: "set permissions per teammate",
                benefit: "sensitive data stays restricted",
                feature: "permissions",
            },
            StoryTemplate {
                action: "review an activity log of changes",
                benefit: "surprises can be traced to their source",
                feature: "audit",
            },
        ],
    },
    RoleTemplate {
        role: "administrator",
        stories: &[
            StoryTemplate {
                action: "configure workspace-wide settings",
                benefit: "defaults match how we work",
                feature: "settings",
            },
            StoryTemplate {
                action: "manage user accounts and roles",
                benefit: "access follows people's jobs",
                feature: "permissions",
            },
            StoryTemplate {
                action: "back up workspace data on a schedule",
                benefit: "nothing is lost to an accident",
                feature: "backup",
            },
            StoryTemplate {
                action: "integrate with external services",
                benefit: "data flows without manual copying",
                feature: "integrations",
            },
            StoryTemplate {
                action: "review system health and usage",
                benefit: "capacity problems are caught early",
                feature: "reporting",
            },
        ],
    },
];

/// Synthesize user stories for a project from its domain table.
pub fn template_user_stories(project: &Project) -> Vec<UserStory> {
    let roles = templates_for_domain(project.domain);
    let mut stories = Vec::new();

    for (role_index, role) in roles.iter().enumerate() {
        let count = stories_per_role(role_index).min(role.stories.len());
        for (story_index, template) in role.stories[..count].iter().enumerate() {
            let mut story =
                UserStory::new(&project.id, role.role, template.action, template.benefit);
            story.feature = template.feature.to_string();
            story.acceptance_criteria = vec![
                format!("A {} can {}", role.role, template.action),
                "Invalid input is rejected with a clear message".to_string(),
                "The result is visible immediately after the action".to_string(),
            ];
            story.priority = if story_index == 0 {
                StoryPriority::High
            } else {
                StoryPriority::Medium
            };
            story.story_points = [2, 3, 5][story_index % 3];
            stories.push(story);
        }
    }

    stories
}

/// Synthesize scenarios for a project's user stories: a happy path and
/// an exception path per story, plus a boundary case for High/Critical
/// stories. When the project has no stories at all, three project-level
/// scenarios are derived from the domain's first role so the caller
/// still ends up with something.
pub fn template_scenarios(
    project: &Project,
    stories: &[UserStory],
    wireframes: &[Wireframe],
) -> Vec<Scenario> {
    let page_name = wireframes.first().map(|w| w.page_name.as_str());

    if stories.is_empty() {
        return orphan_scenarios(project, page_name);
    }

    let mut scenarios = Vec::new();
    for story in stories {
        scenarios.push(story_scenario(project, story, ScenarioType::HappyPath, page_name));
        scenarios.push(story_scenario(
            project,
            story,
            ScenarioType::ExceptionPath,
            page_name,
        ));
        if story.priority >= StoryPriority::High {
            scenarios.push(story_scenario(
                project,
                story,
                ScenarioType::BoundaryCase,
                page_name,
            ));
        }
    }
    scenarios
}

fn given_step(role: &str, page_name: Option<&str>) -> String {
    match page_name {
        Some(page) => format!("Given the {} is on the \"{}\" page", role, page),
        None => format!("Given the {} is signed in", role),
    }
}

fn story_scenario(
    project: &Project,
    story: &UserStory,
    scenario_type: ScenarioType,
    page_name: Option<&str>,
) -> Scenario {
    let (title, steps) = match scenario_type {
        ScenarioType::ExceptionPath => (
            format!("{} fails on invalid input", story.action),
            vec![
                given_step(&story.role, page_name),
                format!("When the {} attempts to {} with invalid input", story.role, story.action),
                "Then a clear error message is shown".to_string(),
                "But no changes are persisted".to_string(),
            ],
        ),
        ScenarioType::BoundaryCase => (
            format!("{} at the limit", story.action),
            vec![
                given_step(&story.role, page_name),
                format!(
                    "When the {} attempts to {} at the maximum allowed size",
                    story.role, story.action
                ),
                "Then the operation completes without data loss".to_string(),
            ],
        ),
        _ => (
            format!("{} succeeds", story.action),
            vec![
                given_step(&story.role, page_name),
                format!("When the {} attempts to {}", story.role, story.action),
                format!("Then the operation succeeds so that {}", story.benefit),
                "And the change is persisted".to_string(),
            ],
        ),
    };

    let mut scenario = Scenario::new(&project.id, title, scenario_type, steps);
    scenario.user_story_id = Some(story.id.clone());
    scenario.description = story.story_text.clone();
    scenario
}

fn orphan_scenarios(project: &Project, page_name: Option<&str>) -> Vec<Scenario> {
    let roles = templates_for_domain(project.domain);
    let role = roles.first().map(|r| r.role).unwrap_or("user");
    let objective = if project.objective.is_empty() {
        "use the application".to_string()
    } else {
        project.objective.clone()
    };

    [
        ScenarioType::HappyPath,
        ScenarioType::ExceptionPath,
        ScenarioType::BoundaryCase,
    ]
    .into_iter()
    .map(|scenario_type| {
        let (title, steps) = match scenario_type {
            ScenarioType::ExceptionPath => (
                format!("{} rejects invalid attempts", project.title),
                vec![
                    given_step(role, page_name),
                    format!("When the {} tries to {} with invalid input", role, objective),
                    "Then a clear error message is shown".to_string(),
                ],
            ),
            ScenarioType::BoundaryCase => (
                format!("{} under maximum load", project.title),
                vec![
                    given_step(role, page_name),
                    format!("When the {} tries to {} at the allowed limit", role, objective),
                    "Then the operation completes without data loss".to_string(),
                ],
            ),
            _ => (
                format!("{} core flow succeeds", project.title),
                vec![
                    given_step(role, page_name),
                    format!("When the {} tries to {}", role, objective),
                    "Then the operation succeeds".to_string(),
                ],
            ),
        };
        Scenario::new(&project.id, title, scenario_type, steps)
    })
    .collect()
}
