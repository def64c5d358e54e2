use crate::resources::{Resource, RowSource};
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Review status of a project. Any status may follow any other.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ProjectStatus {
    Draft,
    Review,
    Approved,
    Rejected,
    /// Older rows use `pending` for projects awaiting review.
    Pending,
    /// A status this client does not know, kept verbatim.
    Other(String),
}

impl ProjectStatus {
    /// Statuses a reviewer can assign, in filter order.
    pub const ASSIGNABLE: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Review,
        ProjectStatus::Approved,
        ProjectStatus::Rejected,
    ];

    /// Value stored in the `status` column.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Review => "review",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Rejected => "rejected",
            ProjectStatus::Pending => "pending",
            ProjectStatus::Other(raw) => raw,
        }
    }

    pub fn is_awaiting_review(&self) -> bool {
        matches!(self, ProjectStatus::Review | ProjectStatus::Pending)
    }
}

impl From<String> for ProjectStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "draft" => ProjectStatus::Draft,
            "review" => ProjectStatus::Review,
            "approved" => ProjectStatus::Approved,
            "rejected" => ProjectStatus::Rejected,
            "pending" => ProjectStatus::Pending,
            _ => ProjectStatus::Other(raw),
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Pending => write!(f, "review (pending)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    #[serde(default)]
    pub channel_logo: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for Project {
    const SOURCE: RowSource = RowSource::Table("projects");
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Which projects the approval list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    /// all → draft → review → approved → rejected → all
    pub fn next(&self) -> Self {
        let statuses = &ProjectStatus::ASSIGNABLE;
        match self {
            StatusFilter::All => StatusFilter::Only(statuses[0].clone()),
            StatusFilter::Only(current) => statuses
                .iter()
                .position(|s| s == current)
                .and_then(|i| statuses.get(i + 1))
                .map_or(StatusFilter::All, |s| StatusFilter::Only(s.clone())),
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(ProjectStatus::Review) => project.status.is_awaiting_review(),
            StatusFilter::Only(status) => &project.status == status,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}
