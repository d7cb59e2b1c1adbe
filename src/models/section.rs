use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category of a profile sub-resource entry.
///
/// Experience, education, certification, project, and service entries share
/// one table shape and differ only by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Certification,
    Project,
    Service,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Certification => "certification",
            SectionKind::Project => "project",
            SectionKind::Service => "service",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "experience" => Some(SectionKind::Experience),
            "education" => Some(SectionKind::Education),
            "certification" => Some(SectionKind::Certification),
            "project" => Some(SectionKind::Project),
            "service" => Some(SectionKind::Service),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileSection {
    pub id: i64,
    pub profile_id: i64,
    pub kind: String,
    pub title: String,
    pub organization: Option<String>,
    pub description: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSection {
    pub kind: SectionKind,
    pub title: String,
    pub organization: Option<String>,
    pub description: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    #[serde(default)]
    pub position: i64,
}
