use serde::{Deserialize, Serialize};

/// A project the user declared on their dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardProject {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Skills and projects the user declared themselves. Read-only to the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardContext {
    /// Set semantics: duplicates are dropped, first occurrence keeps its position.
    pub skills: Vec<String>,
    pub projects: Vec<DashboardProject>,
}

impl DashboardContext {
    pub fn new(skills: Vec<String>, projects: Vec<DashboardProject>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(skills.len());
        for skill in skills {
            let skill = skill.trim();
            if !skill.is_empty() && !unique.iter().any(|s| s == skill) {
                unique.push(skill.to_string());
            }
        }
        let projects = projects
            .into_iter()
            .filter(|p| !p.title.trim().is_empty())
            .collect();
        Self {
            skills: unique,
            projects,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.projects.is_empty()
    }
}

/// Pipeline input contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    pub profile_url: String,
    #[serde(default)]
    pub dashboard_skills: Option<Vec<String>>,
    #[serde(default)]
    pub dashboard_projects: Option<Vec<DashboardProject>>,
}

impl EnrichmentRequest {
    pub fn dashboard(&self) -> DashboardContext {
        DashboardContext::new(
            self.dashboard_skills.clone().unwrap_or_default(),
            self.dashboard_projects.clone().unwrap_or_default(),
        )
    }
}

/// Pipeline output contract. Built once by the assembler, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    pub bio_suggestion: String,
    pub skill_suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_username: Option<String>,
}

/// The shape the generation capability is asked to return.
///
/// Field names match the JSON schema embedded in the prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProfile {
    pub bio_suggestion: String,
    #[serde(default)]
    pub skill_suggestions: Vec<String>,
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default)]
    pub flagged_items: Option<Vec<String>>,
}
