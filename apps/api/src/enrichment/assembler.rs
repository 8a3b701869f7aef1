//! Output Assembler — turns the orchestrator's outcome into the public contract.

use thiserror::Error;

use crate::enrichment::acquisition::AcquisitionError;
use crate::enrichment::models::{EnrichmentResult, GeneratedProfile};
use crate::enrichment::prompts::DASHBOARD_DISCLOSURE;
use crate::enrichment::resolver::ResolutionError;
use crate::enrichment::validator::ValidationVerdict;

/// Everything that can stop a run from producing a primary analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineFailure {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{error}")]
    Acquisition {
        username: String,
        error: AcquisitionError,
    },

    #[error("{verdict}")]
    Quality {
        username: String,
        verdict: ValidationVerdict,
    },

    #[error("GenerationError: {detail}")]
    Generation { username: String, detail: String },
}

impl PipelineFailure {
    pub fn category(&self) -> String {
        match self {
            PipelineFailure::Resolution(_) => "ResolutionError".to_string(),
            PipelineFailure::Acquisition { error, .. } => error.kind.to_string(),
            PipelineFailure::Quality { verdict, .. } => verdict.category().to_string(),
            PipelineFailure::Generation { .. } => "GenerationError".to_string(),
        }
    }

    /// Human-readable sentence naming the category and the diagnostic detail.
    pub fn explanation(&self) -> String {
        match self {
            PipelineFailure::Resolution(e) => format!(
                "Invalid GitHub profile URL. Could not extract a username from '{}' ({}).",
                e.input, e.reason
            ),
            PipelineFailure::Acquisition { username, error } if error.is_not_found() => format!(
                "GitHub user '{username}' could not be found ({}: {}).",
                error.kind, error.detail
            ),
            PipelineFailure::Acquisition { username, error } => format!(
                "Failed to fetch GitHub profile content for '{username}' ({}: {}).",
                error.kind, error.detail
            ),
            PipelineFailure::Quality { username, verdict } => format!(
                "The GitHub profile content fetched for '{username}' could not be used ({}: {verdict}).",
                verdict.category()
            ),
            PipelineFailure::Generation { username, detail } => format!(
                "Could not generate a profile summary for '{username}' (GenerationError: {detail})."
            ),
        }
    }

    /// One-line form for `flaggedItems`.
    pub fn flagged_item(&self) -> String {
        match self {
            PipelineFailure::Resolution(e) => format!("ResolutionError: {}", e.reason),
            PipelineFailure::Quality { verdict, .. } => {
                format!("{}: {verdict}", verdict.category())
            }
            other => other.to_string(),
        }
    }
}

/// How a run ended, as decided by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Generated from the acquired external content.
    Primary(GeneratedProfile),
    /// Generated from dashboard data only, after `cause` ruled out the primary path.
    Fallback {
        generated: GeneratedProfile,
        declared_skills: Vec<String>,
        cause: PipelineFailure,
    },
    /// No generation succeeded. `failures` is never empty; the first one is the root cause.
    Terminal {
        failures: Vec<PipelineFailure>,
        insufficient_context: bool,
    },
}

const INSUFFICIENT_CONTEXT_NOTE: &str = "There is insufficient information to generate a bio \
    suggestion: no dashboard skills or projects were provided to fall back on.";

/// Builds the final result. `analyzed_username` is the resolved username, or the
/// raw caller input when resolution failed.
pub fn assemble(outcome: Outcome, analyzed_username: &str) -> EnrichmentResult {
    let analyzed_username = Some(analyzed_username.to_string());

    match outcome {
        Outcome::Primary(generated) => EnrichmentResult {
            bio_suggestion: generated.bio_suggestion.trim().to_string(),
            skill_suggestions: dedup(generated.skill_suggestions),
            tech_stack: generated.tech_stack.map(dedup),
            flagged_items: generated.flagged_items.map(dedup),
            analyzed_username,
        },
        Outcome::Fallback {
            generated,
            declared_skills,
            cause,
        } => EnrichmentResult {
            bio_suggestion: with_disclosure(generated.bio_suggestion.trim()),
            // Exactly what the user declared, whatever the generator suggested.
            skill_suggestions: dedup(declared_skills),
            tech_stack: None,
            flagged_items: Some(vec![format!(
                "Generated from dashboard data only; GitHub analysis unavailable ({})",
                cause.flagged_item()
            )]),
            analyzed_username,
        },
        Outcome::Terminal {
            failures,
            insufficient_context,
        } => {
            let mut sentences: Vec<String> = failures.iter().map(|f| f.explanation()).collect();
            if insufficient_context {
                sentences.push(INSUFFICIENT_CONTEXT_NOTE.to_string());
            }
            EnrichmentResult {
                bio_suggestion: sentences.join(" "),
                skill_suggestions: Vec::new(),
                tech_stack: None,
                flagged_items: Some(failures.iter().map(|f| f.flagged_item()).collect()),
                analyzed_username,
            }
        }
    }
}

/// Removes blanks and case-sensitive duplicates, keeping first occurrences in order.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !unique.iter().any(|u| u == item) {
            unique.push(item.to_string());
        }
    }
    unique
}

fn with_disclosure(bio: &str) -> String {
    let marker = DASHBOARD_DISCLOSURE.trim_end_matches(',').to_lowercase();
    if bio.to_lowercase().starts_with(&marker) {
        bio.to_string()
    } else {
        format!("{DASHBOARD_DISCLOSURE} {bio}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::acquisition::AcquisitionErrorKind;

    fn generated(bio: &str, skills: &[&str]) -> GeneratedProfile {
        GeneratedProfile {
            bio_suggestion: bio.to_string(),
            skill_suggestions: skills.iter().map(|s| s.to_string()).collect(),
            tech_stack: None,
            flagged_items: None,
        }
    }

    fn not_found() -> PipelineFailure {
        PipelineFailure::Acquisition {
            username: "ghost".to_string(),
            error: AcquisitionError::api(Some(404), "GitHub API error for user profile: 404 Not Found"),
        }
    }

    #[test]
    fn test_primary_dedups_skills_case_sensitively() {
        let result = assemble(
            Outcome::Primary(generated("I build things.", &["Rust", "Go", "Rust", "rust", " "])),
            "octocat",
        );
        assert_eq!(result.skill_suggestions, vec!["Rust", "Go", "rust"]);
        assert_eq!(result.analyzed_username.as_deref(), Some("octocat"));
        assert_eq!(result.bio_suggestion, "I build things.");
    }

    #[test]
    fn test_primary_keeps_tech_stack_and_flags() {
        let mut g = generated("Summary", &[]);
        g.tech_stack = Some(vec!["Rust".into(), "Rust".into(), "Go".into()]);
        g.flagged_items = Some(vec!["Owns a highly starred repository: kvstore (Stars: 42)".into()]);
        let result = assemble(Outcome::Primary(g), "octocat");
        assert_eq!(result.tech_stack, Some(vec!["Rust".to_string(), "Go".to_string()]));
        assert_eq!(result.flagged_items.unwrap().len(), 1);
    }

    #[test]
    fn test_fallback_uses_declared_skills_only() {
        let result = assemble(
            Outcome::Fallback {
                generated: generated("I write backend services.", &["Go", "Rust", "Kubernetes"]),
                declared_skills: vec!["Go".to_string(), "Rust".to_string()],
                cause: PipelineFailure::Quality {
                    username: "octocat".to_string(),
                    verdict: ValidationVerdict::TooShort {
                        actual: 1_800,
                        minimum: 2_500,
                    },
                },
            },
            "octocat",
        );
        assert_eq!(result.skill_suggestions, vec!["Go", "Rust"]);
        assert_eq!(
            result.bio_suggestion,
            "Based on your dashboard profile, I write backend services."
        );
        assert!(result.tech_stack.is_none());
        let flags = result.flagged_items.unwrap();
        assert!(flags[0].contains("TooShort"));
        assert!(flags[0].contains("length: 1800"));
    }

    #[test]
    fn test_fallback_does_not_repeat_existing_disclosure() {
        let result = assemble(
            Outcome::Fallback {
                generated: generated("Based on your dashboard profile, I ship Go services.", &[]),
                declared_skills: vec!["Go".to_string()],
                cause: not_found(),
            },
            "ghost",
        );
        assert_eq!(
            result.bio_suggestion,
            "Based on your dashboard profile, I ship Go services."
        );
    }

    #[test]
    fn test_terminal_has_empty_skills_and_names_failure() {
        let result = assemble(
            Outcome::Terminal {
                failures: vec![not_found()],
                insufficient_context: true,
            },
            "ghost",
        );
        assert!(result.skill_suggestions.is_empty());
        assert!(result.bio_suggestion.contains("'ghost' could not be found"));
        assert!(result.bio_suggestion.contains("insufficient information"));
        assert_eq!(
            result.flagged_items,
            Some(vec![
                "ApiError: GitHub API error for user profile: 404 Not Found".to_string()
            ])
        );
    }

    #[test]
    fn test_resolution_failure_keeps_raw_input_as_identifier() {
        let failure: PipelineFailure = ResolutionError {
            input: "https://example.com/x".to_string(),
            reason: "host 'example.com' is not github.com".to_string(),
        }
        .into();
        let result = assemble(
            Outcome::Terminal {
                failures: vec![failure],
                insufficient_context: false,
            },
            "https://example.com/x",
        );
        assert_eq!(result.analyzed_username.as_deref(), Some("https://example.com/x"));
        assert!(result.bio_suggestion.starts_with("Invalid GitHub profile URL"));
        assert!(!result.bio_suggestion.contains("insufficient information"));
    }

    #[test]
    fn test_failure_categories() {
        assert_eq!(not_found().category(), "ApiError");
        let transport = PipelineFailure::Acquisition {
            username: "octocat".to_string(),
            error: AcquisitionError::transport("request timed out"),
        };
        assert_eq!(transport.category(), "TransportError");
        assert!(transport.explanation().contains("TransportError: request timed out"));
        assert_eq!(
            AcquisitionErrorKind::HttpError.to_string(),
            "HttpError"
        );
    }
}
