//! Generation Orchestrator — drives one enrichment run as an explicit state machine.
//!
//! Flow: resolve → Acquire → Validate (raw strategy only) → GeneratePrimary → Done
//!                    ↘ Degraded → GenerateFallback (dashboard non-empty) → Done
//!                               ↘ Done (terminal explanation)
//!
//! At most one generation call happens per run: the primary one when the
//! external content is usable, otherwise the dashboard-only fallback. A failed
//! primary generation is terminal; it never falls through to the fallback.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use crate::enrichment::acquisition::{DocumentSource, ProfileApi, RawContent, StructuredProfile};
use crate::enrichment::assembler::{assemble, Outcome, PipelineFailure};
use crate::enrichment::models::{
    DashboardContext, EnrichmentRequest, EnrichmentResult, GeneratedProfile,
};
use crate::enrichment::prompts::{
    CANDIDATE_SHORTLIST_PROMPT_TEMPLATE, DASHBOARD_DISCLOSURE, DASHBOARD_FALLBACK_PROMPT_TEMPLATE,
    ENRICHMENT_SYSTEM, PROFILE_ENHANCE_PROMPT_TEMPLATE,
};
use crate::enrichment::resolver::{resolve_profile_url, ProfileIdentifier};
use crate::enrichment::validator::{classify, PageHeuristics};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{GenerationError, TextGenerator};

/// Which acquisition strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    /// Scrape the profile page; content goes through the validator.
    RawDocument,
    /// Query the GitHub REST API for user and repositories.
    StructuredApi,
}

/// Content that passed acquisition (and validation, for raw documents).
#[derive(Debug)]
enum Acquired {
    Raw(RawContent),
    Structured(StructuredProfile),
}

#[derive(Debug)]
enum Stage {
    Acquire,
    Validate(RawContent),
    GeneratePrimary(Acquired),
    Degraded(PipelineFailure),
    GenerateFallback(PipelineFailure),
    Done(Outcome),
}

/// Shared across requests behind an `Arc`; holds no per-run state.
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    documents: Arc<dyn DocumentSource>,
    profiles: Arc<dyn ProfileApi>,
    heuristics: PageHeuristics,
    profile_host: String,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        documents: Arc<dyn DocumentSource>,
        profiles: Arc<dyn ProfileApi>,
        heuristics: PageHeuristics,
        profile_host: String,
    ) -> Self {
        Self {
            generator,
            documents,
            profiles,
            heuristics,
            profile_host,
        }
    }

    /// Runs the pipeline once. Never fails: every error ends up explained in the result.
    pub async fn run(
        &self,
        request: &EnrichmentRequest,
        strategy: AcquisitionStrategy,
    ) -> EnrichmentResult {
        let identifier = match resolve_profile_url(&request.profile_url, &self.profile_host) {
            Ok(identifier) => identifier,
            Err(e) => {
                warn!(input = %request.profile_url, "profile URL rejected: {e}");
                return assemble(
                    Outcome::Terminal {
                        failures: vec![e.into()],
                        insufficient_context: false,
                    },
                    &request.profile_url,
                );
            }
        };

        let span = info_span!(
            "enrichment",
            username = %identifier.username,
            strategy = ?strategy
        );
        let run = EnrichmentRun {
            orchestrator: self,
            identifier: &identifier,
            dashboard: request.dashboard(),
            strategy,
        };
        let outcome = run.execute().instrument(span).await;
        assemble(outcome, &identifier.username)
    }
}

/// State of a single run. Lives only for the duration of `Orchestrator::run`.
struct EnrichmentRun<'a> {
    orchestrator: &'a Orchestrator,
    identifier: &'a ProfileIdentifier,
    dashboard: DashboardContext,
    strategy: AcquisitionStrategy,
}

impl EnrichmentRun<'_> {
    async fn execute(&self) -> Outcome {
        let mut stage = Stage::Acquire;
        loop {
            stage = match stage {
                Stage::Acquire => self.acquire().await,
                Stage::Validate(raw) => self.validate(raw),
                Stage::GeneratePrimary(acquired) => self.generate_primary(acquired).await,
                Stage::Degraded(failure) => self.degrade(failure),
                Stage::GenerateFallback(cause) => self.generate_fallback(cause).await,
                Stage::Done(outcome) => return outcome,
            };
        }
    }

    fn username(&self) -> String {
        self.identifier.username.clone()
    }

    async fn acquire(&self) -> Stage {
        let acquired = match self.strategy {
            AcquisitionStrategy::RawDocument => self
                .orchestrator
                .documents
                .fetch_document(&self.identifier.source_url)
                .await
                .map(Stage::Validate),
            AcquisitionStrategy::StructuredApi => self
                .orchestrator
                .profiles
                .fetch_profile(&self.identifier.username)
                .await
                .map(|profile| Stage::GeneratePrimary(Acquired::Structured(profile))),
        };

        match acquired {
            Ok(next) => {
                info!("acquisition succeeded");
                next
            }
            Err(error) => {
                warn!(kind = %error.kind, status = ?error.status, "acquisition failed: {}", error.detail);
                Stage::Degraded(PipelineFailure::Acquisition {
                    username: self.username(),
                    error,
                })
            }
        }
    }

    fn validate(&self, raw: RawContent) -> Stage {
        let verdict = classify(&raw, &self.orchestrator.heuristics);
        if verdict.is_usable() {
            info!(
                length = raw.length,
                content_type = ?raw.content_type,
                "fetched content is usable"
            );
            Stage::GeneratePrimary(Acquired::Raw(raw))
        } else {
            warn!(verdict = verdict.category(), "fetched content rejected: {verdict}");
            Stage::Degraded(PipelineFailure::Quality {
                username: self.username(),
                verdict,
            })
        }
    }

    async fn generate_primary(&self, acquired: Acquired) -> Stage {
        let prompt = match &acquired {
            Acquired::Raw(raw) => build_enhance_prompt(self.identifier, raw, &self.dashboard),
            Acquired::Structured(profile) => build_shortlist_prompt(profile, &self.dashboard),
        };

        match self.generate(&prompt).await {
            Ok(generated) => {
                info!(skills = generated.skill_suggestions.len(), "primary generation succeeded");
                Stage::Done(Outcome::Primary(generated))
            }
            Err(e) => {
                warn!("primary generation failed: {e}");
                Stage::Done(Outcome::Terminal {
                    failures: vec![PipelineFailure::Generation {
                        username: self.username(),
                        detail: e.to_string(),
                    }],
                    insufficient_context: false,
                })
            }
        }
    }

    fn degrade(&self, failure: PipelineFailure) -> Stage {
        if self.dashboard.is_empty() {
            info!("no dashboard context, skipping generation");
            Stage::Done(Outcome::Terminal {
                failures: vec![failure],
                insufficient_context: true,
            })
        } else {
            Stage::GenerateFallback(failure)
        }
    }

    async fn generate_fallback(&self, cause: PipelineFailure) -> Stage {
        info!(
            cause = %cause.category(),
            skills = self.dashboard.skills.len(),
            projects = self.dashboard.projects.len(),
            "falling back to dashboard-only generation"
        );
        let prompt = build_fallback_prompt(&self.dashboard);

        match self.generate(&prompt).await {
            Ok(generated) => Stage::Done(Outcome::Fallback {
                generated,
                declared_skills: self.dashboard.skills.clone(),
                cause,
            }),
            Err(e) => {
                warn!("fallback generation failed: {e}");
                Stage::Done(Outcome::Terminal {
                    failures: vec![
                        cause,
                        PipelineFailure::Generation {
                            username: self.username(),
                            detail: e.to_string(),
                        },
                    ],
                    insufficient_context: false,
                })
            }
        }
    }

    /// One call to the generation capability, decoded into the expected shape.
    async fn generate(&self, prompt: &str) -> Result<GeneratedProfile, GenerationError> {
        let value = self
            .orchestrator
            .generator
            .generate(prompt, ENRICHMENT_SYSTEM)
            .await?;
        let generated: GeneratedProfile = serde_json::from_value(value)
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        if generated.bio_suggestion.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(generated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

fn build_enhance_prompt(
    identifier: &ProfileIdentifier,
    raw: &RawContent,
    dashboard: &DashboardContext,
) -> String {
    PROFILE_ENHANCE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{profile_url}", &identifier.source_url)
        .replace("{dashboard_block}", &dashboard_block(dashboard))
        .replace("{page_content}", &raw.text)
}

fn build_shortlist_prompt(profile: &StructuredProfile, dashboard: &DashboardContext) -> String {
    let or_missing = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("Not provided")
            .to_string()
    };

    let profile_block = format!(
        "Username: {}\nName: {}\nBio: {}\nLocation: {}\nPublic Repositories Count: {}\nFollowers: {}\nFollowing: {}",
        profile.username,
        or_missing(&profile.display_name),
        or_missing(&profile.bio),
        or_missing(&profile.location),
        profile.public_repo_count,
        profile.followers,
        profile.following,
    );

    let repositories_block = if profile.repositories.is_empty() {
        "No public repositories found or provided.".to_string()
    } else {
        profile
            .repositories
            .iter()
            .map(|repo| {
                format!(
                    "- Name: {} ({})\n  Stars: {}\n  Description: {}\n  Last Updated: {}\n  URL: {}",
                    repo.name,
                    repo.language.as_deref().unwrap_or("N/A"),
                    repo.stars,
                    repo.description.as_deref().unwrap_or("No description."),
                    repo.updated_at.to_rfc3339(),
                    repo.url,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    CANDIDATE_SHORTLIST_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{profile_block}", &profile_block)
        .replace("{repositories_block}", &repositories_block)
        .replace("{dashboard_block}", &dashboard_block(dashboard))
}

fn build_fallback_prompt(dashboard: &DashboardContext) -> String {
    DASHBOARD_FALLBACK_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{disclosure}", DASHBOARD_DISCLOSURE)
        .replace("{dashboard_block}", &dashboard_block(dashboard))
}

fn dashboard_block(dashboard: &DashboardContext) -> String {
    let mut block = String::new();

    if dashboard.skills.is_empty() {
        block.push_str("DASHBOARD SKILLS: None\n");
    } else {
        block.push_str("DASHBOARD SKILLS:\n");
        for skill in &dashboard.skills {
            block.push_str(&format!("- {skill}\n"));
        }
    }

    if dashboard.projects.is_empty() {
        block.push_str("DASHBOARD PROJECTS: None");
    } else {
        block.push_str("DASHBOARD PROJECTS:");
        for project in &dashboard.projects {
            block.push_str(&format!("\n- Project Title: {}", project.title));
            if let Some(description) = project.description.as_deref().filter(|d| !d.trim().is_empty())
            {
                block.push_str(&format!("\n  Project Description: {description}"));
            }
        }
    }

    block
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
