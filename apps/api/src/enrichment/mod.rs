// Profile enrichment pipeline.
// Resolve → acquire → validate → generate (primary, else dashboard fallback) → assemble.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod acquisition;
pub mod assembler;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod resolver;
pub mod validator;
