// Shared prompt constants and prompt-building utilities.
// Each flow that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Common instruction appended to all generation prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim you generate must be supported by the data provided below. \
    Do NOT infer, interpolate, or invent details, employers, projects, or skills. \
    If the data does not support a claim, omit it entirely.";
