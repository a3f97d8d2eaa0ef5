// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction keeping generated facts tied to the source document.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every fact you state about the candidate must appear in the CV text provided. \
    Do NOT infer, interpolate, or invent details. \
    If the CV does not support a claim, omit it or answer \"unknown\".";
