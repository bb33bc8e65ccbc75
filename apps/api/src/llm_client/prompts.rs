// Shared prompt fragments. Each pipeline stage defines its own prompts in
// pipeline/prompts.rs; this file only holds cross-cutting pieces.

/// Appended to every instruction that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST return ONLY a valid JSON object. \
    Do not include any explanation text.";
