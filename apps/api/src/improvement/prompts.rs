// LLM prompt templates for the improvement module.
// The system prompt is the shared llm_client::prompts::JSON_ONLY_SYSTEM.

/// Suggestion prompt template.
/// Replace: {target_role}, {observations}, {missing_keywords}, {cv_text}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"You are an expert CV reviewer and career coach.
Suggest concrete, truthful improvements to the CV below for a {target_role} application.

KNOWN WEAKNESSES:
{observations}

MISSING KEYWORDS:
{missing_keywords}

Return a JSON object with this EXACT schema (no extra fields):
{
  "improvements": [
    {
      "section": "experience",
      "kind": "content",
      "original_text": "exact text copied from the CV that should be replaced",
      "improved_text": "the improved version",
      "reasoning": "why this change helps",
      "priority": "high",
      "confidence": 0.85
    }
  ]
}

Rules:
- "kind" is one of "content", "format", "keyword", "structure".
- "priority" is one of "high", "medium", "low".
- "confidence" is a number between 0 and 1.
- "original_text" MUST be copied verbatim from the CV, or be "" for advice with no single anchor.
- Never invent employers, dates, degrees or metrics that the CV does not support.
- Return at most 8 improvements, most valuable first.

CV:
{cv_text}"#;
