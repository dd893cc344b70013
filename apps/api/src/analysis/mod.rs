// Résumé Scoring & Gap Analyzer.
// Deterministic: no LLM calls anywhere below this module.

pub mod analyzer;
pub mod handlers;
pub mod keywords;
pub mod patterns;
pub mod rules;
pub mod score;
pub mod sections;
pub mod text;
