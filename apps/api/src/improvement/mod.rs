// Improvement suggestions and their application to a CV.
// LLM calls go through llm_client only.

pub mod apply;
pub mod generator;
pub mod models;
pub mod prompts;
pub mod questions;
