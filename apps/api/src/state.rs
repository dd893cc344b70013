use std::sync::Arc;

use crate::config::Config;
use crate::improvement::generator::SuggestionGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable suggestion generator. Default: RuleBasedSuggestionGenerator.
    /// Swap via ENABLE_LLM_SUGGESTIONS.
    pub suggestion_generator: Arc<dyn SuggestionGenerator>,
}
