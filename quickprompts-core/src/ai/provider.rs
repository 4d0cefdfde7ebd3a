use crate::ai::error::ApiError;
use crate::ai::types::{CategorySuggestion, EnhancementTurn, ModelInfo};
use crate::prompt::types::Prompt;

/// The completion service seam. Each method is a single fallible remote
/// call: no retries, no streaming.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Chat-capable models the configured credential can use.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;

    /// Suggest a concise category for each prompt. Suggestions come back
    /// keyed by prompt id; prompts the model skipped simply have no entry.
    async fn suggest_categories(
        &self,
        prompts: &[Prompt],
        model_id: &str,
    ) -> Result<Vec<CategorySuggestion>, ApiError>;

    /// Rewrite `text` into a better prompt. `history` carries earlier
    /// iterations of the same exchange; `feedback` steers this one.
    async fn enhance_prompt(
        &self,
        model_id: &str,
        text: &str,
        history: &[EnhancementTurn],
        feedback: Option<&str>,
    ) -> Result<String, ApiError>;
}
