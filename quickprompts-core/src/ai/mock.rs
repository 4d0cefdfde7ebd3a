use std::sync::{Arc, Mutex};

use crate::ai::error::ApiError;
use crate::ai::provider::CompletionProvider;
use crate::ai::types::{CategorySuggestion, EnhancementTurn, ModelInfo};
use crate::prompt::types::Prompt;

/// Behavior of the mock provider.
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Suggest "General" for every prompt; enhancement appends " (enhanced)".
    #[default]
    Echo,
    /// Return fixed payloads.
    Canned {
        suggestions: Vec<CategorySuggestion>,
        enhanced: String,
    },
    /// Fail every call with a typed API error.
    AlwaysError,
}

/// Completion provider for tests: no network, scripted behavior, counts
/// calls so tests can assert exactly one request per operation.
#[derive(Clone)]
pub struct MockProvider {
    behavior: Arc<Mutex<MockBehavior>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn record_call(&self) -> MockBehavior {
        *self.call_count.lock().unwrap() += 1;
        self.behavior.lock().unwrap().clone()
    }

    fn mock_error() -> ApiError {
        ApiError::Api {
            message: "mock failure".to_string(),
            kind: Some("mock_error".to_string()),
            code: None,
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        match self.record_call() {
            MockBehavior::AlwaysError => Err(Self::mock_error()),
            _ => Ok(vec![ModelInfo {
                id: "gpt-4o-mini".to_string(),
                owned_by: "mock".to_string(),
            }]),
        }
    }

    async fn suggest_categories(
        &self,
        prompts: &[Prompt],
        _model_id: &str,
    ) -> Result<Vec<CategorySuggestion>, ApiError> {
        match self.record_call() {
            MockBehavior::Echo => Ok(prompts
                .iter()
                .map(|p| CategorySuggestion {
                    prompt_id: p.id.clone(),
                    category: "General".to_string(),
                })
                .collect()),
            MockBehavior::Canned { suggestions, .. } => Ok(suggestions),
            MockBehavior::AlwaysError => Err(Self::mock_error()),
        }
    }

    async fn enhance_prompt(
        &self,
        _model_id: &str,
        text: &str,
        _history: &[EnhancementTurn],
        _feedback: Option<&str>,
    ) -> Result<String, ApiError> {
        match self.record_call() {
            MockBehavior::Echo => Ok(format!("{text} (enhanced)")),
            MockBehavior::Canned { enhanced, .. } => Ok(enhanced),
            MockBehavior::AlwaysError => Err(Self::mock_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::types::PromptDraft;
    use crate::prompt::PromptStore;
    use crate::storage::prompts::PromptStorage;
    use tempfile::TempDir;

    fn store_with_one_prompt() -> (TempDir, PromptStore, Prompt) {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::open(PromptStorage::in_dir(dir.path())).unwrap();
        let prompt = store
            .create(PromptDraft::new("Explain this code"))
            .unwrap();
        (dir, store, prompt)
    }

    #[tokio::test]
    async fn echo_behavior_suggests_for_every_prompt() {
        let provider = MockProvider::new(MockBehavior::Echo);
        let (_dir, store, prompt) = store_with_one_prompt();

        let suggestions = provider
            .suggest_categories(&store.prompts(), "gpt-4o-mini")
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].prompt_id, prompt.id);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn suggestions_can_be_applied_to_the_store() {
        let provider = MockProvider::new(MockBehavior::Echo);
        let (_dir, store, prompt) = store_with_one_prompt();

        let suggestions = provider
            .suggest_categories(&store.prompts(), "gpt-4o-mini")
            .await
            .unwrap();
        let applied = store.apply_categories(&suggestions).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(store.get(&prompt.id).unwrap().category, "General");

        // Applying the same suggestions again changes nothing.
        assert_eq!(store.apply_categories(&suggestions).unwrap(), 0);
    }

    #[tokio::test]
    async fn error_behavior_carries_the_typed_triple() {
        let provider = MockProvider::new(MockBehavior::AlwaysError);

        let err = provider.list_models().await.unwrap_err();
        let ApiError::Api { message, kind, .. } = err else {
            panic!("expected Api variant");
        };
        assert_eq!(message, "mock failure");
        assert_eq!(kind.as_deref(), Some("mock_error"));
    }

    #[tokio::test]
    async fn enhance_echoes_with_marker() {
        let provider = MockProvider::new(MockBehavior::Echo);
        let enhanced = provider
            .enhance_prompt("gpt-4o-mini", "write a haiku", &[], None)
            .await
            .unwrap();
        assert_eq!(enhanced, "write a haiku (enhanced)");
    }
}
