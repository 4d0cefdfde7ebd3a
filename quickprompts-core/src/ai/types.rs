use serde::{Deserialize, Serialize};

/// A model advertised by the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub owned_by: String,
}

/// One suggested category for one prompt, keyed by the prompt's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestion {
    pub prompt_id: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhanceRole {
    User,
    Assistant,
}

/// An earlier turn of an enhancement exchange, replayed so the model can
/// refine its previous suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementTurn {
    pub role: EnhanceRole,
    pub content: String,
}

impl EnhancementTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: EnhanceRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: EnhanceRole::Assistant,
            content: content.into(),
        }
    }
}
