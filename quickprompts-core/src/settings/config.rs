use serde::{Deserialize, Serialize};

/// Model used for completion calls when the user has not picked one.
pub const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";

/// Non-secret application settings.
///
/// The API credential deliberately does not live here - it belongs to the
/// keychain-backed [`crate::storage::SecretStore`], keyed independently from
/// the rest of the settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Completion model chosen on the settings surface, if any.
    #[serde(default)]
    pub selected_model_id: Option<String>,
}

impl Settings {
    /// The model to use for API calls: the selected one, or the default.
    pub fn model_id(&self) -> &str {
        self.selected_model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID)
    }
}
