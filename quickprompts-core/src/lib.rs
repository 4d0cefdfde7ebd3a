pub mod ai;
pub mod prompt;
pub mod settings;
pub mod storage;
pub mod transfer;

// Public library API - front-ends (CLI, future GUIs) should only need these
// types, but everything is public so go nuts.
pub use ai::provider::CompletionProvider;
pub use prompt::store::{Direction, MutationOutcome, PromptStore, StoreError};
pub use prompt::types::{Prompt, PromptDraft};
pub use settings::{Settings, SettingsManager};
pub use storage::{PromptStorage, SecretStore, StorageError};
