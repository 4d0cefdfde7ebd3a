pub mod error;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::ApiError;
pub use openai::OpenAiProvider;
pub use provider::CompletionProvider;
pub use types::*;
