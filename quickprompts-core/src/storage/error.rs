use thiserror::Error;

/// Failures of the durable stores. A mutation that surfaces one of these was
/// not applied; the previously persisted state is intact.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("keychain access failed: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("could not determine home directory")]
    NoHomeDir,
}
