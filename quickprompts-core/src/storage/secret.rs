use keyring::Entry;
use tracing::debug;

use crate::storage::error::StorageError;

const SERVICE: &str = "quickprompts";
const ACCOUNT: &str = "api-key";

/// The API credential, kept in the OS keychain and never written next to the
/// ordinary data files.
pub struct SecretStore {
    service: String,
    account: String,
}

impl SecretStore {
    pub fn new() -> Self {
        Self::scoped(SERVICE, ACCOUNT)
    }

    /// Use a non-default keychain entry (tests use per-test accounts).
    pub fn scoped(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    pub fn load(&self) -> Result<Option<String>, StorageError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store the credential. An empty value deletes the entry outright, so
    /// the keychain never holds an empty string.
    pub fn save(&self, value: &str) -> Result<(), StorageError> {
        let entry = self.entry()?;
        if value.is_empty() {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {
                    debug!("credential cleared");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        } else {
            entry.set_password(value)?;
            Ok(())
        }
    }

    fn entry(&self) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}
