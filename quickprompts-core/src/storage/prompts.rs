use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::prompt::types::Prompt;
use crate::storage::error::StorageError;

const PROMPTS_FILE: &str = "prompts.json";

/// Default on-disk location for QuickPrompts data (`~/.quickprompts`).
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    let home = dirs::home_dir().ok_or(StorageError::NoHomeDir)?;
    Ok(home.join(".quickprompts"))
}

/// The prompt collection file. The whole collection is one JSON array,
/// replaced wholesale on every save.
#[derive(Debug, Clone)]
pub struct PromptStorage {
    path: PathBuf,
}

impl PromptStorage {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self::at(default_data_dir()?.join(PROMPTS_FILE)))
    }

    /// Use a specific file instead of the default location.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(PROMPTS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored collection. A missing file is an empty collection.
    /// Data that does not decode to an array of records with string `id` and
    /// `text` is treated as missing: a best-effort repair write resets the
    /// file and the empty collection is returned.
    pub fn load_all(&self) -> Result<Vec<Prompt>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        match serde_json::from_str::<Vec<Prompt>>(&raw) {
            Ok(prompts) => Ok(prompts),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "corrupt prompt data, resetting to empty");
                if let Err(e) = self.save_all(&[]) {
                    warn!(error = %e, "repair write failed");
                }
                Ok(Vec::new())
            }
        }
    }

    /// Serialize and persist the full collection, replacing any prior value.
    /// The data goes to a temporary sibling first and is renamed into place,
    /// so a failed write never leaves a partial file behind.
    pub fn save_all(&self, prompts: &[Prompt]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(prompts)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::types::{DEFAULT_COLOR, DEFAULT_ICON};
    use tempfile::TempDir;

    fn prompt(id: &str, text: &str) -> Prompt {
        Prompt {
            id: id.to_string(),
            name: format!("prompt {id}"),
            text: text.to_string(),
            category: String::new(),
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());

        assert!(storage.load_all().unwrap().is_empty());
        // Loading must not create the file.
        assert!(!storage.path().exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());
        let prompts = vec![prompt("1", "first"), prompt("2", "second")];

        storage.save_all(&prompts).unwrap();
        assert_eq!(storage.load_all().unwrap(), prompts);
    }

    #[test]
    fn load_save_load_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());
        storage.save_all(&[prompt("1", "alpha")]).unwrap();

        let first = fs::read_to_string(storage.path()).unwrap();
        let loaded = storage.load_all().unwrap();
        storage.save_all(&loaded).unwrap();
        let second = fs::read_to_string(storage.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_json_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());
        fs::write(storage.path(), "{ not json").unwrap();

        assert!(storage.load_all().unwrap().is_empty());
        // The repair write replaced the corrupt payload.
        let repaired = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(repaired.trim(), "[]");
    }

    #[test]
    fn wrong_shape_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());
        // Valid JSON, but not an array of records with id and text.
        fs::write(storage.path(), r#"{"prompts": []}"#).unwrap();
        assert!(storage.load_all().unwrap().is_empty());

        fs::write(storage.path(), r#"[{"id": 7, "text": "x"}]"#).unwrap();
        assert!(storage.load_all().unwrap().is_empty());

        fs::write(storage.path(), r#"[{"id": "7"}]"#).unwrap();
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn records_missing_display_fields_get_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = PromptStorage::in_dir(dir.path());
        fs::write(storage.path(), r#"[{"id": "9", "text": "bare"}]"#).unwrap();

        let loaded = storage.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].color, DEFAULT_COLOR);
        assert_eq!(loaded[0].icon, DEFAULT_ICON);
        assert!(loaded[0].name.is_empty());
        assert!(loaded[0].category.is_empty());
    }

    #[test]
    fn save_failure_reports_error() {
        let dir = TempDir::new().unwrap();
        // Parent path is a file, so create_dir_all must fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let storage = PromptStorage::at(blocker.join(PROMPTS_FILE));

        let result = storage.save_all(&[prompt("1", "text")]);
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
