use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::prompt::types::Prompt;

/// The only export schema version this build reads or writes.
pub const EXPORT_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid export file: {0}")]
    Format(String),

    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The interchange document for export/import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u64,
    pub exported_at: String,
    pub prompts: Vec<Prompt>,
}

/// Wrap the collection for export, stamped with the current time.
pub fn export_document(prompts: Vec<Prompt>) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        prompts,
    }
}

/// Timestamped default file name for an export, safe for filesystems that
/// reject colons.
pub fn export_file_name() -> String {
    let stamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("quickprompts-export-{stamp}.json")
}

pub fn write_export(path: &Path, prompts: Vec<Prompt>) -> Result<(), TransferError> {
    let document = export_document(prompts);
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_import(path: &Path) -> Result<ExportDocument, TransferError> {
    let raw = fs::read_to_string(path)?;
    parse_import(&raw)
}

/// Validate and decode an export document. Rejects anything that is not a
/// version-1 document with an `exportedAt` string and a `prompts` array of
/// records carrying string `id` and `text`; nothing is ever partially
/// imported.
pub fn parse_import(raw: &str) -> Result<ExportDocument, TransferError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TransferError::Format(format!("not valid JSON: {e}")))?;
    let Some(object) = value.as_object() else {
        return Err(TransferError::Format("expected a JSON object".to_string()));
    };

    match object.get("version").and_then(Value::as_u64) {
        Some(EXPORT_VERSION) => {}
        Some(other) => {
            return Err(TransferError::Format(format!(
                "unsupported version {other}, expected {EXPORT_VERSION}"
            )))
        }
        None => return Err(TransferError::Format("missing version field".to_string())),
    }

    if !object.get("exportedAt").is_some_and(Value::is_string) {
        return Err(TransferError::Format(
            "missing exportedAt timestamp".to_string(),
        ));
    }

    let Some(records) = object.get("prompts").and_then(Value::as_array) else {
        return Err(TransferError::Format("missing prompts array".to_string()));
    };
    for (index, record) in records.iter().enumerate() {
        let shape_ok = record.get("id").is_some_and(Value::is_string)
            && record.get("text").is_some_and(Value::is_string);
        if !shape_ok {
            return Err(TransferError::Format(format!(
                "prompt at index {index} is missing a string id or text"
            )));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| TransferError::Format(format!("malformed export document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn prompt(id: &str) -> Prompt {
        Prompt {
            id: id.to_string(),
            name: "Name".to_string(),
            text: "Text".to_string(),
            category: "Cat".to_string(),
            color: "#3b82f6".to_string(),
            icon: "brain".to_string(),
        }
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        let prompts = vec![prompt("1"), prompt("2")];

        write_export(&path, prompts.clone()).unwrap();
        let document = read_import(&path).unwrap();

        assert_eq!(document.version, EXPORT_VERSION);
        assert_eq!(document.prompts, prompts);
        // exportedAt is a parseable ISO-8601 timestamp.
        assert!(chrono::DateTime::parse_from_rfc3339(&document.exported_at).is_ok());
    }

    #[test]
    fn future_version_is_rejected() {
        let raw = r#"{"version": 2, "exportedAt": "2025-01-01T00:00:00.000Z", "prompts": []}"#;
        let err = parse_import(raw).unwrap_err();
        assert!(matches!(err, TransferError::Format(_)));
        assert!(err.to_string().contains("unsupported version 2"));
    }

    #[test]
    fn missing_prompts_array_is_rejected() {
        let raw = r#"{"version": 1, "exportedAt": "2025-01-01T00:00:00.000Z"}"#;
        assert!(matches!(
            parse_import(raw),
            Err(TransferError::Format(_))
        ));
    }

    #[test]
    fn missing_or_non_string_exported_at_is_rejected() {
        let raw = r#"{"version": 1, "prompts": []}"#;
        assert!(matches!(parse_import(raw), Err(TransferError::Format(_))));

        let raw = r#"{"version": 1, "exportedAt": 12345, "prompts": []}"#;
        assert!(matches!(parse_import(raw), Err(TransferError::Format(_))));
    }

    #[test]
    fn record_without_id_or_text_is_rejected() {
        let raw = r#"{
            "version": 1,
            "exportedAt": "2025-01-01T00:00:00.000Z",
            "prompts": [{"id": "1", "text": "ok"}, {"name": "no id"}]
        }"#;
        let err = parse_import(raw).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(parse_import("[]").is_err());
        assert!(parse_import("not json").is_err());
    }

    #[test]
    fn export_file_name_is_filesystem_safe() {
        let name = export_file_name();
        assert!(name.starts_with("quickprompts-export-"));
        assert!(name.ends_with(".json"));
        assert!(!name.trim_end_matches(".json").contains(':'));
        assert!(!name.trim_end_matches(".json").contains('.'));
    }
}
