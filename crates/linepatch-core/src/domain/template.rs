//! Template domain entities.
//!
//! A [`Template`] is a named collection of [`ConfigItem`]s.  Each item is one
//! logical configuration value that may be mirrored across several
//! [`FileTarget`]s, and each target pins that value to a single line of a text
//! file using a prefix/suffix pair:
//!
//! ```text
//! <anything>prefix<VALUE>[suffix<anything>]
//! ```
//!
//! # Serialisation
//!
//! Templates are persisted and exchanged as JSON with camelCase field names.
//! The `items` and `targets` lists are always written (empty, never `null`),
//! and a record that omits them or stores `null` reads back as an empty list.
//! `suffix` is omitted when empty and the transient `currentValue` is omitted
//! when it has not been populated.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A named, persisted collection of configuration items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Assigned on first save, immutable afterwards.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<ConfigItem>,
}

/// One logical configuration value, possibly written to several files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub targets: Vec<FileTarget>,
    /// Value read from the first target when serving a read request.
    ///
    /// Never persisted: the store clears it before writing a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
}

/// A precise `(file, line, prefix, suffix)` coordinate of an embedded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTarget {
    #[serde(default)]
    pub id: String,
    pub file_path: String,
    /// 1-based line number.  A negative number in JSON reads as `0`, which
    /// is out of range for every file.
    #[serde(deserialize_with = "negative_as_zero")]
    pub line_number: usize,
    pub prefix: String,
    /// Empty string means "no suffix": the value runs to the end of the line.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
}

/// A line that matched a prefix/suffix search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 1-based line number.
    pub line_number: usize,
    /// The full, unmodified line text.
    pub line_content: String,
}

/// The unit of work of a patch batch: write `new_value` at `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationTask {
    pub target: FileTarget,
    pub new_value: String,
}

impl Template {
    /// Fills every empty template, item and target identifier with a fresh
    /// UUID v4.  Identifiers that are already set are left untouched.
    pub fn assign_missing_ids(&mut self) {
        fill_id(&mut self.id);
        for item in &mut self.items {
            fill_id(&mut item.id);
            for target in &mut item.targets {
                fill_id(&mut target.id);
            }
        }
    }

    /// Drops every transient `current_value`.
    pub fn clear_current_values(&mut self) {
        for item in &mut self.items {
            item.current_value = None;
        }
    }

    /// Finds an item by identifier, falling back to a name match.
    pub fn item_by_key(&self, key: &str) -> Option<&ConfigItem> {
        self.items
            .iter()
            .find(|item| !item.id.is_empty() && item.id == key)
            .or_else(|| self.items.iter().find(|item| item.name == key))
    }
}

impl FileTarget {
    /// Convenience constructor used by callers that build targets by hand.
    pub fn new(
        file_path: impl Into<String>,
        line_number: usize,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            file_path: file_path.into(),
            line_number,
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

fn fill_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn negative_as_zero<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(usize::try_from(i64::deserialize(deserializer)?).unwrap_or(0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> Template {
        Template {
            id: String::new(),
            name: "database".to_string(),
            description: "connection settings".to_string(),
            items: vec![ConfigItem {
                id: String::new(),
                name: "port".to_string(),
                description: String::new(),
                default_value: "5432".to_string(),
                targets: vec![
                    FileTarget::new("/etc/app/a.conf", 3, "port=", ";"),
                    FileTarget::new("/etc/app/b.conf", 7, "PORT ", ""),
                ],
                current_value: None,
            }],
        }
    }

    // ── Identifier assignment ─────────────────────────────────────────────────

    #[test]
    fn test_assign_missing_ids_fills_every_level() {
        // Arrange
        let mut template = sample_template();

        // Act
        template.assign_missing_ids();

        // Assert
        assert!(!template.id.is_empty());
        assert!(!template.items[0].id.is_empty());
        assert!(template.items[0].targets.iter().all(|t| !t.id.is_empty()));
    }

    #[test]
    fn test_assign_missing_ids_keeps_existing_ids() {
        let mut template = sample_template();
        template.id = "tpl-1".to_string();
        template.items[0].targets[1].id = "target-b".to_string();

        template.assign_missing_ids();

        assert_eq!(template.id, "tpl-1");
        assert_eq!(template.items[0].targets[1].id, "target-b");
        assert_ne!(template.items[0].targets[0].id, "target-b");
    }

    #[test]
    fn test_assign_missing_ids_generates_distinct_ids() {
        let mut template = sample_template();
        template.assign_missing_ids();
        let targets = &template.items[0].targets;
        assert_ne!(targets[0].id, targets[1].id);
    }

    #[test]
    fn test_clear_current_values_drops_transient_field() {
        let mut template = sample_template();
        template.items[0].current_value = Some("5432".to_string());

        template.clear_current_values();

        assert_eq!(template.items[0].current_value, None);
    }

    // ── Item lookup ───────────────────────────────────────────────────────────

    #[test]
    fn test_item_by_key_prefers_id_then_name() {
        let mut template = sample_template();
        template.items[0].id = "item-1".to_string();

        assert!(template.item_by_key("item-1").is_some());
        assert!(template.item_by_key("port").is_some());
        assert!(template.item_by_key("missing").is_none());
    }

    #[test]
    fn test_item_by_key_does_not_match_empty_id() {
        let template = sample_template();
        assert!(template.item_by_key("").is_none());
    }

    // ── JSON shape ────────────────────────────────────────────────────────────

    #[test]
    fn test_serialize_uses_camel_case_field_names() {
        let json = serde_json::to_string(&sample_template()).expect("serialize");

        assert!(json.contains("\"defaultValue\""));
        assert!(json.contains("\"filePath\""));
        assert!(json.contains("\"lineNumber\""));
    }

    #[test]
    fn test_serialize_omits_empty_suffix_and_unset_current_value() {
        let json = serde_json::to_value(sample_template()).expect("serialize");
        let item = &json["items"][0];

        assert!(item.get("currentValue").is_none());
        assert_eq!(item["targets"][0]["suffix"], ";");
        assert!(item["targets"][1].get("suffix").is_none());
    }

    #[test]
    fn test_serialize_writes_empty_lists_not_null() {
        let template = Template {
            name: "empty".to_string(),
            ..Template::default()
        };

        let json = serde_json::to_value(&template).expect("serialize");

        assert_eq!(json["items"], serde_json::json!([]));
    }

    #[test]
    fn test_deserialize_null_and_missing_lists_as_empty() {
        // Arrange: `items: null` at the top, `targets` missing on the item
        let raw = r#"{
            "id": "t1",
            "name": "n",
            "description": "",
            "items": null
        }"#;
        let raw_item = r#"{"id": "i1", "name": "x", "description": "", "defaultValue": ""}"#;

        // Act
        let template: Template = serde_json::from_str(raw).expect("template");
        let item: ConfigItem = serde_json::from_str(raw_item).expect("item");

        // Assert
        assert!(template.items.is_empty());
        assert!(item.targets.is_empty());
    }

    #[test]
    fn test_deserialize_target_without_suffix_reads_empty_string() {
        let raw = r#"{"id":"x","filePath":"a.txt","lineNumber":2,"prefix":"k="}"#;
        let target: FileTarget = serde_json::from_str(raw).expect("target");
        assert_eq!(target.suffix, "");
        assert_eq!(target.line_number, 2);
    }

    #[test]
    fn test_deserialize_negative_line_number_reads_as_zero() {
        let raw = r#"{"filePath":"a.txt","lineNumber":-3,"prefix":"k="}"#;

        let target: FileTarget = serde_json::from_str(raw).expect("target");

        assert_eq!(target.line_number, 0);
    }
}
