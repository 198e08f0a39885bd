//! Types for extraction requests, results, and batch outcomes

use crate::schema::{ExtractionSchema, FieldType};
use folio_domain::ProcessingMode;
use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::PathBuf;

/// Metadata key holding the document's basename
pub const FILENAME_KEY: &str = "filename";
/// Metadata key holding the processing mode
pub const PROCESSING_MODE_KEY: &str = "processing_mode";
/// Metadata key holding the page count (text mode only)
pub const PAGE_COUNT_KEY: &str = "page_count";

/// A single value returned by the model
///
/// The model's own type discipline is trusted; the variant reflects what
/// came back, not what the schema declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON string
    String(String),
    /// JSON array whose elements are all strings
    StringList(Vec<String>),
    /// JSON number
    Number(Number),
    /// JSON boolean
    Boolean(bool),
    /// JSON null
    Null,
    /// Anything else (objects, mixed arrays)
    Unknown(Value),
}

impl FieldValue {
    /// Short name of the value's shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::StringList(_) => "list_of_strings",
            FieldValue::Number(_) => "number",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Null => "null",
            FieldValue::Unknown(Value::Object(_)) => "object",
            FieldValue::Unknown(Value::Array(_)) => "array",
            FieldValue::Unknown(_) => "unknown",
        }
    }

    /// Whether the value is acceptable for a declared type (null always is)
    pub fn conforms_to(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (FieldValue::Null, _)
                | (FieldValue::String(_), FieldType::String)
                | (FieldValue::StringList(_), FieldType::ListOfStrings)
                | (FieldValue::Number(_), FieldType::Number)
                | (FieldValue::Boolean(_), FieldType::Boolean)
        )
    }

    /// Convert back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Null => Value::Null,
            FieldValue::Unknown(v) => v.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::StringList(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => FieldValue::Unknown(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::StringList(items) => items.serialize(serializer),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Unknown(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

/// Insertion-ordered record of extracted values
///
/// Inserting an existing key replaces its value in place.
pub type Fields = IndexMap<String, FieldValue>;

/// Convert a JSON object into a record, keeping its key order
pub fn fields_from_map(map: Map<String, Value>) -> Fields {
    map.into_iter()
        .map(|(key, value)| (key, FieldValue::from(value)))
        .collect()
}

/// Authoritative facts about a processed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Basename of the source file
    pub filename: String,
    /// How the document reached the model
    pub processing_mode: ProcessingMode,
    /// Page count, known only in text mode
    pub page_count: Option<usize>,
}

impl DocumentMetadata {
    /// Metadata entries in output order
    pub fn entries(&self) -> Vec<(&'static str, FieldValue)> {
        let mut entries = vec![
            (FILENAME_KEY, FieldValue::String(self.filename.clone())),
            (
                PROCESSING_MODE_KEY,
                FieldValue::String(self.processing_mode.as_str().to_string()),
            ),
        ];
        if let Some(pages) = self.page_count {
            entries.push((PAGE_COUNT_KEY, FieldValue::Number(Number::from(pages))));
        }
        entries
    }

    fn is_metadata_key(key: &str) -> bool {
        matches!(key, FILENAME_KEY | PROCESSING_MODE_KEY | PAGE_COUNT_KEY)
    }
}

/// One document to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Path to the PDF
    pub file_path: PathBuf,
    /// Invocation strategy
    pub mode: ProcessingMode,
}

impl ExtractionRequest {
    /// Create a request
    pub fn new(file_path: impl Into<PathBuf>, mode: ProcessingMode) -> Self {
        Self {
            file_path: file_path.into(),
            mode,
        }
    }

    /// Basename of the file
    pub fn filename(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Extracted fields merged with document metadata
///
/// Serializes as a single flat JSON object. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    record: Fields,
    metadata: DocumentMetadata,
}

impl ExtractionResult {
    /// Merge model output with metadata; metadata wins on key collisions
    pub fn merge(fields: Fields, metadata: DocumentMetadata) -> Self {
        let mut record = fields;
        for (key, value) in metadata.entries() {
            record.insert(key.to_string(), value);
        }
        Self { record, metadata }
    }

    /// The merged record
    pub fn record(&self) -> &Fields {
        &self.record
    }

    /// The authoritative metadata
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Value of a merged key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.record.get(key)
    }

    /// Compare extracted values against the schema's declared types
    ///
    /// Reports values whose shape differs from the declared type and keys
    /// the schema does not declare. Metadata keys are exempt.
    pub fn validate_against(&self, schema: &ExtractionSchema) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for (key, value) in &self.record {
            if DocumentMetadata::is_metadata_key(key) {
                continue;
            }
            match schema.field(key) {
                Some(field) if !value.conforms_to(field.field_type) => {
                    issues.push(FieldIssue::TypeMismatch {
                        field: key.to_string(),
                        expected: field.field_type,
                        found: value.kind(),
                    });
                }
                Some(_) => {}
                None => issues.push(FieldIssue::Undeclared(key.to_string())),
            }
        }
        issues
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// Disagreement between a result and the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// Value shape differs from the declared type
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared type
        expected: FieldType,
        /// Shape actually returned
        found: &'static str,
    },
    /// Key not declared in the schema
    Undeclared(String),
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{}' expected {}, got {}", field, expected, found),
            FieldIssue::Undeclared(key) => write!(f, "key '{}' is not declared in the schema", key),
        }
    }
}

/// A document that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Basename of the source file
    pub filename: String,
    /// Human-readable reason
    pub reason: String,
}

/// Results and failures of a batch run, in processing order
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successfully processed documents
    pub results: Vec<ExtractionResult>,
    /// Skipped documents
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    /// Number of documents attempted
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(page_count: Option<usize>) -> DocumentMetadata {
        DocumentMetadata {
            filename: "report.pdf".to_string(),
            processing_mode: if page_count.is_some() {
                ProcessingMode::Text
            } else {
                ProcessingMode::File
            },
            page_count,
        }
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(json!("a")), FieldValue::String("a".into()));
        assert_eq!(
            FieldValue::from(json!(["a", "b"])),
            FieldValue::StringList(vec!["a".into(), "b".into()])
        );
        assert_eq!(FieldValue::from(json!(true)), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert!(matches!(FieldValue::from(json!(3.5)), FieldValue::Number(_)));
        assert!(matches!(
            FieldValue::from(json!([1, "a"])),
            FieldValue::Unknown(_)
        ));
        assert!(matches!(
            FieldValue::from(json!({"city": "Oslo"})),
            FieldValue::Unknown(_)
        ));
    }

    #[test]
    fn test_fields_keep_insertion_order_and_replace_in_place() {
        let mut fields = Fields::new();
        fields.insert("b".to_string(), FieldValue::from("1"));
        fields.insert("a".to_string(), FieldValue::from("2"));
        let replaced = fields.insert("b".to_string(), FieldValue::from("3"));

        assert_eq!(replaced, Some(FieldValue::from("1")));
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(fields.get("b"), Some(&FieldValue::from("3")));
    }

    #[test]
    fn test_merge_metadata_wins() {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), FieldValue::from("Annual Report"));
        fields.insert("filename".to_string(), FieldValue::from("guessed.pdf"));

        let result = ExtractionResult::merge(fields, metadata(None));

        assert_eq!(result.get("filename"), Some(&FieldValue::from("report.pdf")));
        assert_eq!(result.get("processing_mode"), Some(&FieldValue::from("file")));
        assert!(result.get("page_count").is_none());
        assert_eq!(result.get("title"), Some(&FieldValue::from("Annual Report")));
    }

    #[test]
    fn test_merge_text_mode_adds_page_count() {
        let result = ExtractionResult::merge(Fields::new(), metadata(Some(12)));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({"filename": "report.pdf", "processing_mode": "text", "page_count": 12})
        );
    }

    #[test]
    fn test_serialize_preserves_order() {
        let fields: Fields = serde_json::from_str(r#"{"z": 1, "a": [ "x" ], "m": null}"#).unwrap();
        let result = ExtractionResult::merge(fields, metadata(None));

        let rendered = serde_json::to_string(&result).unwrap();
        assert_eq!(
            rendered,
            r#"{"z":1,"a":["x"],"m":null,"filename":"report.pdf","processing_mode":"file"}"#
        );
    }

    #[test]
    fn test_validate_against_schema() {
        let schema = ExtractionSchema::from_json(
            r#"{"fields": [
                {"name": "title"},
                {"name": "year", "type": "number"},
                {"name": "keywords", "type": "list_of_strings"}
            ]}"#,
        )
        .unwrap();
        let fields: Fields = serde_json::from_str(
            r#"{"title": "X", "year": "1999", "keywords": null, "extra": true}"#,
        )
        .unwrap();
        let result = ExtractionResult::merge(fields, metadata(Some(3)));

        let issues = result.validate_against(&schema);
        assert_eq!(
            issues,
            vec![
                FieldIssue::TypeMismatch {
                    field: "year".into(),
                    expected: FieldType::Number,
                    found: "string",
                },
                FieldIssue::Undeclared("extra".into()),
            ]
        );
        assert_eq!(issues[0].to_string(), "field 'year' expected number, got string");
    }

    #[test]
    fn test_request_filename_is_basename() {
        let request = ExtractionRequest::new("/data/in/paper.PDF", ProcessingMode::File);
        assert_eq!(request.filename(), "paper.PDF");
    }
}
