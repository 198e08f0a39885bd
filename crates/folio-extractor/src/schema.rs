//! Extraction schema loading and validation

use crate::error::ExtractorError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Context used when the schema file does not provide one
pub const DEFAULT_ADDITIONAL_CONTEXT: &str = "No specific context provided.";

/// Declared value type of a schema field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text
    #[default]
    String,
    /// Sequence of strings
    ListOfStrings,
    /// Integer or decimal
    Number,
    /// `true` or `false`
    Boolean,
}

impl FieldType {
    /// Name used in schema files and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::ListOfStrings => "list_of_strings",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field the model is asked to extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Key used in the extracted record
    pub name: String,

    /// What the model should look for
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Expected value type
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub field_type: FieldType,

    /// Any other keys (allowed values, examples), passed to the model as written
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// User-supplied description of the fields to pull from each document
///
/// Loaded once per run and immutable afterwards. The field list is
/// guaranteed non-empty with unique names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    /// Free-text guidance for the model
    #[serde(
        default = "default_additional_context",
        deserialize_with = "null_as_default_context"
    )]
    pub additional_context: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

fn default_additional_context() -> String {
    DEFAULT_ADDITIONAL_CONTEXT.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_default_context<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|context| context.unwrap_or_else(default_additional_context))
}

impl ExtractionSchema {
    /// Load and validate a schema from a JSON file
    pub fn load(path: &Path) -> Result<Self, ExtractorError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ExtractorError::SchemaNotFound(path.display().to_string()));
            }
            Err(e) => {
                return Err(ExtractorError::InvalidSchema(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let schema = Self::from_json(&content)?;
        debug!(
            "Loaded schema from {} with {} fields",
            path.display(),
            schema.fields.len()
        );
        Ok(schema)
    }

    /// Parse and validate a schema from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ExtractorError> {
        let schema: Self = serde_json::from_str(json)
            .map_err(|e| ExtractorError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check the field list invariants
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.fields.is_empty() {
            return Err(ExtractorError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(ExtractorError::InvalidSchema(
                    "Field names must not be empty".to_string(),
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ExtractorError::InvalidSchema(format!(
                    "Duplicate field name: {}",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render the field list as pretty JSON for embedding in a prompt
    pub fn fields_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }
}
