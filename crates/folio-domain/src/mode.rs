//! Processing mode - how a document reaches the model

use std::fmt;

/// Strategy used to hand a document to the model service
///
/// - File: the original PDF is uploaded and referenced from the request
/// - Text: text is extracted locally and embedded in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingMode {
    /// Upload the document to the model service
    #[default]
    File,

    /// Extract text locally and embed it in the prompt
    Text,
}

impl ProcessingMode {
    /// Get the mode name as it appears in output records
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::File => "file",
            ProcessingMode::Text => "text",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!(ProcessingMode::File.as_str(), "file");
        assert_eq!(ProcessingMode::Text.to_string(), "text");
    }

    #[test]
    fn test_default_is_file_mode() {
        assert_eq!(ProcessingMode::default(), ProcessingMode::File);
    }
}
