//! Document values exchanged with the external capabilities

/// Handle to a document staged in the model service's temporary storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Resource name used to delete the file (e.g. `files/abc123`)
    pub name: String,

    /// URI referenced from generation requests
    pub uri: String,

    /// MIME type reported by the service
    pub mime_type: String,
}

/// Text extracted locally from a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenated text of every page
    pub text: String,

    /// Number of pages in the source document
    pub page_count: usize,
}

impl ExtractedText {
    /// Create a new extracted text value
    pub fn new(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            text: text.into(),
            page_count,
        }
    }

    /// True when no readable text was found (image-only or empty PDF)
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
