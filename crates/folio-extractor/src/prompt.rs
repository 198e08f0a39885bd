//! Prompt templates for schema-guided extraction

use crate::schema::ExtractionSchema;

/// Role message given to the model as its system instruction
pub const SYSTEM_INSTRUCTION: &str = "You are a highly intelligent and meticulous data \
extraction assistant. Your sole purpose is to read documents and extract specific \
information into a structured JSON format, following the user's schema precisely.";

const INSTRUCTIONS: &str = r#"Your task is to analyze the provided document and extract information as specified by the schema below.

### INSTRUCTIONS
1.  **Read the Schema**: Each schema entry gives a `name` (the JSON key to use), a `description` of the information to find, and the expected `type` of the value.
2.  **Scan the Document**: Read the whole document and locate the information matching each `description`.
3.  **Build the JSON Object**: Produce a single JSON object whose keys exactly match the `name` values in the schema. Do not rename, add, or omit keys.
4.  **Missing Information**: If a piece of information cannot be found, use the JSON value `null` for that key.
5.  **Value Types**: Give each value the declared `type`: `string` as a JSON string, `list_of_strings` as a JSON array of strings, `number` as a JSON number, `boolean` as `true` or `false`.
6.  **Output Format**: Respond with the JSON object only. Do not include explanations or conversational text, and do not wrap the output in markdown code fences."#;

/// What the prompt is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContext<'a> {
    /// The document is attached to the request as a staged file
    File,
    /// The document's extracted text is embedded in the prompt
    Text {
        /// Full extracted text
        document_text: &'a str,
    },
}

/// Builds extraction prompts for one schema
pub struct PromptBuilder<'a> {
    schema: &'a ExtractionSchema,
    context: PromptContext<'a>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for file mode
    pub fn new(schema: &'a ExtractionSchema) -> Self {
        Self {
            schema,
            context: PromptContext::File,
        }
    }

    /// Embed the document text (text mode)
    pub fn with_document_text(mut self, document_text: &'a str) -> Self {
        self.context = PromptContext::Text { document_text };
        self
    }

    /// Render the prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("### ADDITIONAL CONTEXT\n");
        prompt.push_str(&self.schema.additional_context);
        prompt.push_str("\n\n");

        prompt.push_str("### EXTRACTION SCHEMA\n```json\n");
        prompt.push_str(&self.schema.fields_json());
        prompt.push_str("\n```\n");

        if let PromptContext::Text { document_text } = self.context {
            prompt.push_str("\n### DOCUMENT TEXT\n");
            prompt.push_str(document_text);
            prompt.push('\n');
        }

        prompt
    }
}

/// Render a prompt for the given context
pub fn build(schema: &ExtractionSchema, context: PromptContext<'_>) -> String {
    match context {
        PromptContext::File => PromptBuilder::new(schema).build(),
        PromptContext::Text { document_text } => PromptBuilder::new(schema)
            .with_document_text(document_text)
            .build(),
    }
}

/// Prompt for a document supplied as a staged file
pub fn file_mode_prompt(schema: &ExtractionSchema) -> String {
    build(schema, PromptContext::File)
}

/// Prompt embedding the document's extracted text
pub fn text_mode_prompt(schema: &ExtractionSchema, document_text: &str) -> String {
    build(schema, PromptContext::Text { document_text })
}
