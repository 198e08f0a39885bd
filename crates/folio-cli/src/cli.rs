//! CLI argument parsing.

use clap::{ArgAction, Parser};
use folio_extractor::OutputFormat;
use std::path::PathBuf;

/// Folio - Extract structured metadata from PDF files with Gemini.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output file for the aggregated results
    #[arg(short, long, default_value = "extraction_results.json")]
    pub output: PathBuf,

    /// Gemini model to use [default: from settings, else gemini-2.5-flash-lite-preview-06-17]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory containing the PDF files
    #[arg(short, long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Search subdirectories of the input directory as well
    #[arg(long)]
    pub recursive: bool,

    /// Path to the JSON extraction schema
    #[arg(short, long, default_value = "extraction_schema.json")]
    pub schema: PathBuf,

    /// Sampling temperature [default: from settings, else 0.0]
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Extract text locally and embed it in the prompt instead of uploading the file
    #[arg(long)]
    pub text_mode: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = CliFormat::Json)]
    pub format: CliFormat,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Settings file path [default: ~/.folio/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// JSON array (default)
    Json,
    /// CSV with flattened columns
    Csv,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Csv => OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["folio", "--api-key", "k"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("extraction_results.json"));
        assert_eq!(cli.input_dir, PathBuf::from("."));
        assert_eq!(cli.schema, PathBuf::from("extraction_schema.json"));
        assert_eq!(cli.format, CliFormat::Json);
        assert!(cli.model.is_none());
        assert!(cli.temperature.is_none());
        assert!(!cli.recursive);
        assert!(!cli.text_mode);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "folio", "-o", "out.csv", "-m", "gemini-2.5-pro", "-i", "papers", "-s",
            "schema.json", "-t", "0.4", "--text-mode", "--recursive", "--format", "csv", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(cli.input_dir, PathBuf::from("papers"));
        assert_eq!(cli.schema, PathBuf::from("schema.json"));
        assert_eq!(cli.temperature, Some(0.4));
        assert!(cli.text_mode);
        assert!(cli.recursive);
        assert_eq!(OutputFormat::from(cli.format), OutputFormat::Csv);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["folio", "--format", "xml"]).is_err());
    }
}
