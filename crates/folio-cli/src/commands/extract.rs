//! Extract command implementation.

use crate::cli::Cli;
use crate::config::{validate_temperature, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_domain::{LlmProvider, ProcessingMode, TextExtractor};
use folio_extractor::{
    discover_pdfs, format_file_size, write_results, BatchEvent, BatchOutcome, ExtractionSchema,
    Extractor, ExtractorError, OutputFormat, PdfTextBackend, SYSTEM_INSTRUCTION,
};
use folio_llm::GeminiProvider;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute the extraction run.
pub async fn execute_extract(cli: &Cli, config: &Config, formatter: &Formatter) -> Result<()> {
    let api_key = resolve_api_key(cli.api_key.as_deref())?;
    let temperature = cli.temperature.unwrap_or(config.settings.temperature);
    validate_temperature(temperature)?;
    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| config.settings.model.clone());

    let (schema, paths) = prepare_inputs(&cli.input_dir, &cli.schema, cli.recursive)?;
    let mode = if cli.text_mode {
        ProcessingMode::Text
    } else {
        ProcessingMode::File
    };

    println!(
        "{}",
        formatter.info(&format!(
            "Found {} PDF file(s) ({}) in {}",
            paths.len(),
            format_file_size(total_size(&paths)),
            cli.input_dir.display()
        ))
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Model: {} | Mode: {} | Schema fields: {}",
            model,
            mode,
            schema.fields.len()
        ))
    );

    let provider = GeminiProvider::new(&config.settings.endpoint, model, api_key)?
        .with_temperature(temperature)
        .with_system_instruction(SYSTEM_INSTRUCTION)
        .with_timeout(config.settings.request_timeout());
    let extractor = Extractor::new(provider, PdfTextBackend::new(), config.extractor.clone());

    run_extraction(
        &extractor,
        &schema,
        &paths,
        mode,
        &cli.output,
        cli.format.into(),
        formatter,
    )
    .await?;
    Ok(())
}

/// Return the API key, or a configuration error when it is missing or blank.
pub fn resolve_api_key(api_key: Option<&str>) -> Result<&str> {
    api_key.filter(|key| !key.trim().is_empty()).ok_or_else(|| {
        CliError::Config(
            "GEMINI_API_KEY is not set. Export it or pass --api-key.".to_string(),
        )
    })
}

/// Startup checks, in order: input directory, schema, at least one PDF.
pub fn prepare_inputs(
    input_dir: &Path,
    schema_path: &Path,
    recursive: bool,
) -> Result<(ExtractionSchema, Vec<PathBuf>)> {
    if !input_dir.is_dir() {
        return Err(ExtractorError::InputDirNotFound(input_dir.display().to_string()).into());
    }
    let schema = ExtractionSchema::load(schema_path)?;
    let paths = discover_pdfs(input_dir, recursive)?;
    debug!("Prepared {} documents, {} schema fields", paths.len(), schema.fields.len());
    Ok((schema, paths))
}

/// Process every document, then write the results once.
///
/// Nothing is written when no document succeeded.
pub async fn run_extraction<L, P>(
    extractor: &Extractor<L, P>,
    schema: &ExtractionSchema,
    paths: &[PathBuf],
    mode: ProcessingMode,
    output: &Path,
    format: OutputFormat,
    formatter: &Formatter,
) -> Result<BatchOutcome>
where
    L: LlmProvider,
    L::Error: Display,
    P: TextExtractor + 'static,
    P::Error: Into<ExtractorError> + Send + 'static,
{
    let bar = progress_bar(paths.len() as u64);

    let outcome = extractor
        .extract_batch(paths, schema, mode, |event| match event {
            BatchEvent::Started { filename, .. } => {
                bar.set_message(format!("Processing {}", filename));
            }
            BatchEvent::Succeeded { filename, .. } => {
                bar.suspend(|| println!("{}", formatter.document_succeeded(filename)));
                bar.inc(1);
            }
            BatchEvent::Failed { filename, error } => {
                bar.suspend(|| {
                    println!("{}", formatter.document_failed(filename, &error.to_string()))
                });
                bar.inc(1);
            }
        })
        .await;
    bar.finish_and_clear();

    if outcome.results.is_empty() {
        println!(
            "{}",
            formatter.warning("Could not extract data from any of the PDF files. Nothing was saved.")
        );
        return Ok(outcome);
    }

    write_results(&outcome.results, output, format)?;
    info!("Saved {} results as {}", outcome.results.len(), format);
    println!(
        "{}",
        formatter.summary(
            outcome.results.len(),
            outcome.total(),
            &output.display().to_string()
        )
    );
    Ok(outcome)
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} ({elapsed})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn total_size(paths: &[PathBuf]) -> u64 {
    paths
        .iter()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum()
}
