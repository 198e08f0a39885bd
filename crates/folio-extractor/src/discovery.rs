//! Locate PDF files in an input directory

use crate::error::ExtractorError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// List the PDF files under `dir`, sorted by path
///
/// Only the directory's own entries are considered unless `recursive` is
/// set. The `.pdf` extension is matched case-insensitively.
pub fn discover_pdfs(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ExtractorError> {
    if !dir.is_dir() {
        return Err(ExtractorError::InputDirNotFound(dir.display().to_string()));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_pdf_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ExtractorError::NoDocuments(dir.display().to_string()));
    }

    debug!("Discovered {} PDF files in {}", files.len(), dir.display());
    Ok(files)
}

/// Whether the path has a `.pdf` extension (any case)
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"%PDF-1.4\n").unwrap();
    }

    #[test]
    fn test_flat_discovery() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.pdf"));
        touch(&dir.path().join("a.PDF"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("c.pdf"));

        let files = discover_pdfs(dir.path(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_recursive_discovery() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.pdf"));
        fs::create_dir_all(dir.path().join("sub").join("deeper")).unwrap();
        touch(&dir.path().join("sub").join("deeper").join("c.pdf"));

        let files = discover_pdfs(dir.path(), true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("sub/deeper/c.pdf")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_pdfs(&dir.path().join("nope"), false);
        assert!(matches!(result, Err(ExtractorError::InputDirNotFound(_))));
    }

    #[test]
    fn test_no_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("readme.md"));
        let result = discover_pdfs(dir.path(), true);
        assert!(matches!(result, Err(ExtractorError::NoDocuments(_))));
    }

    #[test]
    fn test_is_pdf_path() {
        assert!(is_pdf_path(Path::new("x.pdf")));
        assert!(is_pdf_path(Path::new("x.Pdf")));
        assert!(!is_pdf_path(Path::new("x.pdfx")));
        assert!(!is_pdf_path(Path::new("pdf")));
    }
}
