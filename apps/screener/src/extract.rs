//! Resume text extraction for PDF and DOCX files.
//!
//! Extraction is local and deterministic; there are no retries. Every decode
//! failure is mapped to an `ExtractError` so a single corrupt file can never
//! take down a batch run.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

/// File extensions the pipeline accepts, lowercase, without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: '{0}' (supported: pdf, docx)")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Lowercased extension of a path, or an empty string when it has none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Whether the path carries one of the supported resume extensions.
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Extracts the plain text of a resume file.
///
/// Validates existence and extension before touching the decoder; the decoder
/// is only invoked for formats it is known to handle.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound(path.display().to_string()));
    }

    match extension_of(path).as_str() {
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

/// Extracts text from in-memory upload bytes, for callers that receive
/// resumes over the wire rather than from disk.
///
/// The bytes are spooled to a temporary file carrying the original extension;
/// the file is removed when the handle drops, on success and failure alike.
#[allow(dead_code)]
pub fn extract_upload(original_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let ext = extension_of(Path::new(original_name));
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ExtractError::UnsupportedFormat(ext));
    }

    let mut tmp = tempfile::Builder::new()
        .suffix(&format!(".{ext}"))
        .tempfile()
        .map_err(|e| ExtractError::Io {
            path: original_name.to_string(),
            source: e,
        })?;
    tmp.write_all(bytes).map_err(|e| ExtractError::Io {
        path: original_name.to_string(),
        source: e,
    })?;

    extract_text(tmp.path())
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    // pdf-extract is known to panic on some malformed documents; a corrupt
    // file must surface as a Decode error, not a crash.
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return Err(ExtractError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(ExtractError::Decode {
                path: path.display().to_string(),
                reason: "PDF decoder panicked".to_string(),
            })
        }
    };

    debug!("extracted {} chars from {}", text.len(), path.display());
    Ok(text.trim().to_string())
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    let text = paragraphs.join("\n");
    debug!("extracted {} chars from {}", text.len(), path.display());
    Ok(text.trim().to_string())
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(text) = run_child {
                    out.push_str(&text.text);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::fs::File;

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let file = File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = extract_text(Path::new("/nonexistent/resume.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(_)));
    }

    #[test]
    fn test_unsupported_extension_is_rejected_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "plain text resume").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.DOCX");
        write_docx(&path, &["Skills: Rust"]);

        assert!(is_supported(&path));
        assert_eq!(extract_text(&path).unwrap(), "Skills: Rust");
    }

    #[test]
    fn test_docx_paragraphs_joined_with_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(&path, &["Jane Doe", "Software Engineer", "Skills: Rust, Python"]);

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "Jane Doe\nSoftware Engineer\nSkills: Rust, Python");
    }

    #[test]
    fn test_corrupt_docx_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }

    #[test]
    fn test_corrupt_pdf_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.4 garbage").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }

    #[test]
    fn test_upload_roundtrip_extracts_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(&path, &["Uploaded resume body"]);
        let bytes = std::fs::read(&path).unwrap();

        let text = extract_upload("resume.docx", &bytes).unwrap();
        assert_eq!(text, "Uploaded resume body");
    }

    #[test]
    fn test_upload_with_unsupported_name_never_touches_disk() {
        let err = extract_upload("resume.odt", b"whatever").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == "odt"));
    }

    #[test]
    fn test_upload_failure_still_reports_decode_error() {
        let err = extract_upload("resume.pdf", b"not really a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }
}
