//! File-format dispatch: bytes or a path on disk → [`ParsedCv`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::document::Document;
use crate::parsing::sections::extract_sections;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No text could be extracted from the document")]
    NoText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    /// Detects the format from a file name's extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Result<Self, ParseError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" | "doc" => Ok(DocumentFormat::Docx),
            "txt" | "text" | "md" => Ok(DocumentFormat::Text),
            "" => Err(ParseError::UnsupportedFormat(format!(
                "'{name}' has no file extension"
            ))),
            other => Err(ParseError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Raw text and its sectioned form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCv {
    pub format: DocumentFormat,
    pub raw_text: String,
    pub document: Document,
}

/// Extracts text in the given format and splits it into sections.
pub fn parse_bytes(format: DocumentFormat, bytes: &[u8]) -> Result<ParsedCv, ParseError> {
    let raw_text = match format {
        DocumentFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(format!("{e:?}")))?
        }
        DocumentFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
        DocumentFormat::Docx => {
            return Err(ParseError::UnsupportedFormat(
                "DOCX documents are not supported; upload a PDF or plain text file".to_string(),
            ))
        }
    };

    parse_text_as(format, raw_text)
}

/// Sections plain text that is already in memory.
pub fn parse_text(text: &str) -> Result<ParsedCv, ParseError> {
    parse_text_as(DocumentFormat::Text, text.to_string())
}

/// Reads a file and parses it according to its extension.
#[cfg(test)]
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedCv, ParseError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_file_name(&path.to_string_lossy())?;
    let bytes = std::fs::read(path)?;
    parse_bytes(format, &bytes)
}

fn parse_text_as(format: DocumentFormat, raw_text: String) -> Result<ParsedCv, ParseError> {
    if raw_text.trim().is_empty() {
        return Err(ParseError::NoText);
    }

    let document = extract_sections(&raw_text);
    debug!(
        "Parsed {:?} document: {} sections, {} words",
        format,
        document.sections().len(),
        document.word_count()
    );

    Ok(ParsedCv {
        format,
        raw_text,
        document,
    })
}
