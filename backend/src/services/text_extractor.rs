//! Document Text Extractor
//!
//! Interface boundary only: file-format parsing is delegated to libraries
//! (pdf-extract for PDF, the zip container for DOC/DOCX). Output feeds the
//! analysis pipeline, which does its own whitespace cleanup.

use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::{ApiError, ApiResult};

/// Convert an uploaded file into plain text, dispatching on the extension.
pub fn extract_text(filename: &str, bytes: &[u8]) -> ApiResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => extract_from_pdf(bytes),
        "doc" | "docx" => extract_from_docx(bytes),
        "txt" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(ApiError::invalid_data(format!("Unsupported file type: '{}'", filename))),
    }
}

fn extract_from_pdf(bytes: &[u8]) -> ApiResult<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ApiError::invalid_data(format!("Failed to read PDF: {}", e)))
}

static XML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid tag pattern"));

/// DOCX is a zip container; the document body lives in word/document.xml.
/// Paragraph ends become newlines, remaining markup is stripped.
fn extract_from_docx(bytes: &[u8]) -> ApiResult<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| ApiError::invalid_data(format!("Failed to read document container: {}", e)))?;

    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| ApiError::invalid_data("Document body not found in container"))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ApiError::invalid_data(format!("Failed to read document body: {}", e)))?;

    let with_breaks = xml.replace("</w:p>", "\n");
    let text = XML_TAG.replace_all(&with_breaks, "");

    Ok(text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'"))
}
