//! Plain text extraction from stored PDF binaries

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use mupdf::{Document, TextPageOptions};

use crate::pipeline::SummaryError;

/// Produces the plain text of a stored document
///
/// Implementations are synchronous and may be CPU heavy; the pipeline calls
/// them from the blocking thread pool.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, location: &Path) -> Result<String, SummaryError>;
}

/// MuPDF-backed extractor
///
/// Opens a fresh document per call. MuPDF documents are not `Send`, so
/// nothing is cached across calls.
#[derive(Debug, Clone, Default)]
pub struct MupdfTextExtractor;

impl MupdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for MupdfTextExtractor {
    fn extract(&self, location: &Path) -> Result<String, SummaryError> {
        check_pdf_header(location)?;

        let path_str = location.to_string_lossy();
        let doc = Document::open(&*path_str).map_err(corrupt)?;
        let page_count = doc.page_count().map_err(corrupt)?;

        let mut text = String::new();
        for page_idx in 0..page_count {
            let page = doc.load_page(page_idx).map_err(corrupt)?;
            let text_page = page
                .to_text_page(TextPageOptions::empty())
                .map_err(corrupt)?;

            // Pages are concatenated without separators; every line already
            // ends with a newline.
            for block in text_page.blocks() {
                for line in block.lines() {
                    for ch in line.chars() {
                        if let Some(c) = ch.char() {
                            text.push(c);
                        }
                    }
                    text.push('\n');
                }
            }
        }

        tracing::debug!(
            path = %location.display(),
            pages = page_count,
            chars = text.len(),
            "Extracted document text"
        );

        if text.trim().is_empty() {
            return Err(SummaryError::EmptyContent);
        }

        Ok(text)
    }
}

/// Missing binaries are `NotFound` and unreadable ones a storage fault;
/// anything without a PDF signature is rejected before MuPDF sees it.
fn check_pdf_header(location: &Path) -> Result<(), SummaryError> {
    let mut file = File::open(location).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            SummaryError::NotFound(format!("Document file {}", location.display()))
        }
        _ => SummaryError::Storage(e.into()),
    })?;

    let mut header = [0u8; 5];
    let mut filled = 0;
    while filled < header.len() {
        match file.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SummaryError::Storage(e.into())),
        }
    }

    if &header[..filled] != b"%PDF-" {
        return Err(SummaryError::Corrupt("missing PDF header".to_string()));
    }

    Ok(())
}

fn corrupt(e: mupdf::Error) -> SummaryError {
    SummaryError::Corrupt(e.to_string())
}
