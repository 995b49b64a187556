//! Summary export
//!
//! Turns a stored summary into a downloadable artifact. PDF is the primary
//! format; if it cannot be produced the renderer falls back to HTML, so
//! `render` itself never fails.
//!
//! # Modules
//!
//! - `layout`: pagination and word wrapping
//! - `metrics`: Helvetica glyph widths and WinAnsi encoding
//! - `pdf`: PDF serialization via lopdf
//! - `html`, `text`: markup and plain-text renderings

mod html;
pub mod layout;
pub mod metrics;
mod pdf;
mod text;

pub use html::render_html;
pub use layout::{layout, Page, PageGeometry};
pub use pdf::write_pdf;
pub use text::render_text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::Summary;

/// Footer printed once at the end of every export
pub const EXPORT_FOOTER: &str = "Generated by SciSummarize";

/// PDF rendering errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Character {0:?} cannot be encoded with the standard PDF fonts")]
    UnsupportedCharacter(char),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested or produced artifact format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Html,
    #[serde(alias = "txt")]
    Text,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Text => "txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Text => "text",
        }
    }
}

/// The text blocks every export format shows
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    pub timestamp: String,
    pub content: String,
    pub footer: String,
}

impl ExportDocument {
    pub fn from_summary(summary: &Summary, display_name: &str) -> Self {
        Self {
            title: format!("Summary: {}", display_name),
            timestamp: format!(
                "Generated on {} (version {})",
                summary.created_at.format("%Y-%m-%d %H:%M UTC"),
                summary.version
            ),
            content: summary.content.clone(),
            footer: EXPORT_FOOTER.to_string(),
        }
    }
}

/// A rendered export
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    /// Format actually produced, which differs from the request on fallback
    pub format: ExportFormat,
}

/// Renders summaries into artifacts
#[derive(Debug, Clone, Default)]
pub struct ExportRenderer {
    geometry: PageGeometry,
}

impl ExportRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    /// Render `summary` in the requested format
    ///
    /// CPU bound; async callers should run it on the blocking pool.
    pub fn render(
        &self,
        summary: &Summary,
        display_name: &str,
        format: ExportFormat,
    ) -> ExportArtifact {
        let document = ExportDocument::from_summary(summary, display_name);

        let (bytes, produced) = match format {
            ExportFormat::Pdf => match self.render_pdf(&document) {
                Ok(bytes) => (bytes, ExportFormat::Pdf),
                Err(e) => {
                    tracing::warn!(
                        document_id = %summary.document_id,
                        version = summary.version,
                        "PDF export failed, falling back to HTML: {}",
                        e
                    );
                    (render_html(&document).into_bytes(), ExportFormat::Html)
                }
            },
            ExportFormat::Html => (render_html(&document).into_bytes(), ExportFormat::Html),
            ExportFormat::Text => (render_text(&document).into_bytes(), ExportFormat::Text),
        };

        tracing::debug!(
            document_id = %summary.document_id,
            format = produced.as_str(),
            bytes = bytes.len(),
            "Rendered summary export"
        );

        ExportArtifact {
            bytes,
            filename: export_filename(display_name, &summary.document_id.to_string(), produced),
            content_type: produced.content_type(),
            format: produced,
        }
    }

    fn render_pdf(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let pages = layout(document, &self.geometry);
        write_pdf(&pages, &self.geometry, &document.title)
    }
}

/// `summary_<name>_<id prefix>.<ext>`
pub fn export_filename(display_name: &str, document_id: &str, format: ExportFormat) -> String {
    let id_prefix: String = document_id.chars().take(8).collect();
    format!(
        "summary_{}_{}.{}",
        sanitize_display_name(display_name),
        id_prefix,
        format.extension()
    )
}

/// Reduce a display name to a filename-safe stem
pub fn sanitize_display_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = match trimmed.len().checked_sub(4) {
        Some(cut) if trimmed.is_char_boundary(cut) && trimmed[cut..].eq_ignore_ascii_case(".pdf") => {
            &trimmed[..cut]
        }
        _ => trimmed,
    };

    let mut sanitized = String::with_capacity(stem.len());
    for ch in stem.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' {
            ch
        } else if ch.is_whitespace() || matches!(ch, '_' | '.' | '/' | '\\') {
            '_'
        } else {
            continue;
        };
        if mapped == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(mapped);
    }

    let sanitized: String = sanitized.trim_matches('_').chars().take(64).collect();
    if sanitized.is_empty() {
        "document".to_string()
    } else {
        sanitized
    }
}
