//! Plain-text rendering

use super::layout::paragraphs;
use super::ExportDocument;

pub fn render_text(document: &ExportDocument) -> String {
    let mut out = String::new();
    out.push_str(&document.title);
    out.push('\n');
    out.push_str(&document.timestamp);
    out.push_str("\n\n");
    for paragraph in paragraphs(&document.content) {
        out.push_str(&paragraph);
        out.push_str("\n\n");
    }
    out.push_str("-- \n");
    out.push_str(&document.footer);
    out.push('\n');
    out
}
