//! Styled HTML rendering, used when a PDF cannot be produced

use html_escape::encode_text;

use super::layout::paragraphs;
use super::ExportDocument;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;max-width:40em;margin:2em auto;padding:0 1em;line-height:1.5;color:#000}\
h1{text-align:center;font-size:1.5em;margin-bottom:.2em}\
.timestamp{text-align:center;color:#666;font-size:.85em;margin-bottom:2em}\
footer{text-align:center;color:#808080;font-size:.75em;margin-top:3em}";

/// Render a standalone HTML page
pub fn render_html(document: &ExportDocument) -> String {
    let mut html = String::with_capacity(document.content.len() + 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", encode_text(&document.title)));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", encode_text(&document.title)));
    html.push_str(&format!(
        "<p class=\"timestamp\">{}</p>\n",
        encode_text(&document.timestamp)
    ));
    for paragraph in paragraphs(&document.content) {
        html.push_str(&format!("<p>{}</p>\n", encode_text(&paragraph)));
    }
    html.push_str(&format!("<footer>{}</footer>\n", encode_text(&document.footer)));
    html.push_str("</body>\n</html>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_escaped() {
        let document = ExportDocument {
            title: "Summary: <script>".to_string(),
            timestamp: "now".to_string(),
            content: "a < b & c\n\nsecond".to_string(),
            footer: "footer".to_string(),
        };

        let html = render_html(&document);

        assert!(html.contains("<h1>Summary: &lt;script&gt;</h1>"));
        assert!(html.contains("<p>a &lt; b &amp; c</p>"));
        assert!(html.contains("<p>second</p>"));
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches("<footer>").count(), 1);
    }
}
