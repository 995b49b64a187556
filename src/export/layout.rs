//! Page layout for exported summaries
//!
//! Lines are placed top-down with a moving cursor. Coordinates here are
//! measured from the top-left corner of the page; the PDF writer flips them.

use std::mem;

use super::metrics::BaseFont;
use super::ExportDocument;

/// Physical page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// ISO A4 with one-inch margins
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 72.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest point a line may reach
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Typographic role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Timestamp,
    Body,
    Footer,
}

impl LineStyle {
    pub fn font(self) -> BaseFont {
        match self {
            LineStyle::Title => BaseFont::HelveticaBold,
            _ => BaseFont::Helvetica,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            LineStyle::Title => 18.0,
            LineStyle::Timestamp => 10.0,
            LineStyle::Body => 11.0,
            LineStyle::Footer => 9.0,
        }
    }

    /// Vertical advance per line
    pub fn leading(self) -> f32 {
        match self {
            LineStyle::Title => 24.0,
            LineStyle::Timestamp => 14.0,
            LineStyle::Body => 16.0,
            LineStyle::Footer => 12.0,
        }
    }

    pub fn centered(self) -> bool {
        !matches!(self, LineStyle::Body)
    }

    /// Fill gray level, 0.0 is black
    pub fn gray(self) -> f32 {
        match self {
            LineStyle::Title | LineStyle::Body => 0.0,
            LineStyle::Timestamp => 0.4,
            LineStyle::Footer => 0.5,
        }
    }
}

const GAP_AFTER_TITLE: f32 = 4.0;
const GAP_AFTER_HEADER: f32 = 18.0;
const GAP_BETWEEN_PARAGRAPHS: f32 = 8.0;
const GAP_BEFORE_FOOTER: f32 = 24.0;

/// A line of text at its final position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    pub x: f32,
    /// Baseline distance from the top edge
    pub baseline: f32,
}

/// One laid-out page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of every line with the given style, in placement order
    pub fn texts(&self, style: LineStyle) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |line| line.style == style)
            .map(|line| line.text.as_str())
    }
}

/// Lay out a document onto as many pages as it needs
///
/// Always returns at least one page. The footer appears exactly once, after
/// the last paragraph.
pub fn layout(document: &ExportDocument, geometry: &PageGeometry) -> Vec<Page> {
    let mut cursor = Cursor::new(*geometry);

    cursor.place_wrapped(&document.title, LineStyle::Title);
    cursor.gap(GAP_AFTER_TITLE);
    cursor.place_wrapped(&document.timestamp, LineStyle::Timestamp);
    cursor.gap(GAP_AFTER_HEADER);

    for (i, paragraph) in paragraphs(&document.content).iter().enumerate() {
        if i > 0 {
            cursor.gap(GAP_BETWEEN_PARAGRAPHS);
        }
        cursor.place_wrapped(paragraph, LineStyle::Body);
    }

    cursor.gap(GAP_BEFORE_FOOTER);
    cursor.place_wrapped(&document.footer, LineStyle::Footer);

    cursor.finish()
}

/// Split content into paragraphs on blank lines
///
/// Lines inside a paragraph are joined with single spaces.
pub fn paragraphs(content: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                result.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current.join(" "));
    }

    result
}

/// Greedy word wrap
///
/// A word wider than `max_width` on its own is broken across lines at
/// character boundaries, so no text is ever dropped or overflows.
pub fn wrap_words(text: &str, font: BaseFont, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;
    let space_width = font.char_width(' ', size);

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(mem::take(&mut current));
            }
            let mut pieces = break_word(word, font, size, max_width);
            // The tail of a broken word can still share a line with what follows
            if let Some(last) = pieces.pop() {
                lines.extend(pieces);
                current_width = font.text_width(&last, size);
                current = last;
            }
            continue;
        }

        if current.is_empty() {
            current = word.to_string();
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn break_word(word: &str, font: BaseFont, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;

    for ch in word.chars() {
        let ch_width = font.char_width(ch, size);
        if !piece.is_empty() && width + ch_width > max_width {
            pieces.push(mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(ch);
        width += ch_width;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

struct Cursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    /// Top of the next line, from the top edge
    y: f32,
}

impl Cursor {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page::default(),
            y: geometry.margin,
        }
    }

    fn place_wrapped(&mut self, text: &str, style: LineStyle) {
        let max_width = self.geometry.content_width();
        for line in wrap_words(text, style.font(), style.size(), max_width) {
            self.place(line, style);
        }
    }

    fn place(&mut self, text: String, style: LineStyle) {
        let leading = style.leading();
        if self.y + leading > self.geometry.content_bottom() && !self.current.is_empty() {
            self.break_page();
        }

        let x = if style.centered() {
            let width = style.font().text_width(&text, style.size());
            self.geometry.margin + ((self.geometry.content_width() - width) / 2.0).max(0.0)
        } else {
            self.geometry.margin
        };

        self.current.lines.push(PlacedLine {
            text,
            style,
            x,
            baseline: self.y + style.size(),
        });
        self.y += leading;
    }

    /// Vertical space; swallowed at the top of a page
    fn gap(&mut self, amount: f32) {
        if !self.current.is_empty() {
            self.y += amount;
        }
    }

    fn break_page(&mut self) {
        self.pages.push(mem::take(&mut self.current));
        self.y = self.geometry.margin;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(content: &str) -> ExportDocument {
        ExportDocument {
            title: "Summary: paper".to_string(),
            timestamp: "Generated on 2024-05-01 10:00 UTC (version 1)".to_string(),
            content: content.to_string(),
            footer: "Generated by SciSummarize".to_string(),
        }
    }

    fn lorem(words: usize) -> String {
        (0..words)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let content = "First line\ncontinues here.\n\n  \nSecond paragraph.\n";
        assert_eq!(
            paragraphs(content),
            vec!["First line continues here.", "Second paragraph."]
        );
    }

    #[test]
    fn test_wrap_respects_width() {
        let font = BaseFont::Helvetica;
        let lines = wrap_words(&lorem(200), font, 11.0, 300.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(font.text_width(line, 11.0) <= 300.0, "{}", line);
        }
    }

    #[test]
    fn test_overlong_word_is_broken_not_dropped() {
        let font = BaseFont::Helvetica;
        let word = "x".repeat(400);
        let lines = wrap_words(&format!("start {} end", word), font, 11.0, 200.0);

        let rejoined: String = lines.concat().replace(' ', "");
        assert_eq!(rejoined, format!("start{}end", word));
        for line in &lines {
            assert!(font.text_width(line, 11.0) <= 200.0);
        }
    }

    #[test]
    fn test_short_summary_fits_one_page() {
        let pages = layout(&document("A short summary."), &PageGeometry::A4);

        assert_eq!(pages.len(), 1);
        let styles: Vec<LineStyle> = pages[0].lines.iter().map(|l| l.style).collect();
        assert_eq!(
            styles,
            vec![
                LineStyle::Title,
                LineStyle::Timestamp,
                LineStyle::Body,
                LineStyle::Footer
            ]
        );
    }

    #[test]
    fn test_long_summary_paginates_without_losing_words() {
        let content = (0..12)
            .map(|_| lorem(180))
            .collect::<Vec<_>>()
            .join("\n\n");
        let geometry = PageGeometry::A4;
        let pages = layout(&document(&content), &geometry);

        assert!(pages.len() >= 2);

        let body: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.texts(LineStyle::Body))
            .flat_map(|line| line.split_whitespace())
            .collect();
        let expected: Vec<&str> = content.split_whitespace().collect();
        assert_eq!(body, expected);

        for page in &pages {
            for line in &page.lines {
                assert!(line.baseline <= geometry.content_bottom());
                assert!(line.baseline > geometry.margin);
            }
        }
    }

    #[test]
    fn test_footer_only_on_last_page() {
        let pages = layout(&document(&lorem(3000)), &PageGeometry::A4);
        let (last, rest) = pages.split_last().unwrap();

        assert_eq!(last.texts(LineStyle::Footer).count(), 1);
        for page in rest {
            assert_eq!(page.texts(LineStyle::Footer).count(), 0);
        }
        assert_eq!(pages[0].lines[0].style, LineStyle::Title);
    }

    #[test]
    fn test_centered_lines_are_centered() {
        let geometry = PageGeometry::A4;
        let pages = layout(&document("Body"), &geometry);
        let title = &pages[0].lines[0];
        let width = BaseFont::HelveticaBold.text_width(&title.text, 18.0);

        let left = title.x - geometry.margin;
        let right = geometry.width - geometry.margin - (title.x + width);
        assert!((left - right).abs() < 0.01);
    }
}
