//! PDF serialization of laid-out pages
//!
//! Text is drawn with the standard Helvetica faces in WinAnsiEncoding, so no
//! font program is embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::layout::{Page, PageGeometry, PlacedLine};
use super::metrics::{win_ansi_byte, BaseFont};
use super::ExportError;

/// Serialize pages into a PDF file
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry, title: &str) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in BaseFont::all() {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.pdf_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        Object::Real(geometry.width),
        Object::Real(geometry.height),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page, geometry)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(concat!("scisummarize-server ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn page_content(page: &Page, geometry: &PageGeometry) -> Result<Content, ExportError> {
    let mut operations = Vec::with_capacity(page.lines.len() * 6);

    for line in &page.lines {
        operations.extend(line_operations(line, geometry)?);
    }

    Ok(Content { operations })
}

fn line_operations(line: &PlacedLine, geometry: &PageGeometry) -> Result<Vec<Operation>, ExportError> {
    let style = line.style;
    let encoded = encode_win_ansi(&line.text)?;

    Ok(vec![
        Operation::new("BT", vec![]),
        Operation::new("g", vec![Object::Real(style.gray())]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(style.font().resource_name().as_bytes().to_vec()),
                Object::Real(style.size()),
            ],
        ),
        Operation::new(
            "Td",
            vec![
                Object::Real(line.x),
                Object::Real(geometry.height - line.baseline),
            ],
        ),
        Operation::new("Tj", vec![Object::String(encoded, StringFormat::Hexadecimal)]),
        Operation::new("ET", vec![]),
    ])
}

/// Encode text for a simple font, failing on the first unsupported character
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, ExportError> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).ok_or(ExportError::UnsupportedCharacter(ch)))
        .collect()
}

/// PDF text string in UTF-16BE with byte order mark
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::LineStyle;

    fn page_with(texts: &[&str]) -> Page {
        Page {
            lines: texts
                .iter()
                .enumerate()
                .map(|(i, text)| PlacedLine {
                    text: text.to_string(),
                    style: LineStyle::Body,
                    x: 72.0,
                    baseline: 90.0 + 16.0 * i as f32,
                })
                .collect(),
        }
    }

    #[test]
    fn test_output_is_loadable_pdf_with_page_count() {
        let pages = vec![page_with(&["first page"]), page_with(&["second", "page"])];
        let bytes = write_pdf(&pages, &PageGeometry::A4, "Summary: Ünïcode title").unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_empty_page_is_still_written() {
        let bytes = write_pdf(&[Page::default()], &PageGeometry::A4, "empty").unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_unsupported_character_is_reported() {
        let pages = vec![page_with(&["λ-calculus"])];
        let err = write_pdf(&pages, &PageGeometry::A4, "t").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedCharacter('λ')));
    }

    #[test]
    fn test_ellipsis_is_encodable() {
        assert_eq!(encode_win_ansi("end…").unwrap(), b"end\x85".to_vec());
    }
}
