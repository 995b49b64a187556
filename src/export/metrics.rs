//! Standard Type 1 font metrics for the export layout
//!
//! Only the two base-14 faces the renderer uses are covered. Widths are in
//! units of 1/1000 em, taken from the Adobe AFM files.

/// Base-14 faces used by the PDF renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseFont {
    Helvetica,
    HelveticaBold,
}

// ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

impl BaseFont {
    /// PostScript name for the font dictionary
    pub fn pdf_name(self) -> &'static str {
        match self {
            BaseFont::Helvetica => "Helvetica",
            BaseFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Key under the page's /Font resources
    pub fn resource_name(self) -> &'static str {
        match self {
            BaseFont::Helvetica => "F1",
            BaseFont::HelveticaBold => "F2",
        }
    }

    pub fn all() -> [BaseFont; 2] {
        [BaseFont::Helvetica, BaseFont::HelveticaBold]
    }

    /// Glyph advance in 1/1000 em
    fn glyph_width(self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            let idx = (code - 32) as usize;
            return match self {
                BaseFont::Helvetica => HELVETICA_WIDTHS[idx],
                BaseFont::HelveticaBold => HELVETICA_BOLD_WIDTHS[idx],
            };
        }

        let bold = self == BaseFont::HelveticaBold;
        match ch {
            '…' | '—' | '‰' | '™' => 1000,
            '\u{2018}' | '\u{2019}' | '‚' => {
                if bold {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' | '„' => {
                if bold {
                    500
                } else {
                    333
                }
            }
            '•' => 350,
            '\u{00A0}' => 278,
            '°' => 400,
            _ => 556,
        }
    }

    /// Width of a single character at `size` points
    pub fn char_width(self, ch: char, size: f32) -> f32 {
        self.glyph_width(ch) as f32 * size / 1000.0
    }

    /// Width of `text` at `size` points
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.glyph_width(ch) as u32).sum::<u32>() as f32 * size / 1000.0
    }
}

/// Map a character to its WinAnsiEncoding byte
///
/// Returns `None` for anything the standard fonts cannot show.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match ch {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}
