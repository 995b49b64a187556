//! PDF text extraction via MuPDF

mod extractor;

pub use extractor::{MupdfTextExtractor, TextExtractor};
