//! Shared test fixtures

use std::path::{Path, PathBuf};

use crate::export::layout::{LineStyle, Page, PageGeometry, PlacedLine};
use crate::export::write_pdf;

/// PDF bytes with one page per entry, each page holding the given lines
pub fn pdf_fixture_bytes(pages: &[&[&str]]) -> Vec<u8> {
    let pages: Vec<Page> = pages
        .iter()
        .map(|lines| Page {
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, text)| PlacedLine {
                    text: text.to_string(),
                    style: LineStyle::Body,
                    x: 72.0,
                    baseline: 100.0 + 20.0 * i as f32,
                })
                .collect(),
        })
        .collect();

    write_pdf(&pages, &PageGeometry::A4, "fixture").unwrap()
}

/// Write a fixture PDF into `dir`
pub fn write_pdf_fixture(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_fixture_bytes(pages)).unwrap();
    path
}

/// Application state rooted in `dir`, with the SQLite summary backend
pub async fn test_state(dir: &Path) -> crate::state::AppState {
    test_state_with(dir, |_| {}).await
}

/// Like [`test_state`], with `configure` applied before the state is built
pub async fn test_state_with(
    dir: &Path,
    configure: impl FnOnce(&mut crate::config::Config),
) -> crate::state::AppState {
    let mut config = crate::config::Config::default();
    config.storage.documents_dir = dir.join("documents");
    config.summary.dir = dir.join("summaries");
    configure(&mut config);

    let pool = crate::db::test_pool(dir).await;
    crate::state::AppState::new(config, pool).unwrap()
}
