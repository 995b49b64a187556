//! SciSummarize Server Library
//!
//! Document summarization and export pipeline. The server binary is in
//! main.rs; benchmarks and tests use the modules exposed here.
//!
//! # Modules
//!
//! - `document`: uploaded documents and the registry trait
//! - `pdf`: text extraction via MuPDF
//! - `summarize`: summary generation strategies
//! - `store`: versioned summary persistence (file backend)
//! - `db`: SQLite registry and summary backend
//! - `pipeline`: the summarization orchestrator and its error taxonomy
//! - `export`: PDF, HTML and text rendering of summaries

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod export;
pub mod pdf;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod store;
pub mod summarize;

#[cfg(test)]
pub(crate) mod test_support;
