//! Helpers for everyday digital humanities work: loading and batch-editing
//! text files, folders and CSV files, fetching web pages, and cleaning and
//! analysing English, Latin and Ancient Greek texts.

pub mod config;
pub mod encoding;
pub mod error;
pub mod files;
pub mod logging;
pub mod pipeline;
pub mod text;
pub mod web;

pub use config::{Options, Settings};
pub use error::{DhelpError, Result};
pub use files::{CsvFile, CsvRow, Folder, PathHandle, TextFile, TextFolder};
pub use text::{BackendStatus, Language, Text, TokenMode};
pub use web::WebPage;
