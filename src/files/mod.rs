//! Local file, folder and CSV handles.

pub mod csv_file;
pub mod folder;
pub mod path;
pub mod text_file;
pub mod text_folder;

pub use csv_file::{CsvFile, CsvRow};
pub use folder::Folder;
pub use path::PathHandle;
pub use text_file::TextFile;
pub use text_folder::TextFolder;
