// ABOUTME: Store module - lead records and their file-backed persistence.

mod file;
mod lead;

pub use file::*;
pub use lead::*;
