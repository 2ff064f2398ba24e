pub mod config;
pub mod emit;
pub mod error;
pub mod load;
pub mod parse;
pub mod transform;

/// A rendered output document with its path relative to the output root.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
