use thiserror::Error;

/// Failures of catalog operations. Every variant is a normal, terminal
/// outcome for the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("missing name")]
    MissingName,

    #[error("readPage ({read_page}) exceeds pageCount ({page_count})")]
    ReadPageExceedsPageCount { read_page: u32, page_count: u32 },

    #[error("book '{0}' not found")]
    NotFound(String),
}
