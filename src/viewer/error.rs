//! Load and render failures

/// Errors from opening a document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no document decoder is available")]
    DecoderUnavailable,

    #[error("failed to open {path}: {detail}")]
    Open { path: String, detail: String },

    #[error("{path} has no pages")]
    Empty { path: String },
}

impl LoadError {
    pub fn open(path: impl Into<String>, detail: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

/// Errors from fetching or drawing a page
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Generic { detail: String },
}

impl RenderError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}
