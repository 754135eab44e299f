//! Navigation errors

use crate::document::DecodeError;

/// Why a navigation request left the view where it was
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// Requested page lies outside `0..page_count`. Nothing changed.
    #[error("page {requested} is outside the document (0..{page_count})")]
    DocumentBoundary { requested: i64, page_count: usize },

    /// The engine failed to decode the target page. The previous page stays
    /// on screen with its geometry intact.
    #[error("cannot show page {page}")]
    Decode {
        page: usize,
        #[source]
        source: DecodeError,
    },
}

impl NavError {
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::DocumentBoundary { .. })
    }
}
