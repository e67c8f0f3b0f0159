use thiserror::Error;

use crate::models::resume::{PageNumber, SectionKind};

/// Failures raised by a renderer while painting a content view.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Paint failed: {0}")]
    Paint(String),

    #[error("Renderer is not mounted")]
    Detached,
}

/// Errors surfaced by a pagination request.
///
/// Unmeasurable surfaces are retried internally and missing fragments degrade to a
/// zero height; neither reaches the caller as its own variant.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The iteration ceiling was hit with content still unplaced. Callers may fall
    /// back to rendering everything on a single page.
    #[error("Pagination did not converge after {iterations} iterations ({unassigned} units unplaced, last page {last_page})")]
    NonConvergence {
        iterations: u32,
        unassigned: usize,
        last_page: PageNumber,
    },

    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    #[error("Annotations do not match content: {section} has {expected} units, annotations carry {found}")]
    InvalidAnnotations {
        section: SectionKind,
        expected: usize,
        found: usize,
    },

    #[error("Content serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
