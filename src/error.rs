//! Error taxonomy for highlight capture and re-projection.
//!
//! Geometry failures never escape as panics or anyhow blobs; callers get a
//! tagged result and decide what feedback to show. `NotReady` is the normal
//! "layout not measurable yet" condition and is never user-visible.

use thiserror::Error;

/// Why a capture was rejected as geometrically invalid.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryFault {
    /// Page rect has zero/negative or non-finite dimensions.
    #[error("page rect has degenerate dimensions {width}x{height}")]
    DegeneratePageRect { width: f64, height: f64 },
    /// Selection rect has zero/negative or non-finite dimensions.
    #[error("selection rect has degenerate dimensions {width}x{height}")]
    DegenerateSelection { width: f64, height: f64 },
    /// Selection text is empty or whitespace-only.
    #[error("selection text is empty")]
    EmptySelection,
}

/// Errors surfaced at the component boundary.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum HighlightError {
    /// Capture rejected; nothing was created or persisted.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryFault),
    /// No confirmed page layout (or no active selection) yet. Retry on the
    /// next render-completion event.
    #[error("page layout is not ready")]
    NotReady,
    /// Page number outside the document at capture time.
    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },
}
