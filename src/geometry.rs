//! Selection geometry: pixel rects, page-fraction rects, and the
//! normalize/project pair that converts between them.
//!
//! Highlights are persisted as fractions of the rendered page box so they
//! survive window resizes, zoom changes, and device-pixel-ratio switches.
//! `normalize` runs once at capture time; `project` runs on every redraw
//! against the page rect measured for that redraw.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryFault, HighlightError};

/// Axis-aligned rectangle in pixels (viewport or container space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect anchored at the origin, e.g. a container measured in its own
    /// local space.
    #[must_use]
    pub const fn from_origin(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// True when the rect can serve as a projection basis: positive,
    /// finite dimensions.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Highlight geometry as fractions of the page rect. `x`/`y` may be
/// negative when capture happened in a scrolled state; `width`/`height`
/// are always positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawable rectangle in the container's local pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts a selection rect into page fractions against the page rect
/// measured at capture time. Both rects must share a coordinate space.
///
/// Rounding overshoot past the page's far edge is clamped back to 1.0;
/// the clamp is skipped if it would leave a non-positive dimension.
pub fn normalize(
    selection: PixelRect,
    page: PixelRect,
) -> Result<RelativeRect, HighlightError> {
    if !page.is_renderable() {
        return Err(GeometryFault::DegeneratePageRect {
            width: page.width,
            height: page.height,
        }
        .into());
    }
    if !(selection.width > 0.0 && selection.height > 0.0)
        || !selection.left.is_finite()
        || !selection.top.is_finite()
    {
        return Err(GeometryFault::DegenerateSelection {
            width: selection.width,
            height: selection.height,
        }
        .into());
    }

    let mut rel = RelativeRect {
        x: (selection.left - page.left) / page.width,
        y: (selection.top - page.top) / page.height,
        width: selection.width / page.width,
        height: selection.height / page.height,
    };

    if rel.x < 1.0 && rel.x + rel.width > 1.0 {
        rel.width = 1.0 - rel.x;
    }
    if rel.y < 1.0 && rel.y + rel.height > 1.0 {
        rel.height = 1.0 - rel.y;
    }

    Ok(rel)
}

/// Projects a stored fraction rect onto the current page rendering,
/// shifted into the container's local space. Pure; callers measure the
/// rects once per redraw and reuse them for every highlight in the batch.
#[must_use]
pub fn project(rel: RelativeRect, page: PixelRect, container: PixelRect) -> OverlayRect {
    let offset_x = page.left - container.left;
    let offset_y = page.top - container.top;
    OverlayRect {
        x: offset_x + rel.x * page.width,
        y: offset_y + rel.y * page.height,
        width: rel.width * page.width,
        height: rel.height * page.height,
    }
}
