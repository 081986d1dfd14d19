//! Overlay session: event-driven re-projection of stored highlights onto
//! the current page rendering.
//!
//! The session owns the in-memory highlight list for the displayed
//! document and the overlay set derived from it. It is driven entirely by
//! discrete UI events on one thread. Layout is pull-based: rect
//! measurements arrive with the render-completion event and are never
//! observed or cached across resizes, so a redraw can only ever use a
//! measurement confirmed for the page it is drawing.

use uuid::Uuid;

use crate::error::HighlightError;
use crate::geometry::{OverlayRect, PixelRect, project};
use crate::highlight::Highlight;

/// Rendering-layer contract for the native text selection.
pub trait ViewportProbe {
    /// Bounding rect of the current selection, if one exists.
    fn selection_rect(&self) -> Option<PixelRect>;
}

/// One confirmed measurement of the rendered page and its scroll
/// container, taken after a render pass completed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub page: u32,
    pub page_rect: PixelRect,
    pub container_rect: PixelRect,
}

/// Discrete UI events driving the session.
#[derive(Clone, Debug)]
pub enum ViewEvent {
    /// A document was opened; the session list is rebuilt wholesale.
    DocumentOpened {
        document_id: String,
        page_count: u32,
        highlights: Vec<Highlight>,
    },
    /// The visible page changed.
    PageChanged(u32),
    /// A page finished rendering; carries the rects measured for this pass.
    PageRendered {
        page: u32,
        page_rect: PixelRect,
        container_rect: PixelRect,
    },
    /// The container or page was resized; any held measurement is stale.
    ViewportResized,
    /// A new highlight was persisted for this document.
    HighlightAdded(Highlight),
    /// A highlight was deleted.
    HighlightRemoved(Uuid),
}

/// What the UI should do after an event is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The overlay set changed; repaint it.
    RedrawOverlays,
    /// Overlays cannot be computed yet; wait for the next render-complete
    /// notification.
    AwaitRender,
}

/// A drawable highlight overlay in container-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    pub highlight_id: Uuid,
    pub rect: OverlayRect,
}

pub struct OverlaySession {
    document_id: String,
    page_count: u32,
    current_page: u32,
    highlights: Vec<Highlight>,
    layout: Option<PageLayout>,
    overlays: Vec<Overlay>,
}

impl OverlaySession {
    #[must_use]
    pub fn new(document_id: impl Into<String>, page_count: u32) -> Self {
        Self {
            document_id: document_id.into(),
            page_count,
            current_page: 1,
            highlights: Vec::new(),
            layout: None,
            overlays: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// The overlay set for the last confirmed layout. Empty while a
    /// render is pending.
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    #[must_use]
    pub fn layout(&self) -> Option<PageLayout> {
        self.layout
    }

    /// Apply a UI event and return resulting effects.
    #[must_use]
    pub fn apply(&mut self, event: ViewEvent) -> Vec<Effect> {
        match event {
            ViewEvent::DocumentOpened {
                document_id,
                page_count,
                highlights,
            } => {
                self.document_id = document_id;
                self.page_count = page_count;
                self.current_page = 1;
                self.highlights = highlights;
                self.layout = None;
                self.overlays.clear();
                vec![Effect::AwaitRender]
            }

            ViewEvent::PageChanged(page) => {
                if page == self.current_page {
                    return vec![];
                }
                self.current_page = page;
                // A measurement taken for the previous page must not
                // survive the switch.
                self.layout = None;
                self.overlays.clear();
                vec![Effect::AwaitRender]
            }

            ViewEvent::PageRendered {
                page,
                page_rect,
                container_rect,
            } => {
                if page != self.current_page {
                    log::debug!(
                        "discarding stale render notification for page {page} (current page is {})",
                        self.current_page
                    );
                    return vec![];
                }
                if !page_rect.is_renderable() {
                    log::debug!("page {page} reported a degenerate rect, waiting for next render");
                    return vec![Effect::AwaitRender];
                }
                self.layout = Some(PageLayout {
                    page,
                    page_rect,
                    container_rect,
                });
                self.rebuild_overlays();
                vec![Effect::RedrawOverlays]
            }

            ViewEvent::ViewportResized => {
                self.layout = None;
                self.overlays.clear();
                vec![Effect::AwaitRender]
            }

            ViewEvent::HighlightAdded(highlight) => {
                self.highlights.push(highlight);
                if self.layout.is_some() {
                    self.rebuild_overlays();
                    vec![Effect::RedrawOverlays]
                } else {
                    vec![Effect::AwaitRender]
                }
            }

            ViewEvent::HighlightRemoved(id) => {
                self.highlights.retain(|h| h.id != id);
                if self.layout.is_some() {
                    self.rebuild_overlays();
                    vec![Effect::RedrawOverlays]
                } else {
                    vec![]
                }
            }
        }
    }

    /// Re-projection outside the event loop, for callers that repaint on
    /// their own schedule. `NotReady` until a layout is confirmed.
    pub fn reproject(&self) -> Result<Vec<Overlay>, HighlightError> {
        let layout = self.layout.ok_or(HighlightError::NotReady)?;
        Ok(self.project_page(layout))
    }

    /// Capture the current selection as a highlight on the current page.
    /// `NotReady` when there is no confirmed layout or no active
    /// selection; geometry rejections come from [`Highlight::capture`].
    pub fn capture_selection(
        &self,
        probe: &impl ViewportProbe,
        text: &str,
    ) -> Result<Highlight, HighlightError> {
        let layout = self.layout.ok_or(HighlightError::NotReady)?;
        let selection = probe.selection_rect().ok_or(HighlightError::NotReady)?;
        Highlight::capture(
            &self.document_id,
            self.current_page,
            self.page_count,
            text,
            selection,
            layout.page_rect,
        )
    }

    // One measurement per pass: every overlay in a redraw shares the same
    // rect snapshot.
    fn project_page(&self, layout: PageLayout) -> Vec<Overlay> {
        self.highlights
            .iter()
            .filter(|h| h.page_number == layout.page)
            .map(|h| Overlay {
                highlight_id: h.id,
                rect: project(h.rect, layout.page_rect, layout.container_rect),
            })
            .collect()
    }

    fn rebuild_overlays(&mut self) {
        self.overlays = match self.layout {
            Some(layout) => self.project_page(layout),
            None => Vec::new(),
        };
    }
}
