pub mod error;
pub mod geometry;
pub mod highlight;
pub mod session;
pub mod store;

pub use error::{GeometryFault, HighlightError};
pub use geometry::{OverlayRect, PixelRect, RelativeRect, normalize, project};
pub use highlight::Highlight;
pub use session::{Effect, Overlay, OverlaySession, PageLayout, ViewEvent, ViewportProbe};
pub use store::DocumentHighlights;
