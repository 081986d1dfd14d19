//! The highlight record: captured selection text plus page-fraction
//! geometry. Geometry is immutable after creation; only the note mutates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GeometryFault, HighlightError};
use crate::geometry::{PixelRect, RelativeRect, normalize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: Uuid,
    pub document_id: String,
    /// 1-based page number, validated against the document's page count
    /// at capture time.
    pub page_number: u32,
    /// Exact captured selection string, never empty.
    pub text: String,
    #[serde(default)]
    pub note: String,
    pub rect: RelativeRect,
    pub created_at: DateTime<Utc>,
}

impl Highlight {
    /// Captures a finalized text selection as a highlight. The empty-text
    /// check runs before any geometry is computed; a rejected capture
    /// creates nothing.
    pub fn capture(
        document_id: &str,
        page_number: u32,
        page_count: u32,
        text: &str,
        selection: PixelRect,
        page_rect: PixelRect,
    ) -> Result<Self, HighlightError> {
        if text.trim().is_empty() {
            return Err(GeometryFault::EmptySelection.into());
        }
        if page_number == 0 || page_number > page_count {
            return Err(HighlightError::PageOutOfRange {
                page: page_number,
                page_count,
            });
        }
        let rect = normalize(selection, page_rect)?;

        Ok(Self {
            id: Uuid::new_v4(),
            document_id: document_id.to_string(),
            page_number,
            text: text.to_string(),
            note: String::new(),
            rect,
            created_at: Utc::now(),
        })
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    #[must_use]
    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}
