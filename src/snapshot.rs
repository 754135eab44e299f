//! Single-slot saved view

use crate::geometry::{Geometry, Orientation};
use crate::viewport::ShiftFactors;

/// Everything needed to come back to exactly the same window later
#[derive(Clone, Debug, PartialEq)]
pub struct SavedView {
    pub geometry: Geometry,
    pub zoom_factor: f32,
    pub orientation: Orientation,
    pub multi_column: bool,
    pub shift: ShiftFactors,
    pub window_mark: bool,
    pub page: usize,
}

/// Holds at most one saved view. Saving overwrites, reading never clears.
#[derive(Clone, Debug, Default)]
pub struct ViewSlot {
    saved: Option<SavedView>,
}

impl ViewSlot {
    pub fn save(&mut self, view: SavedView) {
        self.saved = Some(view);
    }

    #[must_use]
    pub fn get(&self) -> Option<&SavedView> {
        self.saved.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved.is_none()
    }
}
