//! Multi-column traversal
//!
//! A page wider than the screen can be read as side-by-side columns: scroll
//! down a column, then hop one secondary step and start again at the top.

use crate::geometry::Direction;
use crate::viewport::{AxisRole, PanOutcome, PendingEdge, Viewport};

/// Result of a primary-axis move that may cross a column boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    Moved,
    ColumnHop,
    /// No room left on this page; the caller decides about a page turn
    PageEdge,
}

impl Viewport {
    /// Primary-axis move that falls back to a column hop in multi-column mode
    pub fn traverse(&mut self, direction: Direction) -> Traversal {
        match self.pan(AxisRole::Primary, direction) {
            PanOutcome::Moved => Traversal::Moved,
            PanOutcome::BlockedColumnHop if self.hop_column(direction) => Traversal::ColumnHop,
            PanOutcome::BlockedColumnHop | PanOutcome::BlockedPageEdge => Traversal::PageEdge,
        }
    }

    /// Step one column along the secondary axis and rewind the primary axis
    /// to the opposite end of the new column.
    ///
    /// The rewind repeats the ordinary primary primitive until it is blocked
    /// instead of assigning the boundary, so it shares its clamping with
    /// normal panning whatever the orientation. Column hops are disabled
    /// during the walk. Returns false when there is no column left.
    pub fn hop_column(&mut self, direction: Direction) -> bool {
        if self.pan(AxisRole::Secondary, direction) != PanOutcome::Moved {
            return false;
        }
        let back = direction.reverse();
        while self.pan_with(AxisRole::Primary, back, false) == PanOutcome::Moved {}
        self.pending = PendingEdge::None;
        true
    }
}
