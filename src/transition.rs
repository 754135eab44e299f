//! Page-turn decisions
//!
//! Pure functions: which page comes next, which part of it to show first, and
//! how a physical key maps onto a logical move in the current orientation.

use crate::geometry::{Direction, Orientation};
use crate::viewport::{AxisRole, PendingEdge, Viewport};

/// Pages skipped by a long press on next/previous
pub const LONG_JUMP_PAGES: i64 = 10;

/// Physical navigation keys
///
/// In landscape the device is held rotated, so the same keys swap their
/// forward/backward meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavInput {
    /// "Next" key
    Forward,
    /// "Previous" key
    Backward,
    /// Side key that shifts across the page
    ShiftForward,
    ShiftBackward,
}

impl NavInput {
    /// Axis role and logical direction this key means under `orientation`
    #[must_use]
    pub fn resolve(self, orientation: Orientation) -> (AxisRole, Direction) {
        let (role, direction) = match self {
            Self::Forward => (AxisRole::Primary, Direction::Advance),
            Self::Backward => (AxisRole::Primary, Direction::Retreat),
            Self::ShiftForward => (AxisRole::Secondary, Direction::Advance),
            Self::ShiftBackward => (AxisRole::Secondary, Direction::Retreat),
        };
        if orientation.is_landscape() {
            (role, direction.reverse())
        } else {
            (role, direction)
        }
    }
}

/// Where to put the view on a freshly loaded page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Beginning of the page along the primary axis
    Start,
    /// End of the page along the primary axis
    End,
    /// Keep the current origin, clamped to the new page
    Keep,
}

impl From<PendingEdge> for Reveal {
    fn from(edge: PendingEdge) -> Self {
        match edge {
            PendingEdge::Bottom => Self::End,
            PendingEdge::Top | PendingEdge::None => Self::Start,
        }
    }
}

/// Neighbouring page in `direction`, if the document has one
#[must_use]
pub fn adjacent_page(current: usize, page_count: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Advance => current.checked_add(1).filter(|&p| p < page_count),
        Direction::Retreat => current.checked_sub(1),
    }
}

/// Target of a multi-page jump, clamped into the document. `None` when the
/// view already sits on the last page in that direction.
#[must_use]
pub fn jump_target(current: usize, page_count: usize, offset: i64) -> Option<usize> {
    if page_count == 0 {
        return None;
    }
    let last = page_count as i64 - 1;
    let target = (current as i64).saturating_add(offset).clamp(0, last) as usize;
    (target != current).then_some(target)
}

/// Page index a failed move asked for, for error reporting
#[must_use]
pub fn requested_page(current: usize, direction: Direction) -> i64 {
    match direction {
        Direction::Advance => current as i64 + 1,
        Direction::Retreat => current as i64 - 1,
    }
}

impl Viewport {
    /// Place the view on a page whose rectangles were just recomputed.
    ///
    /// In multi-column mode revealing the start also selects the first
    /// column, and revealing the end the last one.
    pub fn reveal(&mut self, reveal: Reveal) {
        let direction = match reveal {
            Reveal::Start => Direction::Retreat,
            Reveal::End => Direction::Advance,
            Reveal::Keep => {
                self.geometry.clamp_origin();
                return;
            }
        };
        self.move_to_boundary(AxisRole::Primary, direction);
        if self.multi_column {
            self.move_to_boundary(AxisRole::Secondary, direction);
        } else {
            self.geometry.clamp_origin();
        }
    }
}
