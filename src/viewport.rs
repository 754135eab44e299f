//! Axis-aware pan primitives
//!
//! Panning works on "primary" and "secondary" axes. [`Orientation::axes`]
//! decides once per call which rectangle axis plays which role, so none of
//! the primitives below branch on orientation themselves.

use log::debug;

use crate::geometry::{Axis, Direction, Geometry, Orientation, ScreenSize};

/// Fraction of the view extent moved per pan step, in percent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftFactors {
    /// Step along the primary (scroll) axis
    pub primary: u32,
    /// Step along the secondary (column) axis
    pub secondary: u32,
}

impl ShiftFactors {
    pub const DEFAULT: u32 = 95;
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 800;

    #[must_use]
    pub fn new(primary: u32, secondary: u32) -> Self {
        Self {
            primary: Self::clamp(primary),
            secondary: Self::clamp(secondary),
        }
    }

    pub fn clamp(percent: u32) -> u32 {
        percent.clamp(Self::MIN, Self::MAX)
    }
}

impl Default for ShiftFactors {
    fn default() -> Self {
        Self::new(Self::DEFAULT, Self::DEFAULT)
    }
}

/// Which edge of the next page to reveal once it is loaded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingEdge {
    #[default]
    None,
    /// Start of the page along the primary axis
    Top,
    /// End of the page along the primary axis
    Bottom,
}

/// Role of an axis under the current orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisRole {
    Primary,
    Secondary,
}

/// Result of a single pan primitive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanOutcome {
    Moved,
    /// Primary edge reached and multi-column mode may hop to another column
    BlockedColumnHop,
    /// Edge reached, nothing left to do inside this page
    BlockedPageEdge,
}

/// Pan state: geometry plus everything that steers how it moves
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    pub geometry: Geometry,
    pub orientation: Orientation,
    pub shift: ShiftFactors,
    pub multi_column: bool,
    pub pending: PendingEdge,
}

impl Viewport {
    /// Advance or retreat along an axis role.
    ///
    /// A blocked primary move arms [`PendingEdge`] so that a following page
    /// turn reveals the right end of the new page; a successful primary move
    /// disarms it.
    pub fn pan(&mut self, role: AxisRole, direction: Direction) -> PanOutcome {
        self.pan_with(role, direction, self.multi_column)
    }

    pub(crate) fn pan_with(
        &mut self,
        role: AxisRole,
        direction: Direction,
        column_hops: bool,
    ) -> PanOutcome {
        let axes = self.orientation.axes();
        let (axis, sense, percent) = match role {
            AxisRole::Primary => (axes.primary, axes.primary_sense, self.shift.primary),
            AxisRole::Secondary => (axes.secondary, axes.secondary_sense, self.shift.secondary),
        };
        let high = sense.toward_high(direction);

        if self.geometry.at_edge(axis, high) {
            debug!(
                "{role:?} {direction:?} blocked: page {:?}, view {:?}",
                self.geometry.page, self.geometry.view
            );
            if role == AxisRole::Secondary {
                return PanOutcome::BlockedPageEdge;
            }
            self.pending = match direction {
                Direction::Advance => PendingEdge::Top,
                Direction::Retreat => PendingEdge::Bottom,
            };
            return if column_hops {
                PanOutcome::BlockedColumnHop
            } else {
                PanOutcome::BlockedPageEdge
            };
        }

        // At least one pixel, otherwise a tiny view with a tiny shift never reaches the edge
        let delta = (u64::from(self.geometry.view.extent(axis)) * u64::from(percent) / 100)
            .clamp(1, u64::from(u32::MAX)) as u32;
        self.geometry.shift_origin(axis, high, delta);
        if role == AxisRole::Primary {
            self.pending = PendingEdge::None;
        }
        PanOutcome::Moved
    }

    /// Rectangle axis currently playing `role`
    #[must_use]
    pub fn axis(&self, role: AxisRole) -> Axis {
        let axes = self.orientation.axes();
        match role {
            AxisRole::Primary => axes.primary,
            AxisRole::Secondary => axes.secondary,
        }
    }

    /// Origin of the page start (`Direction::Retreat` end) or page end along `role`
    #[must_use]
    pub fn boundary(&self, role: AxisRole, direction: Direction) -> u32 {
        let axes = self.orientation.axes();
        let (axis, sense) = match role {
            AxisRole::Primary => (axes.primary, axes.primary_sense),
            AxisRole::Secondary => (axes.secondary, axes.secondary_sense),
        };
        self.geometry.edge(axis, sense.toward_high(direction))
    }

    pub fn move_to_boundary(&mut self, role: AxisRole, direction: Direction) {
        let origin = self.boundary(role, direction);
        let axis = self.axis(role);
        self.geometry.view.set_origin(axis, origin);
    }

    pub fn recompute(&mut self, screen: ScreenSize, zoom: f32, aspect: f32) {
        self.geometry.recompute(screen, zoom, self.orientation, aspect);
    }
}
