//! Page and view rectangles
//!
//! The page rectangle is the whole page scaled by the current zoom factor.
//! The view rectangle is the part of it that fits on the screen, positioned
//! by its top-left origin inside the page rectangle.

/// Pixel extent of something with no position of its own
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis
    #[must_use]
    pub fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Fixed resolution of the device screen
pub type ScreenSize = Size;

/// Visible window inside the page rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewRect {
    /// Left edge, in page-rectangle pixels
    pub x: u32,
    /// Top edge, in page-rectangle pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    #[must_use]
    pub fn origin(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn set_origin(&mut self, axis: Axis, value: u32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    #[must_use]
    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A rectangle axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which way "advance" moves the origin along an axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    /// Advancing increases the origin coordinate
    Ascending,
    /// Advancing decreases the origin coordinate
    Descending,
}

/// Logical direction of travel along an axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Advance,
    Retreat,
}

impl Direction {
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Advance => Self::Retreat,
            Self::Retreat => Self::Advance,
        }
    }
}

impl Sense {
    /// True if travelling in `direction` moves the origin toward larger coordinates
    #[must_use]
    pub fn toward_high(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Self::Ascending, Direction::Advance) | (Self::Descending, Direction::Retreat)
        )
    }
}

/// Axis roles for one orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisMap {
    /// Scroll axis driven by next/previous input
    pub primary: Axis,
    pub primary_sense: Sense,
    /// Perpendicular axis, used for column hops
    pub secondary: Axis,
    pub secondary_sense: Sense,
}

/// Screen orientation
///
/// In landscape the page is rendered rotated by 270 degrees: the top of the
/// page sits at the right edge of the screen, so reading forward moves the
/// window toward smaller x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }

    #[must_use]
    pub fn is_landscape(self) -> bool {
        self == Self::Landscape
    }

    /// The single place where orientation decides axis roles
    #[must_use]
    pub fn axes(self) -> AxisMap {
        match self {
            Self::Portrait => AxisMap {
                primary: Axis::Vertical,
                primary_sense: Sense::Ascending,
                secondary: Axis::Horizontal,
                secondary_sense: Sense::Ascending,
            },
            Self::Landscape => AxisMap {
                primary: Axis::Horizontal,
                primary_sense: Sense::Descending,
                secondary: Axis::Vertical,
                secondary_sense: Sense::Ascending,
            },
        }
    }
}

/// Scaled page rectangle plus the visible window inside it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub page: Size,
    pub view: ViewRect,
}

impl Geometry {
    /// Recompute both rectangles for a zoom factor and page aspect ratio
    /// (height / width of the unrotated page). The view origin is kept and
    /// re-clamped into the new page rectangle.
    pub fn recompute(
        &mut self,
        screen: ScreenSize,
        zoom: f32,
        orientation: Orientation,
        aspect: f32,
    ) {
        let scale = |len: f32| (len as u32).max(1);
        match orientation {
            Orientation::Landscape => {
                self.page.height = scale(screen.height as f32 * zoom);
                self.page.width = scale(self.page.height as f32 * aspect);
            }
            Orientation::Portrait => {
                self.page.width = scale(screen.width as f32 * zoom);
                self.page.height = scale(self.page.width as f32 * aspect);
            }
        }
        self.view.width = self.page.width.min(screen.width);
        self.view.height = self.page.height.min(screen.height);
        self.clamp_origin();
        debug_assert!(self.within_bounds(), "view escaped page: {self:?}");
    }

    /// Largest origin the view may take along `axis`
    #[must_use]
    pub fn limit(&self, axis: Axis) -> u32 {
        self.page.along(axis).saturating_sub(self.view.extent(axis))
    }

    pub fn clamp_origin(&mut self) {
        self.view.x = self.view.x.min(self.limit(Axis::Horizontal));
        self.view.y = self.view.y.min(self.limit(Axis::Vertical));
    }

    /// Origin of the high (`true`) or low edge along `axis`
    #[must_use]
    pub fn edge(&self, axis: Axis, high: bool) -> u32 {
        if high { self.limit(axis) } else { 0 }
    }

    #[must_use]
    pub fn at_edge(&self, axis: Axis, high: bool) -> bool {
        self.view.origin(axis) == self.edge(axis, high)
    }

    /// Move the origin by `delta` toward the high or low edge, stopping at it
    pub fn shift_origin(&mut self, axis: Axis, high: bool, delta: u32) {
        let origin = self.view.origin(axis);
        let moved = if high {
            origin.saturating_add(delta).min(self.limit(axis))
        } else {
            origin.saturating_sub(delta)
        };
        self.view.set_origin(axis, moved);
    }

    /// `0 <= origin <= page - view` on both axes
    #[must_use]
    pub fn within_bounds(&self) -> bool {
        self.view.width <= self.page.width
            && self.view.height <= self.page.height
            && self.view.x <= self.limit(Axis::Horizontal)
            && self.view.y <= self.limit(Axis::Vertical)
    }
}
