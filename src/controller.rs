//! Viewport controller
//!
//! Owns the whole viewing state of one open document and is the only thing
//! that mutates it. Every host request goes through [`ViewportController::apply`]
//! and runs to completion, including any blocking page decode, before it
//! returns.

use std::mem;
use std::time::Instant;

use log::{debug, info, warn};

use crate::columns::Traversal;
use crate::document::{DocumentEngine, Frame, PageInfo, RenderRequest};
use crate::error::NavError;
use crate::geometry::{Axis, Direction, Geometry, Orientation, ScreenSize, ViewRect};
use crate::persist::ViewSettings;
use crate::snapshot::{SavedView, ViewSlot};
use crate::transition::{
    LONG_JUMP_PAGES, NavInput, Reveal, adjacent_page, jump_target, requested_page,
};
use crate::viewport::{AxisRole, PanOutcome, PendingEdge, ShiftFactors, Viewport};
use crate::zoom::Zoom;

/// Secondary steps taken by a long press on a shift key
pub const LONG_SHIFT_STEPS: u32 = 3;

/// Black line drawn where the previous window ended
pub const WINDOW_MARK_VALUE: u8 = 0x00;

/// Host requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Navigate(NavInput),
    /// Long press: jumps ten pages on next/previous, three steps on shift keys
    NavigateLong(NavInput),
    NextColumn,
    PrevColumn,
    GoToPage(usize),
    ZoomIn { long: bool },
    ZoomOut { long: bool },
    ResetView,
    ToggleOrientation,
    ToggleMultiColumn,
    ToggleWindowMark,
    SetZoomStep(u32),
    SetPrimaryShift(u32),
    SetSecondaryShift(u32),
    SaveView,
    RestoreView,
}

/// What a successful request did to the view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    Moved,
    ColumnHop,
    PageTurned,
    /// Nothing visible changed
    Unchanged,
}

/// Notifications for the display layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The last rendered frame no longer matches the view
    InvalidateFrame,
    /// Page or view rectangle sizes were recomputed
    DimensionsChanged(Geometry),
    PageChanged(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame already shows the current view; the engine was not called
    Cached,
    Rendered,
}

pub struct ViewportController<E> {
    engine: E,
    screen: ScreenSize,
    viewport: Viewport,
    zoom: Zoom,
    page: usize,
    aspect: f32,
    window_mark: bool,
    /// Position of the previous window's edge inside the current one
    mark: Option<u32>,
    slot: ViewSlot,
    frame_valid: bool,
    effects: Vec<Effect>,
}

impl<E: DocumentEngine> ViewportController<E> {
    /// Open `page` of the document, applying `settings` if they were saved on
    /// that same page.
    pub fn open(
        mut engine: E,
        screen: ScreenSize,
        page: usize,
        settings: ViewSettings,
    ) -> Result<Self, NavError> {
        let page_count = engine.page_count();
        if !engine.contains(page) {
            return Err(NavError::DocumentBoundary {
                requested: page as i64,
                page_count,
            });
        }
        let settings = settings.for_page(page);
        let info = decode(&mut engine, page)?;

        let orientation = if settings.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let viewport = Viewport {
            geometry: Geometry {
                view: ViewRect {
                    x: settings.origin_x,
                    y: settings.origin_y,
                    ..ViewRect::default()
                },
                ..Geometry::default()
            },
            orientation,
            shift: ShiftFactors::new(settings.vertical_shift, settings.horizontal_shift),
            multi_column: settings.multi_column,
            pending: PendingEdge::None,
        };

        let mut controller = Self {
            engine,
            screen,
            viewport,
            zoom: Zoom::new(settings.zoom_factor, settings.zoom_step),
            page,
            aspect: info.aspect(),
            window_mark: settings.window_mark,
            mark: None,
            slot: ViewSlot::default(),
            frame_valid: false,
            effects: Vec::new(),
        };
        controller.effects.push(Effect::PageChanged(page));
        controller.recompute();
        info!(
            "Opened page {} of {page_count} at zoom {:.2} ({:?})",
            page + 1,
            controller.zoom.factor(),
            orientation
        );
        Ok(controller)
    }

    /// Apply a host request
    pub fn apply(&mut self, cmd: Command) -> Result<NavOutcome, NavError> {
        debug!("Applying {cmd:?} on page {}", self.page);
        match cmd {
            Command::Navigate(input) => self.navigate(input),
            Command::NavigateLong(input) => self.navigate_long(input),
            Command::NextColumn => self.column(Direction::Advance),
            Command::PrevColumn => self.column(Direction::Retreat),
            Command::GoToPage(page) => self.go_to_page(page),
            Command::ZoomIn { long } => Ok(self.rezoom(|zoom| zoom.step_in(long))),
            Command::ZoomOut { long } => Ok(self.rezoom(|zoom| zoom.step_out(long))),
            Command::ResetView => Ok(self.reset_view()),
            Command::ToggleOrientation => {
                self.viewport.orientation = self.viewport.orientation.toggled();
                Ok(self.reset_view())
            }
            Command::ToggleMultiColumn => {
                self.viewport.multi_column = !self.viewport.multi_column;
                info!("Multi-column mode {}", on_off(self.viewport.multi_column));
                Ok(NavOutcome::Unchanged)
            }
            Command::ToggleWindowMark => {
                self.window_mark = !self.window_mark;
                self.mark = None;
                self.invalidate();
                Ok(NavOutcome::Unchanged)
            }
            Command::SetZoomStep(percent) => {
                self.zoom.set_step(percent);
                Ok(NavOutcome::Unchanged)
            }
            Command::SetPrimaryShift(percent) => {
                self.viewport.shift.primary = ShiftFactors::clamp(percent);
                Ok(NavOutcome::Unchanged)
            }
            Command::SetSecondaryShift(percent) => {
                self.viewport.shift.secondary = ShiftFactors::clamp(percent);
                Ok(NavOutcome::Unchanged)
            }
            Command::SaveView => {
                self.save_view();
                Ok(NavOutcome::Unchanged)
            }
            Command::RestoreView => self.restore_view(),
        }
    }

    /// Handle a physical navigation key: pan, hop a column, or turn the page
    pub fn navigate(&mut self, input: NavInput) -> Result<NavOutcome, NavError> {
        let (role, direction) = input.resolve(self.viewport.orientation);
        match role {
            AxisRole::Primary => self.scroll(direction),
            AxisRole::Secondary => Ok(self.shift_secondary(direction, 1)),
        }
    }

    fn navigate_long(&mut self, input: NavInput) -> Result<NavOutcome, NavError> {
        let (role, direction) = input.resolve(self.viewport.orientation);
        match role {
            AxisRole::Primary => {
                let offset = match direction {
                    Direction::Advance => LONG_JUMP_PAGES,
                    Direction::Retreat => -LONG_JUMP_PAGES,
                };
                self.jump(offset)
            }
            AxisRole::Secondary => Ok(self.shift_secondary(direction, LONG_SHIFT_STEPS)),
        }
    }

    fn scroll(&mut self, direction: Direction) -> Result<NavOutcome, NavError> {
        let axis = self.viewport.axis(AxisRole::Primary);
        let before = self.viewport.geometry.view.origin(axis);
        match self.viewport.traverse(direction) {
            Traversal::Moved => {
                self.mark = self.previous_edge(axis, before);
                self.invalidate();
                Ok(NavOutcome::Moved)
            }
            Traversal::ColumnHop => {
                debug!("Column hop to {:?}", self.viewport.geometry.view);
                self.mark = None;
                self.invalidate();
                Ok(NavOutcome::ColumnHop)
            }
            Traversal::PageEdge => self.turn_page(direction),
        }
    }

    /// Where the edge of the window that started at `before` lies inside the
    /// current window, if it is visible at all
    fn previous_edge(&self, axis: Axis, before: u32) -> Option<u32> {
        let view = &self.viewport.geometry.view;
        let after = view.origin(axis);
        let extent = view.extent(axis);
        let edge = if after > before {
            (before + extent).checked_sub(after)?
        } else {
            before - after
        };
        (edge < extent).then_some(edge)
    }

    fn shift_secondary(&mut self, direction: Direction, steps: u32) -> NavOutcome {
        let mut moved = false;
        for _ in 0..steps {
            if self.viewport.pan(AxisRole::Secondary, direction) != PanOutcome::Moved {
                break;
            }
            moved = true;
        }
        if !moved {
            return NavOutcome::Unchanged;
        }
        self.mark = None;
        self.invalidate();
        NavOutcome::Moved
    }

    /// Explicit column keys: hop in multi-column mode, otherwise turn the page
    fn column(&mut self, direction: Direction) -> Result<NavOutcome, NavError> {
        if self.viewport.multi_column && self.viewport.hop_column(direction) {
            self.mark = None;
            self.invalidate();
            return Ok(NavOutcome::ColumnHop);
        }
        self.viewport.pending = match direction {
            Direction::Advance => PendingEdge::Top,
            Direction::Retreat => PendingEdge::Bottom,
        };
        self.turn_page(direction)
    }

    /// Load the neighbouring page, revealing the edge armed by the blocked pan
    fn turn_page(&mut self, direction: Direction) -> Result<NavOutcome, NavError> {
        let page_count = self.engine.page_count();
        let Some(target) = adjacent_page(self.page, page_count, direction) else {
            warn!("No page beyond {} in {direction:?} direction", self.page + 1);
            self.viewport.pending = PendingEdge::None;
            return Err(NavError::DocumentBoundary {
                requested: requested_page(self.page, direction),
                page_count,
            });
        };
        let reveal = Reveal::from(self.viewport.pending);
        self.load_page(target, reveal)?;
        Ok(NavOutcome::PageTurned)
    }

    fn jump(&mut self, offset: i64) -> Result<NavOutcome, NavError> {
        let page_count = self.engine.page_count();
        let Some(target) = jump_target(self.page, page_count, offset) else {
            warn!("Already at the last page for a jump of {offset}");
            self.viewport.pending = PendingEdge::None;
            return Err(NavError::DocumentBoundary {
                requested: self.page as i64 + offset,
                page_count,
            });
        };
        self.load_page(target, Reveal::Start)?;
        Ok(NavOutcome::PageTurned)
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<NavOutcome, NavError> {
        if page == self.page {
            self.viewport.reveal(Reveal::Start);
            self.geometry_changed();
            return Ok(NavOutcome::Moved);
        }
        self.load_page(page, Reveal::Start)?;
        Ok(NavOutcome::PageTurned)
    }

    fn load_page(&mut self, page: usize, reveal: Reveal) -> Result<(), NavError> {
        if !self.engine.contains(page) {
            let page_count = self.engine.page_count();
            return Err(NavError::DocumentBoundary {
                requested: page as i64,
                page_count,
            });
        }
        let decoded = decode(&mut self.engine, page);
        self.viewport.pending = PendingEdge::None;
        self.show_page(page, decoded?, reveal);
        Ok(())
    }

    fn show_page(&mut self, page: usize, info: PageInfo, reveal: Reveal) {
        self.page = page;
        self.aspect = info.aspect();
        self.viewport
            .recompute(self.screen, self.zoom.factor(), self.aspect);
        self.viewport.reveal(reveal);
        self.effects.push(Effect::PageChanged(page));
        self.geometry_changed();
        info!(
            "Showing page {} of {} ({reveal:?})",
            page + 1,
            self.engine.page_count()
        );
    }

    fn reset_view(&mut self) -> NavOutcome {
        self.zoom.reset();
        self.viewport
            .recompute(self.screen, self.zoom.factor(), self.aspect);
        self.viewport
            .move_to_boundary(AxisRole::Primary, Direction::Retreat);
        self.viewport
            .move_to_boundary(AxisRole::Secondary, Direction::Retreat);
        self.geometry_changed();
        NavOutcome::Moved
    }

    fn rezoom(&mut self, change: impl FnOnce(&mut Zoom)) -> NavOutcome {
        let before = self.zoom.factor();
        change(&mut self.zoom);
        if self.zoom.factor() == before {
            debug!("Zoom stays at {before:.2}");
            return NavOutcome::Unchanged;
        }
        self.recompute()
    }

    /// Recompute rectangles for the current zoom and orientation, keeping the
    /// origin inside the page
    fn recompute(&mut self) -> NavOutcome {
        self.viewport
            .recompute(self.screen, self.zoom.factor(), self.aspect);
        self.geometry_changed();
        NavOutcome::Moved
    }

    /// Remember the current view in the single save slot
    pub fn save_view(&mut self) {
        self.slot.save(SavedView {
            geometry: self.viewport.geometry,
            zoom_factor: self.zoom.factor(),
            orientation: self.viewport.orientation,
            multi_column: self.viewport.multi_column,
            shift: self.viewport.shift,
            window_mark: self.window_mark,
            page: self.page,
        });
        info!("Saved view on page {}", self.page + 1);
    }

    /// Go back to the saved view. Does nothing if no view was ever saved; the
    /// slot stays filled so the view can be restored again.
    pub fn restore_view(&mut self) -> Result<NavOutcome, NavError> {
        let Some(saved) = self.slot.get().cloned() else {
            debug!("No saved view to restore");
            return Ok(NavOutcome::Unchanged);
        };
        let turned = saved.page != self.page;
        let info = if turned {
            Some(decode(&mut self.engine, saved.page)?)
        } else {
            None
        };

        self.zoom.factor = Zoom::clamp_factor(saved.zoom_factor);
        self.viewport.orientation = saved.orientation;
        self.viewport.multi_column = saved.multi_column;
        self.viewport.shift = saved.shift;
        self.viewport.pending = PendingEdge::None;
        self.viewport.geometry = saved.geometry;
        self.window_mark = saved.window_mark;
        if let Some(info) = info {
            self.page = saved.page;
            self.aspect = info.aspect();
            self.viewport
                .recompute(self.screen, self.zoom.factor(), self.aspect);
            self.viewport.reveal(Reveal::Keep);
            self.effects.push(Effect::PageChanged(saved.page));
        }
        self.geometry_changed();
        info!("Restored view on page {}", self.page + 1);
        Ok(if turned {
            NavOutcome::PageTurned
        } else {
            NavOutcome::Moved
        })
    }

    /// Draw the current view into `frame` unless it already shows it
    pub fn render_frame(&mut self, frame: &mut Frame) -> Result<FrameStatus, NavError> {
        if self.frame_valid {
            debug!("Frame for page {} satisfied from cache", self.page);
            return Ok(FrameStatus::Cached);
        }
        let request = RenderRequest {
            page: self.viewport.geometry.page,
            view: self.viewport.geometry.view,
            orientation: self.viewport.orientation,
        };
        let started = Instant::now();
        self.engine
            .render(self.page, &request, frame)
            .map_err(|source| NavError::Decode {
                page: self.page,
                source,
            })?;
        if self.window_mark {
            if let Some(position) = self.mark {
                self.draw_mark(frame, position);
            }
        }
        debug!("Rendered page {} in {:?}", self.page, started.elapsed());
        self.frame_valid = true;
        Ok(FrameStatus::Rendered)
    }

    fn draw_mark(&self, frame: &mut Frame, position: u32) {
        let view = &self.viewport.geometry.view;
        match self.viewport.axis(AxisRole::Primary) {
            Axis::Vertical => {
                for x in 0..view.width {
                    frame.set_pixel(x, position, WINDOW_MARK_VALUE);
                }
            }
            Axis::Horizontal => {
                for y in 0..view.height {
                    frame.set_pixel(position, y, WINDOW_MARK_VALUE);
                }
            }
        }
    }

    fn geometry_changed(&mut self) {
        debug_assert!(self.viewport.geometry.within_bounds());
        self.mark = None;
        self.invalidate();
        self.effects
            .push(Effect::DimensionsChanged(self.viewport.geometry));
    }

    fn invalidate(&mut self) {
        if mem::replace(&mut self.frame_valid, false) {
            self.effects.push(Effect::InvalidateFrame);
        }
    }

    /// Drain queued display notifications
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    /// Current values in their persisted form
    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            zoom_factor: self.zoom.factor(),
            zoom_step: self.zoom.step_percent,
            horizontal_shift: self.viewport.shift.secondary,
            vertical_shift: self.viewport.shift.primary,
            landscape: self.viewport.orientation.is_landscape(),
            window_mark: self.window_mark,
            multi_column: self.viewport.multi_column,
            origin_x: self.viewport.geometry.view.x,
            origin_y: self.viewport.geometry.view.y,
            page: self.page,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.engine.page_count()
    }

    pub fn geometry(&self) -> Geometry {
        self.viewport.geometry
    }

    pub fn orientation(&self) -> Orientation {
        self.viewport.orientation
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn shift(&self) -> ShiftFactors {
        self.viewport.shift
    }

    pub fn multi_column(&self) -> bool {
        self.viewport.multi_column
    }

    pub fn pending_edge(&self) -> PendingEdge {
        self.viewport.pending
    }

    pub fn window_mark(&self) -> bool {
        self.window_mark
    }

    pub fn mark_position(&self) -> Option<u32> {
        self.mark
    }

    pub fn saved_view(&self) -> Option<&SavedView> {
        self.slot.get()
    }

    pub fn frame_valid(&self) -> bool {
        self.frame_valid
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

fn decode<E: DocumentEngine>(engine: &mut E, page: usize) -> Result<PageInfo, NavError> {
    let started = Instant::now();
    let decoded = engine.load_page(page);
    debug!("Decoding page {page} took {:?}", started.elapsed());
    decoded.map_err(|source| {
        warn!("Failed to decode page {page}: {source}");
        NavError::Decode { page, source }
    })
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
