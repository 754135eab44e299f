//! Zoom factor state
//!
//! The factor scales the screen dimension that drives the page rectangle
//! (width in portrait, height in landscape). Steps are expressed as a
//! percentage of the unzoomed size.

/// Zoom factor and the step used by zoom in/out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    /// Current zoom factor (1.0 = page fills the driving screen dimension)
    pub factor: f32,

    /// Zoom change per step, in percent
    pub step_percent: u32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: 1.0,
            step_percent: Self::DEFAULT_STEP,
        }
    }
}

impl Zoom {
    /// Minimum allowed zoom factor
    pub const MIN_FACTOR: f32 = 0.02;
    /// Default step - 10%
    pub const DEFAULT_STEP: u32 = 10;
    pub const MIN_STEP: u32 = 1;
    pub const MAX_STEP: u32 = 800;
    /// A long press applies this many steps at once
    pub const LONG_PRESS_STEPS: u32 = 3;

    #[must_use]
    pub fn new(factor: f32, step_percent: u32) -> Self {
        Self {
            factor: Self::clamp_factor(factor),
            step_percent: Self::clamp_step(step_percent),
        }
    }

    /// Returns the current zoom factor
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Zoom in by one step, or by a long-press worth of steps
    pub fn step_in(&mut self, long: bool) {
        self.factor = Self::clamp_factor(self.factor + self.increment(long));
    }

    /// Zoom out by one step, or by a long-press worth of steps
    pub fn step_out(&mut self, long: bool) {
        self.factor = Self::clamp_factor(self.factor - self.increment(long));
    }

    pub fn reset(&mut self) {
        self.factor = 1.0;
    }

    pub fn set_step(&mut self, percent: u32) {
        self.step_percent = Self::clamp_step(percent);
    }

    fn increment(&self, long: bool) -> f32 {
        let steps = if long { Self::LONG_PRESS_STEPS } else { 1 };
        (steps * self.step_percent) as f32 / 100.0
    }

    /// Clamp factor to valid range, handling NaN/Inf
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            1.0
        } else {
            factor.max(Self::MIN_FACTOR)
        }
    }

    pub fn clamp_step(percent: u32) -> u32 {
        percent.clamp(Self::MIN_STEP, Self::MAX_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_in_and_out_by_step_percent() {
        let mut zoom = Zoom::default();
        zoom.step_in(false);
        assert!((zoom.factor() - 1.1).abs() < 1e-5);

        zoom.step_out(false);
        zoom.step_out(false);
        assert!((zoom.factor() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn long_press_applies_three_steps() {
        let mut zoom = Zoom::new(1.0, 20);
        zoom.step_in(true);
        assert!((zoom.factor() - 1.6).abs() < 1e-5);
    }

    #[test]
    fn zoom_out_stops_at_minimum() {
        let mut zoom = Zoom::new(0.1, 50);
        zoom.step_out(true);
        assert_eq!(zoom.factor(), Zoom::MIN_FACTOR);
    }

    #[test]
    fn non_finite_factor_resets() {
        assert_eq!(Zoom::clamp_factor(f32::NAN), 1.0);
        assert_eq!(Zoom::clamp_factor(f32::INFINITY), 1.0);
        assert_eq!(Zoom::new(-3.0, 10).factor(), Zoom::MIN_FACTOR);
    }

    #[test]
    fn step_is_bounded() {
        let mut zoom = Zoom::default();
        zoom.set_step(0);
        assert_eq!(zoom.step_percent, Zoom::MIN_STEP);
        zoom.set_step(5000);
        assert_eq!(zoom.step_percent, Zoom::MAX_STEP);
    }
}
