// Export modules for use in tests
pub mod columns;
pub mod controller;
pub mod document;
pub mod error;
pub mod geometry;
pub mod panic_handler;
pub mod persist;
pub mod script;
pub mod settings;
pub mod snapshot;
pub mod transition;
pub mod viewport;
pub mod zoom;

pub use controller::{Command, Effect, FrameStatus, NavOutcome, ViewportController};
pub use document::{DecodeError, DocumentEngine, Frame, MemoryDocument, PageInfo, PageSpec};
pub use error::NavError;
pub use geometry::{Geometry, Orientation, ScreenSize, Size, ViewRect};
pub use persist::ViewSettings;
pub use transition::NavInput;
