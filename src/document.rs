//! Document engine interface
//!
//! The controller never decodes anything itself. It asks a [`DocumentEngine`]
//! for page dimensions and for a rendered window, and treats both calls as
//! blocking.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Orientation, ScreenSize, Size, ViewRect};

/// Background value for frame pixels outside the rendered window
pub const PAGE_BACKGROUND: u8 = 0xFF;

/// Errors reported by a document engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("page {page} does not exist")]
    NoSuchPage { page: usize },

    #[error("page {page} reports an empty size")]
    EmptyPage { page: usize },

    #[error("page {page} failed to decode: {detail}")]
    Corrupt { page: usize, detail: String },
}

/// Native dimensions of a decoded page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub width: u32,
    pub height: u32,
}

impl PageInfo {
    /// Height over width of the unrotated page
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// What to draw: a window of the page scaled to `page`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub page: Size,
    pub view: ViewRect,
    pub orientation: Orientation,
}

/// 8-bit greyscale screen buffer, one byte per pixel, row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    #[must_use]
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            width: screen.width,
            height: screen.height,
            pixels: vec![PAGE_BACKGROUND; screen.width as usize * screen.height as usize],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(PAGE_BACKGROUND);
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            self.pixels[idx] = value;
        }
    }
}

/// Source of page dimensions and pixels
pub trait DocumentEngine {
    fn page_count(&self) -> usize;

    /// Decode a page and report its native size. Blocks until decoding
    /// finishes or fails.
    fn load_page(&mut self, page: usize) -> Result<PageInfo, DecodeError>;

    /// Render `request.view` of the page, scaled to `request.page`, into the
    /// top-left corner of `frame`.
    fn render(
        &mut self,
        page: usize,
        request: &RenderRequest,
        frame: &mut Frame,
    ) -> Result<(), DecodeError>;

    fn contains(&self, page: usize) -> bool {
        page < self.page_count()
    }
}

/// Page description used by [`MemoryDocument`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub width: u32,
    pub height: u32,
    /// Make the page fail to decode
    #[serde(default)]
    pub corrupt: bool,
}

/// Engine over a list of page sizes. Renders a checkerboard in page
/// coordinates so that panning is visible in the output.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryDocument {
    pages: Vec<PageSpec>,
    #[serde(skip)]
    decodes: usize,
    #[serde(skip)]
    renders: usize,
}

impl MemoryDocument {
    /// Checkerboard cell size in page pixels
    pub const TILE: u32 = 64;
    pub const LIGHT: u8 = 0xFF;
    pub const DARK: u8 = 0xC0;

    #[must_use]
    pub fn new(pages: Vec<PageSpec>) -> Self {
        Self {
            pages,
            decodes: 0,
            renders: 0,
        }
    }

    /// `count` pages of the same native size
    #[must_use]
    pub fn uniform(count: usize, width: u32, height: u32) -> Self {
        Self::new(vec![
            PageSpec {
                width,
                height,
                corrupt: false,
            };
            count
        ])
    }

    /// Load a `{"pages": [{"width": .., "height": ..}, ..]}` description
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let document: Self = serde_json::from_str(&content)?;
        debug!("Loaded {} page descriptions from {path:?}", document.pages.len());
        Ok(document)
    }

    pub fn mark_corrupt(&mut self, page: usize) {
        if let Some(spec) = self.pages.get_mut(page) {
            spec.corrupt = true;
        }
    }

    /// Number of successful and failed decode calls so far
    #[must_use]
    pub fn decode_count(&self) -> usize {
        self.decodes
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }

    fn spec(&self, page: usize) -> Result<&PageSpec, DecodeError> {
        let spec = self.pages.get(page).ok_or(DecodeError::NoSuchPage { page })?;
        if spec.corrupt {
            return Err(DecodeError::Corrupt {
                page,
                detail: "marked corrupt".to_string(),
            });
        }
        if spec.width == 0 || spec.height == 0 {
            return Err(DecodeError::EmptyPage { page });
        }
        Ok(spec)
    }
}

impl DocumentEngine for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&mut self, page: usize) -> Result<PageInfo, DecodeError> {
        self.decodes += 1;
        let spec = self.spec(page)?;
        Ok(PageInfo {
            width: spec.width,
            height: spec.height,
        })
    }

    fn render(
        &mut self,
        page: usize,
        request: &RenderRequest,
        frame: &mut Frame,
    ) -> Result<(), DecodeError> {
        self.spec(page)?;
        self.renders += 1;
        frame.clear();
        let view = request.view;
        for fy in 0..view.height.min(frame.height) {
            for fx in 0..view.width.min(frame.width) {
                let tile = (view.x + fx) / Self::TILE + (view.y + fy) / Self::TILE;
                let value = if tile % 2 == 0 { Self::LIGHT } else { Self::DARK };
                frame.set_pixel(fx, fy, value);
            }
        }
        Ok(())
    }
}
