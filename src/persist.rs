//! Per-document view settings
//!
//! Stored next to the document as `<document>.ini`, one `key=value` per line.
//! The values only count when they were written for the page being opened;
//! otherwise the defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::viewport::ShiftFactors;
use crate::zoom::Zoom;

const ZOOM_FACTOR: &str = "zoom_factor";
const ZOOM_STEP: &str = "zoom_factor_inc";
const HORIZONTAL_SHIFT: &str = "horiz_shift_factor";
const VERTICAL_SHIFT: &str = "vert_shift_factor";
const LANDSCAPE: &str = "landscape";
const WINDOW_MARK: &str = "show_wmark";
const MULTI_COLUMN: &str = "multicol";
const ORIGIN_X: &str = "rrect.x";
const ORIGIN_Y: &str = "rrect.y";
const PAGE: &str = "page_number";

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSettings {
    pub zoom_factor: f32,
    pub zoom_step: u32,
    /// Secondary-axis shift in portrait terms
    pub horizontal_shift: u32,
    /// Primary-axis shift in portrait terms
    pub vertical_shift: u32,
    pub landscape: bool,
    pub window_mark: bool,
    pub multi_column: bool,
    pub origin_x: u32,
    pub origin_y: u32,
    pub page: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            zoom_step: Zoom::DEFAULT_STEP,
            horizontal_shift: ShiftFactors::DEFAULT,
            vertical_shift: ShiftFactors::DEFAULT,
            landscape: false,
            window_mark: false,
            multi_column: false,
            origin_x: 0,
            origin_y: 0,
            page: 0,
        }
    }
}

/// `book.djvu` -> `book.djvu.ini`
#[must_use]
pub fn settings_path(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_owned();
    name.push(".ini");
    PathBuf::from(name)
}

impl ViewSettings {
    /// Parse settings text. Unknown keys are ignored and malformed values
    /// keep their defaults.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            let applied = match key {
                ZOOM_FACTOR => parse_into(value, &mut settings.zoom_factor),
                ZOOM_STEP => parse_into(value, &mut settings.zoom_step),
                HORIZONTAL_SHIFT => parse_into(value, &mut settings.horizontal_shift),
                VERTICAL_SHIFT => parse_into(value, &mut settings.vertical_shift),
                LANDSCAPE => parse_flag(value, &mut settings.landscape),
                WINDOW_MARK => parse_flag(value, &mut settings.window_mark),
                MULTI_COLUMN => parse_flag(value, &mut settings.multi_column),
                ORIGIN_X => parse_into(value, &mut settings.origin_x),
                ORIGIN_Y => parse_into(value, &mut settings.origin_y),
                PAGE => parse_into(value, &mut settings.page),
                _ => true,
            };
            if !applied {
                warn!("Ignoring malformed view setting {key}={value}");
            }
        }
        settings
    }

    /// Settings to open `page` with: the stored values if they were saved on
    /// that page, defaults otherwise.
    #[must_use]
    pub fn for_page(self, page: usize) -> Self {
        if self.page == page {
            self
        } else {
            debug!(
                "View settings were saved on page {}, opening page {page}: using defaults",
                self.page
            );
            Self {
                page,
                ..Self::default()
            }
        }
    }

    /// Page to reopen the document on. A stored page the document no longer
    /// has falls back to the first page.
    #[must_use]
    pub fn resume_page(&self, page_count: usize) -> usize {
        if self.page < page_count {
            self.page
        } else {
            warn!(
                "Stored page {} is outside the document ({page_count} pages), opening the first page",
                self.page + 1
            );
            0
        }
    }

    /// Read settings from `path`; a missing file yields `None`
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        debug!("Loaded view settings from {path:?}");
        Ok(Some(Self::parse(&content)))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.to_ini())?;
        debug!("Saved view settings to {path:?}");
        Ok(())
    }

    #[must_use]
    pub fn to_ini(&self) -> String {
        let mut content = String::new();
        content.push_str(&format!("{ZOOM_FACTOR}={:.6}\n", self.zoom_factor));
        content.push_str(&format!("{ZOOM_STEP}={}\n", self.zoom_step));
        content.push_str(&format!("{HORIZONTAL_SHIFT}={}\n", self.horizontal_shift));
        content.push_str(&format!("{VERTICAL_SHIFT}={}\n", self.vertical_shift));
        content.push_str(&format!("{LANDSCAPE}={}\n", u8::from(self.landscape)));
        content.push_str(&format!("{WINDOW_MARK}={}\n", u8::from(self.window_mark)));
        content.push_str(&format!("{MULTI_COLUMN}={}\n", u8::from(self.multi_column)));
        content.push_str(&format!("{ORIGIN_X}={}\n", self.origin_x));
        content.push_str(&format!("{ORIGIN_Y}={}\n", self.origin_y));
        content.push_str(&format!("{PAGE}={}\n", self.page));
        content
    }
}

fn parse_into<T: std::str::FromStr>(value: &str, slot: &mut T) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

fn parse_flag(value: &str, slot: &mut bool) -> bool {
    let mut number = 0u8;
    if parse_into(value, &mut number) {
        *slot = number != 0;
        true
    } else {
        false
    }
}
