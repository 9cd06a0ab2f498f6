//! Flat key:value settings files, the only persisted state.
//!
//! Two files: `params.txt` with the simulation parameters and `session.txt`
//! with the scheduler settings. Values are whitespace-separated positional
//! tokens like `Width:60`; parsing extracts the trailing numeric substring of
//! each token, so the label prefix is tolerated but never required. A missing
//! or malformed file falls back to the built-in defaults, never an error.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::prelude::*;

/// Grid Engine parameters, applied at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
    pub wrap: bool,
    pub fade_force: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            width: DEF_WIDTH,
            height: DEF_HEIGHT,
            tile_size: DEF_TILE_SIZE,
            wrap: DEF_WRAP,
            fade_force: DEF_FADE_FORCE,
        }
    }
}

impl SimParams {
    pub fn load(path: &Path) -> Self {
        let mut params = Self::default();
        let Ok(text) = fs::read_to_string(path) else {
            return params;
        };

        let mut tokens = text.split_whitespace();
        if let Some(v) = tokens.next().and_then(extract_int) {
            params.width = v;
        }
        if let Some(v) = tokens.next().and_then(extract_int) {
            params.height = v;
        }
        if let Some(v) = tokens.next().and_then(extract_int) {
            params.tile_size = v;
        }
        if let Some(v) = tokens.next().and_then(extract_int) {
            params.wrap = v != 0;
        }
        if let Some(v) = tokens.next().and_then(extract_float) {
            params.fade_force = v as f32;
        }
        params
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = format!(
            "Width:{}\nHeight:{}\nTileSize:{}\nWrap:{}\nFadeForce:{}\n",
            self.width,
            self.height,
            self.tile_size,
            self.wrap as i32,
            self.fade_force
        );
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}

/// Scheduler/driver settings, not consumed by the Grid Engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub vsync: bool,
    /// Seconds between generations, clamped to `[0, MAX_DELAY]`.
    pub delay: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            vsync: DEF_VSYNC,
            delay: DEF_DELAY,
        }
    }
}

impl SessionSettings {
    pub fn load(path: &Path) -> Self {
        let mut settings = Self::default();
        let Ok(text) = fs::read_to_string(path) else {
            return settings;
        };

        let mut tokens = text.split_whitespace();
        if let Some(v) = tokens.next().and_then(extract_int) {
            settings.vsync = v != 0;
        }
        if let Some(v) = tokens.next().and_then(extract_float) {
            settings.delay = v.clamp(0.0, MAX_DELAY);
        }
        settings
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = format!(
            "VerticalSync:{}\nDelay:{}\n",
            self.vsync as i32, self.delay
        );
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}

/// Trailing run of decimal digits in `token`, e.g. `"Width:60"` -> `60`.
fn extract_int(token: &str) -> Option<i32> {
    let start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    token[start..].parse().ok()
}

/// Like [`extract_int`], but also accepts a single integer digit and a
/// decimal point ahead of the trailing digits, e.g. `"Delay:0.03"` -> `0.03`.
fn extract_float(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    if start >= 2 && bytes[start - 1] == b'.' && bytes[start - 2].is_ascii_digit() {
        start -= 2;
    }
    token[start..].parse().ok()
}
