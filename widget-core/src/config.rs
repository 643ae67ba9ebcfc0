//! Editor configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::document::CanvasSize;
use crate::{CanvasError, CanvasResult};

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default minimum width/height after a resize.
pub const DEFAULT_MIN_ELEMENT_SIZE: f32 = 1.0;

/// Default lower bound for scaled text.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 8.0;

/// Default upper bound for scaled text.
pub const DEFAULT_MAX_FONT_SIZE: f32 = 200.0;

/// Tunables of the editing engine. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps; the oldest snapshot is dropped first.
    pub history_limit: usize,
    /// Minimum width and height of any element after a resize.
    pub min_element_size: f32,
    /// Lower bound of the text font-size rescale on resize.
    pub min_font_size: f32,
    /// Upper bound of the text font-size rescale on resize.
    pub max_font_size: f32,
    /// Offset applied to duplicated elements, on both axes.
    pub duplicate_offset: f32,
    /// Canvas size of a new blank document.
    pub canvas_size: CanvasSize,
    /// Grid spacing of a new document.
    pub grid_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_element_size: DEFAULT_MIN_ELEMENT_SIZE,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            duplicate_offset: 10.0,
            canvas_size: CanvasSize::default(),
            grid_size: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CanvasResult<()> {
        if self.history_limit == 0 {
            return Err(CanvasError::InvalidConfig(
                "historyLimit must be at least 1".into(),
            ));
        }
        if !positive(self.min_element_size) {
            return Err(CanvasError::InvalidConfig(
                "minElementSize must be positive".into(),
            ));
        }
        if !self.font_range_is_valid() {
            return Err(CanvasError::InvalidConfig(format!(
                "font size range {}..={} is empty",
                self.min_font_size, self.max_font_size
            )));
        }
        if !self.duplicate_offset.is_finite() {
            return Err(CanvasError::InvalidConfig(
                "duplicateOffset must be finite".into(),
            ));
        }
        if !self.canvas_size.is_valid() {
            return Err(CanvasError::InvalidConfig(
                "canvasSize must be positive".into(),
            ));
        }
        if !positive(self.grid_size) {
            return Err(CanvasError::InvalidConfig(
                "gridSize must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Replace every out-of-range value with its default.
    ///
    /// Used where a configuration arrives without going through
    /// [`validate`](Self::validate); each replacement is logged.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.history_limit == 0 {
            tracing::warn!("Config: historyLimit 0 replaced by {}", defaults.history_limit);
            self.history_limit = defaults.history_limit;
        }
        if !positive(self.min_element_size) {
            tracing::warn!("Config: minElementSize {} replaced", self.min_element_size);
            self.min_element_size = defaults.min_element_size;
        }
        if !self.font_range_is_valid() {
            tracing::warn!(
                "Config: font size range {}..={} replaced",
                self.min_font_size,
                self.max_font_size
            );
            self.min_font_size = defaults.min_font_size;
            self.max_font_size = defaults.max_font_size;
        }
        if !self.duplicate_offset.is_finite() {
            tracing::warn!("Config: duplicateOffset {} replaced", self.duplicate_offset);
            self.duplicate_offset = defaults.duplicate_offset;
        }
        if !self.canvas_size.is_valid() {
            tracing::warn!("Config: canvasSize replaced");
            self.canvas_size = defaults.canvas_size;
        }
        if !positive(self.grid_size) {
            tracing::warn!("Config: gridSize {} replaced", self.grid_size);
            self.grid_size = defaults.grid_size;
        }
        self
    }

    fn font_range_is_valid(&self) -> bool {
        positive(self.min_font_size)
            && self.max_font_size.is_finite()
            && self.min_font_size <= self.max_font_size
    }

    /// The text font-size clamp range.
    #[must_use]
    pub fn font_size_range(&self) -> RangeInclusive<f32> {
        self.min_font_size..=self.max_font_size
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
