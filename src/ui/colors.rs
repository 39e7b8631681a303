//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for secondary labels.
    pub const LABEL: Color32 = Color32::from_rgb(160, 160, 160);
    /// Field titles (a light gray, like the dark theme's captions).
    pub const TITLE: Color32 = Color32::from_rgb(189, 189, 189);
    /// Error text.
    pub const ERROR: Color32 = Color32::from_rgb(255, 90, 90);
}

/// Colors for the coordinate form.
pub mod input {
    use super::Color32;

    /// Outline drawn around fields of a pair that failed validation.
    pub const ERROR_STROKE: Color32 = Color32::from_rgb(244, 67, 54);
    /// Preset shortcut buttons.
    pub const PRESET_FILL: Color32 = Color32::from_rgb(46, 125, 50);
    /// Primary action buttons.
    pub const PRIMARY_FILL: Color32 = Color32::from_rgb(30, 100, 180);
}

/// Colors for the image slot.
pub mod panel {
    use super::Color32;

    /// Slot background.
    pub const BACKGROUND: Color32 = Color32::from_rgb(33, 33, 33);
    /// Placeholder text inside an empty slot.
    pub const PLACEHOLDER: Color32 = Color32::from_rgb(140, 140, 160);

    /// Progress overlay - requires alpha, use function.
    pub fn progress_overlay() -> Color32 {
        Color32::from_rgba_unmultiplied(245, 245, 245, 26)
    }
}

/// Colors for query phase indicators.
pub mod phase {
    use super::Color32;

    pub const IDLE: Color32 = Color32::from_rgb(100, 100, 100);
    /// Orange - waiting on the service.
    pub const LOADING: Color32 = Color32::from_rgb(255, 180, 50);
    /// Green - result shown.
    pub const READY: Color32 = Color32::from_rgb(100, 200, 100);
    /// Red - gave up.
    pub const FAILED: Color32 = Color32::from_rgb(255, 80, 80);
}
