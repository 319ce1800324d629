// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for capture engines
//!
//! Every discrete camera setting advances through a fixed cycle; zoom and
//! focus depth are normalized values clamped to `[0, 1]`.

use crate::constants::capture::{DEFAULT_RATIO, NORMALIZED_MAX, NORMALIZED_MIN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Front (selfie) camera
    Front,
    /// Back (world) camera
    #[default]
    Back,
}

impl CameraFacing {
    /// Switch to the other camera
    pub fn toggle(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CameraFacing::Front => "front",
            CameraFacing::Back => "back",
        }
    }
}

/// Flash operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlashMode {
    /// Flash never fires
    #[default]
    Off,
    /// Flash fires on every capture
    On,
    /// Engine decides based on scene brightness
    Auto,
    /// LED stays on continuously
    Torch,
}

impl FlashMode {
    /// Cycle order, starting from the default
    pub const ALL: [FlashMode; 4] = [
        FlashMode::Off,
        FlashMode::On,
        FlashMode::Auto,
        FlashMode::Torch,
    ];

    /// Cycle to the next mode: Off -> On -> Auto -> Torch -> Off
    pub fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Auto,
            FlashMode::Auto => FlashMode::Torch,
            FlashMode::Torch => FlashMode::Off,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlashMode::Off => "off",
            FlashMode::On => "on",
            FlashMode::Auto => "auto",
            FlashMode::Torch => "torch",
        }
    }
}

/// White balance preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WhiteBalance {
    #[default]
    Auto,
    Sunny,
    Cloudy,
    Shadow,
    Fluorescent,
    Incandescent,
}

impl WhiteBalance {
    /// Cycle order, starting from the default
    pub const ALL: [WhiteBalance; 6] = [
        WhiteBalance::Auto,
        WhiteBalance::Sunny,
        WhiteBalance::Cloudy,
        WhiteBalance::Shadow,
        WhiteBalance::Fluorescent,
        WhiteBalance::Incandescent,
    ];

    /// Cycle to the next preset, wrapping from Incandescent back to Auto
    pub fn next(self) -> Self {
        match self {
            WhiteBalance::Auto => WhiteBalance::Sunny,
            WhiteBalance::Sunny => WhiteBalance::Cloudy,
            WhiteBalance::Cloudy => WhiteBalance::Shadow,
            WhiteBalance::Shadow => WhiteBalance::Fluorescent,
            WhiteBalance::Fluorescent => WhiteBalance::Incandescent,
            WhiteBalance::Incandescent => WhiteBalance::Auto,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WhiteBalance::Auto => "auto",
            WhiteBalance::Sunny => "sunny",
            WhiteBalance::Cloudy => "cloudy",
            WhiteBalance::Shadow => "shadow",
            WhiteBalance::Fluorescent => "fluorescent",
            WhiteBalance::Incandescent => "incandescent",
        }
    }
}

/// Auto-focus switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutoFocus {
    #[default]
    On,
    Off,
}

impl AutoFocus {
    pub fn toggle(self) -> Self {
        match self {
            AutoFocus::On => AutoFocus::Off,
            AutoFocus::Off => AutoFocus::On,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, AutoFocus::On)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AutoFocus::On => "on",
            AutoFocus::Off => "off",
        }
    }
}

/// Clamp a normalized control value into `[0, 1]`
///
/// Returns `None` for NaN so callers can leave the current value untouched.
pub fn clamp_normalized(value: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(NORMALIZED_MIN, NORMALIZED_MAX))
}

/// Full configuration handed to the capture engine on every preview update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    pub facing: CameraFacing,
    pub flash: FlashMode,
    pub white_balance: WhiteBalance,
    /// Normalized zoom (0.0 = widest, 1.0 = maximum)
    pub zoom: f64,
    /// Normalized manual focus distance, used only while auto-focus is off
    pub focus_depth: f64,
    pub auto_focus: AutoFocus,
    /// Aspect ratio string as understood by the engine, e.g. "16:9"
    pub ratio: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            facing: CameraFacing::default(),
            flash: FlashMode::default(),
            white_balance: WhiteBalance::default(),
            zoom: NORMALIZED_MIN,
            focus_depth: NORMALIZED_MIN,
            auto_focus: AutoFocus::default(),
            ratio: DEFAULT_RATIO.to_string(),
        }
    }
}

impl CaptureSettings {
    /// Default settings with a custom starting aspect ratio
    pub fn with_ratio(ratio: impl Into<String>) -> Self {
        Self {
            ratio: ratio.into(),
            ..Self::default()
        }
    }

    /// Offset zoom by `delta`, snapping to the nearest bound on overshoot
    pub fn adjust_zoom(&mut self, delta: f64) {
        if let Some(zoom) = clamp_normalized(self.zoom + delta) {
            self.zoom = zoom;
        }
    }

    /// Set zoom from a slider value
    pub fn set_zoom(&mut self, value: f64) -> bool {
        match clamp_normalized(value) {
            Some(zoom) => {
                self.zoom = zoom;
                true
            }
            None => false,
        }
    }

    /// Offset focus depth by `delta`, snapping to the nearest bound on overshoot
    pub fn adjust_focus_depth(&mut self, delta: f64) {
        if let Some(depth) = clamp_normalized(self.focus_depth + delta) {
            self.focus_depth = depth;
        }
    }

    /// Set focus depth from a slider value
    pub fn set_focus_depth(&mut self, value: f64) -> bool {
        match clamp_normalized(value) {
            Some(depth) => {
                self.focus_depth = depth;
                true
            }
            None => false,
        }
    }
}

/// Image written by the capture engine, not yet moved into the photos directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Temporary location of the captured image
    pub path: PathBuf,
}
