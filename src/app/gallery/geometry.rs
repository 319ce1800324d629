// SPDX-License-Identifier: GPL-3.0-only

//! Thumbnail geometry for face overlays
//!
//! A photo of any aspect ratio is uniformly scaled into a square thumbnail
//! box and centered, leaving letterbox (landscape) or pillarbox (portrait)
//! bars. Face bounds reported in native pixel space are mapped through the
//! same scale and offset so the overlay sits on the face in the thumbnail.

use crate::backends::face_detection::FaceBounds;
use std::num::NonZeroU32;

/// Tolerance for containment checks on mapped rectangles
const EPSILON: f64 = 1e-9;

/// Native pixel dimensions of an image, never zero in either direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl ImageDimensions {
    /// Returns `None` when either side is zero, since no scale exists for it
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Rectangle in thumbnail display space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `self` lies entirely inside `outer`
    pub fn is_within(&self, outer: &OverlayRect) -> bool {
        self.left >= outer.left - EPSILON
            && self.top >= outer.top - EPSILON
            && self.right() <= outer.right() + EPSILON
            && self.bottom() <= outer.bottom() + EPSILON
    }
}

/// Scale and centering of one image inside the thumbnail box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ThumbnailGeometry {
    /// Fit `image` into a square box of side `box_size`
    ///
    /// Landscape images span the full width and are centered vertically;
    /// portrait and square images span the full height and are centered
    /// horizontally.
    pub fn fit(image: ImageDimensions, box_size: f64) -> Self {
        let width = f64::from(image.width());
        let height = f64::from(image.height());

        if width > height {
            let display_height = box_size * height / width;
            Self {
                display_width: box_size,
                display_height,
                scale_x: box_size / width,
                scale_y: display_height / height,
                offset_x: 0.0,
                offset_y: (box_size - display_height) / 2.0,
            }
        } else {
            let display_width = box_size * width / height;
            Self {
                display_width,
                display_height: box_size,
                scale_x: display_width / width,
                scale_y: box_size / height,
                offset_x: (box_size - display_width) / 2.0,
                offset_y: 0.0,
            }
        }
    }

    /// Map native-space face bounds into display space
    pub fn map(&self, bounds: &FaceBounds) -> OverlayRect {
        OverlayRect {
            left: self.offset_x + bounds.origin.x * self.scale_x,
            top: self.offset_y + bounds.origin.y * self.scale_y,
            width: bounds.size.width * self.scale_x,
            height: bounds.size.height * self.scale_y,
        }
    }

    /// Area of the box actually covered by the scaled image
    pub fn display_rect(&self) -> OverlayRect {
        OverlayRect {
            left: self.offset_x,
            top: self.offset_y,
            width: self.display_width,
            height: self.display_height,
        }
    }
}
