//! Frames, sampling regions, and the fixed per-session geometry.

use std::ops::Range;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A raw camera frame: `height` rows of `width` 8-bit RGB pixels.
pub type Frame = RgbImage;

/// Geometry of a leveling session.
///
/// Fixed for a given frame size and margin. The left region spans columns
/// `[margin, center_x)`, the right region `[center_x, width - margin)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    width: u32,
    height: u32,
    margin_width: u32,
}

impl FrameGeometry {
    /// Validate a frame size and margin.
    ///
    /// Requires `margin < center_x < width - margin` so both regions are
    /// non-empty and the center distance is non-zero.
    pub fn new(width: u32, height: u32, margin_width: u32) -> Result<Self, ModelError> {
        if height == 0 {
            return Err(ModelError::EmptyFrame);
        }
        let center_x = width / 2;
        if margin_width >= center_x || center_x >= width.saturating_sub(margin_width) {
            return Err(ModelError::MarginTooWide {
                margin_width,
                width,
                center_x,
            });
        }
        Ok(Self {
            width,
            height,
            margin_width,
        })
    }

    /// Geometry of an existing frame.
    pub fn of(frame: &Frame, margin_width: u32) -> Result<Self, ModelError> {
        Self::new(frame.width(), frame.height(), margin_width)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margin_width(&self) -> u32 {
        self.margin_width
    }

    /// Horizontal frame center (integer, rounded down).
    pub fn center_x(&self) -> u32 {
        self.width / 2
    }

    /// Horizontal distance used to convert a row shift into an angle.
    ///
    /// Always positive for a validated geometry.
    pub fn center_x_delta(&self) -> u32 {
        self.center_x() - self.margin_width
    }

    /// Column span of the left sampling region.
    pub fn left_columns(&self) -> Range<u32> {
        self.margin_width..self.center_x()
    }

    /// Column span of the right sampling region.
    pub fn right_columns(&self) -> Range<u32> {
        self.center_x()..self.width - self.margin_width
    }

    /// Check that a frame matches this geometry.
    pub fn check(&self, frame: &Frame) -> Result<(), ModelError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(ModelError::GeometryMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
        Ok(())
    }

    /// Left and right regions of a frame with this geometry.
    pub fn split<'a>(&self, frame: &'a Frame) -> Result<(Region<'a>, Region<'a>), ModelError> {
        self.check(frame)?;
        Ok((
            Region::new(frame, self.left_columns())?,
            Region::new(frame, self.right_columns())?,
        ))
    }
}

/// A full-height column span of a frame.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    frame: &'a Frame,
    columns: Range<u32>,
}

impl<'a> Region<'a> {
    /// Borrow columns `[start, end)` of every row of `frame`.
    ///
    /// The span may be empty; consumers that need pixels reject that.
    pub fn new(frame: &'a Frame, columns: Range<u32>) -> Result<Self, ModelError> {
        if columns.start > columns.end || columns.end > frame.width() {
            return Err(ModelError::ColumnsOutOfBounds {
                start: columns.start,
                end: columns.end,
                width: frame.width(),
            });
        }
        Ok(Self { frame, columns })
    }

    /// The whole frame as one region.
    pub fn full(frame: &'a Frame) -> Self {
        Self {
            frame,
            columns: 0..frame.width(),
        }
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn width(&self) -> u32 {
        self.columns.end - self.columns.start
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn columns(&self) -> Range<u32> {
        self.columns.clone()
    }

    /// Pixels of row `y` inside the region, left to right.
    pub fn row(&self, y: u32) -> impl Iterator<Item = &'a Rgb<u8>> + 'a {
        let frame = self.frame;
        self.columns.clone().map(move |x| frame.get_pixel(x, y))
    }
}

/// What the display sink receives for each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// The frame rotated by the estimated corrective angle.
    #[default]
    Corrected,
    /// Row profiles of the original and corrected frames, side by side.
    Comparison,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corrected" => Ok(Self::Corrected),
            "comparison" => Ok(Self::Comparison),
            other => Err(format!("unknown view mode '{other}' (expected corrected|comparison)")),
        }
    }
}
