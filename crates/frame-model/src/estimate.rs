//! Shift candidates, the search range, and tilt estimates.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Default search radius: shifts `-10..10` are tested.
pub const DEFAULT_SEARCH_RADIUS: i32 = 10;

/// Candidate row shifts `[start, end)`, tested in ascending order.
///
/// The default is symmetric around zero and excludes its upper bound,
/// giving 20 candidates from -10 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SearchBounds")]
pub struct SearchRange {
    start: i32,
    end: i32,
}

#[derive(Deserialize)]
struct SearchBounds {
    start: i32,
    end: i32,
}

impl SearchRange {
    /// Range `[start, end)`. Rejects ranges with no shifts.
    pub fn new(start: i32, end: i32) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::InvalidSearchRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range `[-radius, radius)`.
    pub fn symmetric(radius: u32) -> Result<Self, ModelError> {
        let radius = i32::try_from(radius).map_err(|_| ModelError::InvalidSearchRange {
            start: i32::MIN,
            end: i32::MAX,
        })?;
        Self::new(-radius, radius)
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of candidate shifts.
    pub fn len(&self) -> usize {
        (self.end as i64 - self.start as i64) as usize
    }

    /// Always false for a constructed range.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, shift: i32) -> bool {
        (self.start..self.end).contains(&shift)
    }

    /// Candidate shifts in ascending order.
    pub fn shifts(&self) -> Range<i32> {
        self.start..self.end
    }
}

impl Default for SearchRange {
    fn default() -> Self {
        Self {
            start: -DEFAULT_SEARCH_RADIUS,
            end: DEFAULT_SEARCH_RADIUS,
        }
    }
}

impl TryFrom<SearchBounds> for SearchRange {
    type Error = ModelError;

    fn try_from(bounds: SearchBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

/// A tested row shift and its mean per-row color distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// Offset such that left row `j` is compared with right row `j - shift`.
    pub shift: i32,
    /// Mean Euclidean distance over the overlapping rows. Lower is better.
    pub score: f64,
}

/// The winning shift and the corrective rotation it implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub shift: i32,
    pub score: f64,
    /// Rotation in degrees that levels the frame; positive is counter-clockwise.
    pub angle_degrees: f64,
}

impl Estimate {
    /// Whether no correction is needed.
    pub fn is_level(&self) -> bool {
        self.shift == 0
    }

    /// The angle rounded to one decimal, as shown in logs.
    pub fn rounded_angle(&self) -> f64 {
        round_tenth(self.angle_degrees)
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
