//! Frame-level tilt estimation: split, reduce, search, convert.

use levelcam_common::config::TiltConfig;
use levelcam_common::error::LevelcamResult;
use levelcam_frame_model::{
    round_tenth, Estimate, Frame, FrameGeometry, SearchRange, ShiftCandidate,
};
use serde::{Deserialize, Serialize};

use crate::reduce::reduce_to_column;
use crate::shift::{shift_to_angle, ShiftEstimator};

/// Estimates tilt for frames of one fixed geometry.
///
/// Construction validates the margin against the frame size, so a
/// degenerate configuration is rejected before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltEstimator {
    geometry: FrameGeometry,
    shift: ShiftEstimator,
}

/// An estimate together with every candidate that was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiltReport {
    pub estimate: Estimate,
    pub candidates: Vec<ShiftCandidate>,
    pub center_x_delta: u32,
}

/// One row of the candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub shift: i32,
    /// Corrective angle this shift would imply, rounded to 0.1 degree.
    pub angle_degrees: f64,
    pub score: f64,
}

impl TiltReport {
    /// Candidates with the corrective angle each one implies.
    pub fn candidate_table(&self) -> Vec<CandidateRow> {
        self.candidates
            .iter()
            .map(|c| CandidateRow {
                shift: c.shift,
                angle_degrees: shift_to_angle(c.shift, self.center_x_delta)
                    .map(round_tenth)
                    .unwrap_or(0.0),
                score: c.score,
            })
            .collect()
    }
}

impl TiltEstimator {
    pub fn new(geometry: FrameGeometry, search_range: SearchRange) -> Self {
        Self {
            geometry,
            shift: ShiftEstimator::new(search_range),
        }
    }

    /// Build an estimator for the geometry of `frame`.
    pub fn for_frame(frame: &Frame, config: &TiltConfig) -> LevelcamResult<Self> {
        let geometry = FrameGeometry::of(frame, config.margin_width)?;
        Ok(Self::new(geometry, config.search_range))
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn search_range(&self) -> SearchRange {
        self.shift.search_range()
    }

    /// Estimate the corrective angle of one frame.
    pub fn estimate(&self, frame: &Frame) -> LevelcamResult<Estimate> {
        Ok(self.estimate_detailed(frame)?.estimate)
    }

    /// Estimate one frame and keep the full candidate table.
    pub fn estimate_detailed(&self, frame: &Frame) -> LevelcamResult<TiltReport> {
        let (left, right) = self.geometry.split(frame)?;
        let left = reduce_to_column(&left)?;
        let right = reduce_to_column(&right)?;

        let center_x_delta = self.geometry.center_x_delta();
        let scan = self.shift.scan(&left, &right)?;
        let estimate = self.shift.select(&scan, left.len(), center_x_delta)?;

        Ok(TiltReport {
            estimate,
            candidates: scan.candidates,
            center_x_delta,
        })
    }
}

/// Estimate the tilt of a single frame.
pub fn estimate_tilt(
    frame: &Frame,
    margin_width: u32,
    search_range: SearchRange,
) -> LevelcamResult<Estimate> {
    Ok(estimate_tilt_detailed(frame, margin_width, search_range)?.estimate)
}

/// Estimate the tilt of a single frame, keeping every scored candidate.
pub fn estimate_tilt_detailed(
    frame: &Frame,
    margin_width: u32,
    search_range: SearchRange,
) -> LevelcamResult<TiltReport> {
    let geometry = FrameGeometry::of(frame, margin_width)?;
    TiltEstimator::new(geometry, search_range).estimate_detailed(frame)
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    /// Horizontal stripes, right half displaced down by `offset` rows.
    fn stepped_frame(width: u32, height: u32, offset: i32) -> Frame {
        Frame::from_fn(width, height, |x, y| {
            let y = if x >= width / 2 {
                y as i32 - offset
            } else {
                y as i32
            };
            let v = (y.rem_euclid(40) * 6) as u8;
            Rgb([v, v / 2, 255 - v])
        })
    }

    #[test]
    fn test_level_frame_has_zero_angle() {
        let frame = stepped_frame(240, 120, 0);
        let estimate = estimate_tilt(&frame, 20, SearchRange::default()).unwrap();
        assert_eq!(estimate.shift, 0);
        assert_eq!(estimate.angle_degrees, 0.0);
    }

    #[test]
    fn test_displaced_right_half_is_recovered() {
        // right[j] = left[j - 3], so left[j] matches right[j + 3]: shift -3
        let frame = stepped_frame(240, 120, 3);
        let report = estimate_tilt_detailed(&frame, 20, SearchRange::default()).unwrap();
        assert_eq!(report.estimate.shift, -3);
        assert_eq!(report.center_x_delta, 100);
        let expected = (3.0f64 / 100.0).atan().to_degrees();
        assert!((report.estimate.angle_degrees - expected).abs() < 1e-12);
    }

    #[test]
    fn test_candidate_table_has_rounded_angles() {
        let frame = stepped_frame(240, 120, 0);
        let report = estimate_tilt_detailed(&frame, 20, SearchRange::default()).unwrap();
        let table = report.candidate_table();
        assert_eq!(table.len(), 20);
        let first = table[0];
        assert_eq!(first.shift, -10);
        // atan(10 / 100) = 5.71 degrees
        assert!((first.angle_degrees - 5.7).abs() < 1e-9);
        assert_eq!(table[10].angle_degrees, 0.0);
    }

    #[test]
    fn test_candidate_table_uses_corrective_sign() {
        let frame = stepped_frame(240, 120, 3);
        let report = estimate_tilt_detailed(&frame, 20, SearchRange::default()).unwrap();
        let table = report.candidate_table();
        let winner = table
            .iter()
            .find(|row| row.shift == report.estimate.shift)
            .unwrap();
        assert_eq!(winner.angle_degrees, report.estimate.rounded_angle());
        assert!(winner.angle_degrees > 0.0);
        assert!(table.iter().all(|row| row.shift * row.angle_degrees.signum() as i32 <= 0));
    }

    #[test]
    fn test_margin_reaching_center_is_rejected() {
        let frame = stepped_frame(240, 120, 0);
        let err = estimate_tilt(&frame, 120, SearchRange::default()).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_estimator_rejects_frames_of_other_sizes() {
        let config = TiltConfig {
            margin_width: 20,
            ..Default::default()
        };
        let estimator = TiltEstimator::for_frame(&stepped_frame(240, 120, 0), &config).unwrap();
        let err = estimator.estimate(&stepped_frame(240, 100, 0)).unwrap_err();
        assert!(err.is_precondition());
    }
}
