//! Shift search between the left and right row profiles.
//!
//! # Algorithm
//!
//! 1. For every candidate shift `s` in the search range, compare left row `j`
//!    with right row `j - s` over the rows where both exist.
//! 2. **Score** each shift as the mean Euclidean color distance over that overlap.
//! 3. **Select** the lowest score; ties go to the smallest shift.
//! 4. **Convert** the winning shift to degrees: `atan(-s / center_x_delta)`.

use std::ops::Range;

use levelcam_common::error::{LevelcamError, LevelcamResult};
use levelcam_frame_model::{Estimate, RowProfile, SearchRange, ShiftCandidate};
use serde::{Deserialize, Serialize};

/// Searches a fixed range of row shifts for the best profile alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftEstimator {
    search_range: SearchRange,
}

/// Every scored candidate of one search, in ascending shift order.
///
/// Shifts whose overlap with the profiles is empty are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftScan {
    pub candidates: Vec<ShiftCandidate>,
}

impl ShiftScan {
    /// The lowest-scoring candidate, first one wins on ties.
    pub fn best(&self) -> Option<ShiftCandidate> {
        self.candidates.iter().copied().fold(None, |best, c| match best {
            Some(b) if b.score <= c.score => Some(b),
            _ => Some(c),
        })
    }
}

impl ShiftEstimator {
    pub fn new(search_range: SearchRange) -> Self {
        Self { search_range }
    }

    pub fn search_range(&self) -> SearchRange {
        self.search_range
    }

    /// Score every candidate shift.
    ///
    /// Both profiles must be non-empty and of equal length.
    pub fn scan(&self, left: &RowProfile, right: &RowProfile) -> LevelcamResult<ShiftScan> {
        if left.len() != right.len() {
            return Err(LevelcamError::precondition(format!(
                "profile lengths differ: left has {} rows, right has {}",
                left.len(),
                right.len()
            )));
        }
        if left.is_empty() {
            return Err(LevelcamError::precondition("profiles have no rows"));
        }

        let candidates = self
            .search_range
            .shifts()
            .filter_map(|shift| {
                shift_score(left, right, shift).map(|score| ShiftCandidate { shift, score })
            })
            .collect();

        Ok(ShiftScan { candidates })
    }

    /// Find the best shift and the angle it implies.
    ///
    /// `center_x_delta` is the horizontal distance between the two sampled
    /// regions; zero is rejected before any scoring happens.
    pub fn estimate(
        &self,
        left: &RowProfile,
        right: &RowProfile,
        center_x_delta: u32,
    ) -> LevelcamResult<Estimate> {
        let scan = self.scan(left, right)?;
        self.select(&scan, left.len(), center_x_delta)
    }

    /// Pick the winner of an existing scan and convert it to an angle.
    pub(crate) fn select(
        &self,
        scan: &ShiftScan,
        height: usize,
        center_x_delta: u32,
    ) -> LevelcamResult<Estimate> {
        check_center_x_delta(center_x_delta)?;
        let best = scan.best().ok_or_else(|| {
            LevelcamError::precondition(format!(
                "no shift in [{}, {}) overlaps a {height}-row profile",
                self.search_range.start(),
                self.search_range.end()
            ))
        })?;

        Ok(Estimate {
            shift: best.shift,
            score: best.score,
            angle_degrees: shift_to_angle(best.shift, center_x_delta)?,
        })
    }
}

/// Rows `j` of the left profile that have a partner `j - shift` on the right.
///
/// `None` when the shift is at least as large as the profile.
pub fn overlap_rows(height: usize, shift: i32) -> Option<Range<usize>> {
    let height = height as i64;
    let shift = i64::from(shift);
    let j_min = shift.max(0);
    let j_max = height.min(height + shift);
    if j_min >= j_max {
        return None;
    }
    Some(j_min as usize..j_max as usize)
}

/// Mean row distance between `left[j]` and `right[j - shift]` over the overlap.
pub fn shift_score(left: &RowProfile, right: &RowProfile, shift: i32) -> Option<f64> {
    let rows = overlap_rows(left.len().min(right.len()), shift)?;
    let count = rows.len() as f64;
    let total: f64 = rows
        .map(|j| {
            let k = (j as i64 - i64::from(shift)) as usize;
            left.row_distance(j, right, k)
        })
        .sum();
    Some(total / count)
}

/// Convert a row shift into the corrective rotation in degrees.
///
/// The shift is negated before the arctangent; zero shift is exactly zero.
pub fn shift_to_angle(shift: i32, center_x_delta: u32) -> LevelcamResult<f64> {
    check_center_x_delta(center_x_delta)?;
    if shift == 0 {
        return Ok(0.0);
    }
    Ok((-f64::from(shift) / f64::from(center_x_delta))
        .atan()
        .to_degrees())
}

fn check_center_x_delta(center_x_delta: u32) -> LevelcamResult<()> {
    if center_x_delta == 0 {
        return Err(LevelcamError::precondition(
            "center x delta is zero; regions must be horizontally separated",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(values: &[f64]) -> RowProfile {
        RowProfile::from_gray(values)
    }

    #[test]
    fn test_overlap_for_positive_and_negative_shifts() {
        assert_eq!(overlap_rows(5, 2), Some(2..5));
        assert_eq!(overlap_rows(5, -2), Some(0..3));
        assert_eq!(overlap_rows(5, 0), Some(0..5));
    }

    #[test]
    fn test_overlap_is_none_when_shift_covers_profile() {
        assert_eq!(overlap_rows(5, 5), None);
        assert_eq!(overlap_rows(5, -5), None);
        assert_eq!(overlap_rows(5, -12), None);
        assert_eq!(overlap_rows(5, 4), Some(4..5));
    }

    #[test]
    fn test_identical_profiles_pick_zero_shift() {
        let left = gray(&[10.0, 20.0, 30.0, 40.0]);
        let estimate = ShiftEstimator::default()
            .estimate(&left, &left.clone(), 540)
            .unwrap();
        assert_eq!(estimate.shift, 0);
        assert_eq!(estimate.angle_degrees, 0.0);
        assert_eq!(estimate.score, 0.0);
    }

    #[test]
    fn test_right_shifted_up_one_row_gives_shift_one() {
        // right[j] = left[j + 1]
        let left = gray(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let right = gray(&[20.0, 30.0, 40.0, 50.0, 60.0]);
        let estimate = ShiftEstimator::default()
            .estimate(&left, &right, 540)
            .unwrap();

        assert_eq!(estimate.shift, 1);
        assert_eq!(estimate.score, 0.0);
        let expected = (-1.0f64 / 540.0).atan().to_degrees();
        assert!((estimate.angle_degrees - expected).abs() < 1e-12);
        assert!(estimate.angle_degrees < 0.0);
    }

    #[test]
    fn test_score_is_mean_over_overlap_only() {
        let left = gray(&[0.0, 0.0, 3.0]);
        let right = gray(&[3.0, 0.0, 0.0]);
        // shift 2: left[2] vs right[0], one row, identical
        assert_eq!(shift_score(&left, &right, 2), Some(0.0));
        // shift 0: rows differ by 3 in each channel at j = 0 and j = 2
        let per_row = (3.0f64 * 9.0).sqrt();
        let score = shift_score(&left, &right, 0).unwrap();
        assert!((score - 2.0 * per_row / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_go_to_first_shift_in_ascending_order() {
        let scan = ShiftScan {
            candidates: vec![
                ShiftCandidate { shift: -2, score: 1.0 },
                ShiftCandidate { shift: -1, score: 0.5 },
                ShiftCandidate { shift: 0, score: 0.5 },
                ShiftCandidate { shift: 1, score: 0.7 },
            ],
        };
        assert_eq!(scan.best().map(|c| c.shift), Some(-1));
    }

    #[test]
    fn test_constant_profiles_tie_everywhere_and_pick_range_start() {
        let flat = gray(&[7.0; 30]);
        let estimate = ShiftEstimator::default().estimate(&flat, &flat, 100).unwrap();
        assert_eq!(estimate.shift, -10);
    }

    #[test]
    fn test_degenerate_shifts_are_skipped_not_fatal() {
        let left = gray(&[1.0, 2.0, 3.0]);
        let scan = ShiftEstimator::default().scan(&left, &left).unwrap();
        let shifts: Vec<i32> = scan.candidates.iter().map(|c| c.shift).collect();
        assert_eq!(shifts, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_range_without_overlap_is_an_error() {
        let left = gray(&[1.0, 2.0, 3.0]);
        let estimator = ShiftEstimator::new(SearchRange::new(5, 8).unwrap());
        let err = estimator.estimate(&left, &left, 10).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        let err = ShiftEstimator::default()
            .scan(&gray(&[1.0, 2.0]), &gray(&[1.0]))
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(ShiftEstimator::default()
            .scan(&gray(&[]), &gray(&[]))
            .is_err());
    }

    #[test]
    fn test_zero_center_delta_fails_fast() {
        let left = gray(&[1.0, 2.0]);
        assert!(ShiftEstimator::default().estimate(&left, &left, 0).is_err());
        assert!(shift_to_angle(0, 0).is_err());
    }

    #[test]
    fn test_angle_sign_follows_negated_shift() {
        assert!(shift_to_angle(3, 540).unwrap() < 0.0);
        assert!(shift_to_angle(-3, 540).unwrap() > 0.0);
        assert!((shift_to_angle(100, 100).unwrap() + 45.0).abs() < 1e-12);
    }
}
