//! Row profiles: one averaged color vector per frame row.

use serde::{Deserialize, Serialize};

/// Per-channel mean color of one row, kept in floating point.
pub type ColorVector = [f64; 3];

/// Ordered per-row average colors of a region, top row first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowProfile {
    rows: Vec<ColorVector>,
}

impl RowProfile {
    pub fn new(rows: Vec<ColorVector>) -> Self {
        Self { rows }
    }

    /// Profile of a gray region: every channel carries the same value.
    pub fn from_gray(values: &[f64]) -> Self {
        Self::new(values.iter().map(|&v| [v, v, v]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ColorVector] {
        &self.rows
    }

    pub fn row(&self, j: usize) -> Option<&ColorVector> {
        self.rows.get(j)
    }

    /// Euclidean distance between this profile's row `j` and `other`'s row `k`.
    ///
    /// Panics if either index is out of range.
    pub fn row_distance(&self, j: usize, other: &RowProfile, k: usize) -> f64 {
        let a = &self.rows[j];
        let b = &other.rows[k];
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }

    /// The row colors rounded and clamped to 8-bit channels.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.rows
            .iter()
            .map(|c| c.map(|v| v.round().clamp(0.0, 255.0) as u8))
            .collect()
    }
}

impl FromIterator<ColorVector> for RowProfile {
    fn from_iter<I: IntoIterator<Item = ColorVector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_distance_is_euclidean_over_channels() {
        let a = RowProfile::new(vec![[0.0, 0.0, 0.0]]);
        let b = RowProfile::new(vec![[3.0, 4.0, 0.0]]);
        assert!((a.row_distance(0, &b, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_gray_profile_fills_all_channels() {
        let profile = RowProfile::from_gray(&[10.0, 20.0]);
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.row(1), Some(&[20.0, 20.0, 20.0]));
        assert_eq!(profile.row(2), None);
    }

    #[test]
    fn test_to_rgb8_rounds_and_clamps() {
        let profile = RowProfile::new(vec![[12.5, -3.0, 300.0]]);
        assert_eq!(profile.to_rgb8(), vec![[13, 0, 255]]);
    }
}
