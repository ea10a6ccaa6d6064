//! Profile reduction: one mean color per region row.

use levelcam_common::error::{LevelcamError, LevelcamResult};
use levelcam_frame_model::{Region, RowProfile};

/// Collapse a region into its per-row mean colors.
///
/// Channel sums are accumulated in `u64`, so no region size can overflow
/// them; means are kept as `f64`. An empty region is a precondition
/// violation.
pub fn reduce_to_column(region: &Region<'_>) -> LevelcamResult<RowProfile> {
    if region.is_empty() {
        return Err(LevelcamError::precondition(format!(
            "cannot reduce an empty region ({} rows, columns {:?})",
            region.height(),
            region.columns()
        )));
    }

    let width = region.width() as f64;
    let profile = (0..region.height())
        .map(|y| {
            let mut sums = [0u64; 3];
            for pixel in region.row(y) {
                for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                    *sum += u64::from(channel);
                }
            }
            sums.map(|sum| sum as f64 / width)
        })
        .collect();

    Ok(profile)
}
