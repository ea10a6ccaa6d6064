//! Frame compositor: corrective rotation and the profile comparison view.

use std::borrow::Cow;

use image::Rgb;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use levelcam_common::error::{LevelcamError, LevelcamResult};
use levelcam_frame_model::{Estimate, Frame, FrameGeometry, Region, RowProfile, ViewMode};
use levelcam_processing_core::reduce_to_column;

/// Color of pixels rotated in from outside the frame.
pub const FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Rotate a frame about its center with bilinear sampling.
///
/// Positive angles turn the content counter-clockwise on screen, the
/// convention the tilt estimate uses. The output keeps the input size.
pub fn rotate_frame(frame: &Frame, angle_degrees: f64) -> Frame {
    if angle_degrees == 0.0 {
        return frame.clone();
    }
    // imageproc rotates clockwise for positive theta.
    let theta = -angle_degrees.to_radians() as f32;
    rotate_about_center(frame, theta, Interpolation::Bilinear, FILL)
}

/// Paint a row profile as a `width` pixel wide band, one color per row.
pub fn profile_strip(profile: &RowProfile, width: u32) -> Frame {
    let colors = profile.to_rgb8();
    Frame::from_fn(width, colors.len() as u32, |_, y| Rgb(colors[y as usize]))
}

/// Row profiles of `original` and `corrected`, each stretched to
/// `panel_width`, placed side by side.
pub fn comparison_view(
    original: &Frame,
    corrected: &Frame,
    panel_width: u32,
) -> LevelcamResult<Frame> {
    if original.dimensions() != corrected.dimensions() {
        return Err(LevelcamError::render(format!(
            "comparison needs equal frame sizes, got {:?} and {:?}",
            original.dimensions(),
            corrected.dimensions()
        )));
    }
    if panel_width == 0 {
        return Err(LevelcamError::render("comparison panel width is zero"));
    }

    let before = profile_strip(&reduce_to_column(&Region::full(original))?, panel_width);
    let after = profile_strip(&reduce_to_column(&Region::full(corrected))?, panel_width);

    Ok(Frame::from_fn(panel_width * 2, original.height(), |x, y| {
        if x < panel_width {
            *before.get_pixel(x, y)
        } else {
            *after.get_pixel(x - panel_width, y)
        }
    }))
}

/// Build the image to display for one frame.
///
/// Without an estimate, or with a level one, the frame passes through
/// unrotated. Comparison panels are as wide as one sampling region.
pub fn compose_view<'a>(
    frame: &'a Frame,
    estimate: Option<&Estimate>,
    geometry: &FrameGeometry,
    mode: ViewMode,
) -> LevelcamResult<Cow<'a, Frame>> {
    let corrected = match estimate {
        Some(estimate) if !estimate.is_level() => {
            tracing::trace!(angle = estimate.angle_degrees, "rotating frame");
            Cow::Owned(rotate_frame(frame, estimate.angle_degrees))
        }
        _ => Cow::Borrowed(frame),
    };

    match mode {
        ViewMode::Corrected => Ok(corrected),
        ViewMode::Comparison => Ok(Cow::Owned(comparison_view(
            frame,
            &corrected,
            geometry.center_x_delta(),
        )?)),
    }
}
