//! Known rotations applied to a level scene must be estimated back.

use image::Rgb;
use levelcam_frame_model::{Frame, SearchRange};
use levelcam_processing_core::estimate_tilt;
use levelcam_render_engine::rotate_frame;
use proptest::prelude::*;

const WIDTH: u32 = 400;
const HEIGHT: u32 = 300;
const MARGIN: u32 = 50;

/// A level scene: smooth horizontal bands, different per channel.
fn level_scene() -> Frame {
    Frame::from_fn(WIDTH, HEIGHT, |_, y| {
        let t = y as f64;
        let r = 127.0 + 100.0 * (t * std::f64::consts::TAU / 50.0).sin();
        let g = 127.0 + 80.0 * (t * std::f64::consts::TAU / 73.0).cos();
        let b = (t * 0.8).min(255.0);
        Rgb([r as u8, g as u8, b as u8])
    })
}

#[test]
fn test_level_scene_needs_no_correction() {
    let estimate = estimate_tilt(&level_scene(), MARGIN, SearchRange::default()).unwrap();
    assert_eq!(estimate.shift, 0);
    assert_eq!(estimate.angle_degrees, 0.0);
}

#[test]
fn test_counter_clockwise_tilt_is_corrected_clockwise() {
    let tilted = rotate_frame(&level_scene(), 2.0);
    let estimate = estimate_tilt(&tilted, MARGIN, SearchRange::default()).unwrap();

    // 150px apart, tan(2 deg) * 150 = 5.2 rows
    assert!((4..=6).contains(&estimate.shift), "shift {}", estimate.shift);
    assert!(estimate.angle_degrees < 0.0);
    assert!((estimate.angle_degrees + 2.0).abs() < 0.5);
}

#[test]
fn test_clockwise_tilt_is_corrected_counter_clockwise() {
    let tilted = rotate_frame(&level_scene(), -2.0);
    let estimate = estimate_tilt(&tilted, MARGIN, SearchRange::default()).unwrap();

    assert!((-6..=-4).contains(&estimate.shift), "shift {}", estimate.shift);
    assert!((estimate.angle_degrees - 2.0).abs() < 0.5);
}

#[test]
fn test_applying_the_correction_levels_the_scene() {
    let tilted = rotate_frame(&level_scene(), 2.0);
    let estimate = estimate_tilt(&tilted, MARGIN, SearchRange::default()).unwrap();
    let corrected = rotate_frame(&tilted, estimate.angle_degrees);

    let residual = estimate_tilt(&corrected, MARGIN, SearchRange::default()).unwrap();
    assert!(residual.shift.abs() <= 1, "residual shift {}", residual.shift);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn test_estimate_opposes_applied_rotation(
        magnitude in 1.0f64..3.0,
        clockwise in any::<bool>(),
    ) {
        let applied = if clockwise { -magnitude } else { magnitude };
        let tilted = rotate_frame(&level_scene(), applied);
        let estimate = estimate_tilt(&tilted, MARGIN, SearchRange::default()).unwrap();

        // At least tan(1 deg) * 150 = 2.6 rows apart.
        prop_assert_ne!(estimate.shift, 0);
        prop_assert_eq!(estimate.shift.signum() as f64, applied.signum());
        prop_assert!(estimate.angle_degrees * applied < 0.0);
    }
}
