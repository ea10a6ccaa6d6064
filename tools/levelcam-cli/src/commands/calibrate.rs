//! Rotate a level image by known angles and measure estimate error.
//!
//! The estimate is the corrective angle, so a perfect estimate cancels
//! the applied rotation: error = |estimate + applied|.

use std::path::PathBuf;

use levelcam_capture_engine::{load_frame, AngleSweep, SweepSource};
use levelcam_common::config::AppConfig;
use levelcam_processing_core::TiltEstimator;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationSample {
    pub applied_degrees: f64,
    pub estimated_degrees: f64,
    pub shift: i32,
    pub error_degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationSummary {
    pub samples: usize,
    pub mean_error_degrees: f64,
    pub max_error_degrees: f64,
}

impl CalibrationSummary {
    pub fn from_samples(samples: &[CalibrationSample]) -> Self {
        let max_error_degrees = samples
            .iter()
            .map(|s| s.error_degrees)
            .fold(0.0, f64::max);
        let mean_error_degrees = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.error_degrees).sum::<f64>() / samples.len() as f64
        };
        Self {
            samples: samples.len(),
            mean_error_degrees,
            max_error_degrees,
        }
    }
}

pub fn run(config: &AppConfig, image: PathBuf, frames: usize, json: bool) -> anyhow::Result<()> {
    let base = load_frame(&image)?;
    let estimator = TiltEstimator::for_frame(&base, &config.tilt)?;
    let mut source = SweepSource::new(base, AngleSweep::default(), frames);

    if !json {
        println!("Calibrating against: {}", image.display());
        println!("  {:>8}  {:>8}  {:>6}  {:>6}", "applied", "estimate", "shift", "error");
    }

    let mut samples = Vec::with_capacity(frames);
    while let Some((applied, frame)) = source.next_sample() {
        let estimate = estimator.estimate(&frame)?;
        let sample = CalibrationSample {
            applied_degrees: applied,
            estimated_degrees: estimate.angle_degrees,
            shift: estimate.shift,
            error_degrees: (estimate.angle_degrees + applied).abs(),
        };
        if !json {
            println!(
                "  {:>8.1}  {:>8.1}  {:>6}  {:>6.2}",
                sample.applied_degrees, sample.estimated_degrees, sample.shift, sample.error_degrees
            );
        }
        samples.push(sample);
    }

    let summary = CalibrationSummary::from_samples(&samples);
    if json {
        let out = serde_json::json!({ "samples": samples, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "{} samples, mean error {:.2} deg, max error {:.2} deg",
            summary.samples, summary.mean_error_degrees, summary.max_error_degrees
        );
    }

    Ok(())
}
