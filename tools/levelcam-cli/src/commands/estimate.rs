//! Estimate the tilt of a single image.

use std::path::PathBuf;

use levelcam_capture_engine::load_frame;
use levelcam_common::config::AppConfig;
use levelcam_frame_model::FrameGeometry;
use levelcam_processing_core::estimate_tilt_detailed;
use levelcam_render_engine::compose_view;

pub fn run(
    config: &AppConfig,
    image: PathBuf,
    json: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let frame = load_frame(&image)?;
    let report =
        estimate_tilt_detailed(&frame, config.tilt.margin_width, config.tilt.search_range)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Estimating tilt of: {}", image.display());
        println!(
            "  Size: {}x{}, center distance: {}px",
            frame.width(),
            frame.height(),
            report.center_x_delta
        );
        println!();
        println!("  {:>6}  {:>7}  {:>10}", "shift", "angle", "score");
        for row in report.candidate_table() {
            let marker = if row.shift == report.estimate.shift {
                "  <"
            } else {
                ""
            };
            println!(
                "  {:>6}  {:>7.1}  {:>10.3}{marker}",
                row.shift, row.angle_degrees, row.score
            );
        }
        println!();
        println!(
            "Shift: {}  Angle: {:.1} deg",
            report.estimate.shift,
            report.estimate.rounded_angle()
        );
    }

    if let Some(output) = output {
        let geometry = FrameGeometry::of(&frame, config.tilt.margin_width)?;
        let view = compose_view(
            &frame,
            Some(&report.estimate),
            &geometry,
            config.display.view,
        )?;
        view.save(&output)?;
        tracing::info!(path = %output.display(), "Wrote corrected view");
    }

    Ok(())
}
