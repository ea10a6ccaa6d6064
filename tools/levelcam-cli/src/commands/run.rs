//! Level every frame of an image sequence.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use levelcam_capture_engine::{
    ImageDirSink, ImageSequenceSource, LevelingSession, SessionConfig, SessionStats,
};
use levelcam_common::config::AppConfig;

pub async fn run(
    config: AppConfig,
    input: PathBuf,
    output: PathBuf,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Leveling frames from: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Margin: {}px", config.tilt.margin_width);
    println!(
        "  Search: [{}, {})",
        config.tilt.search_range.start(),
        config.tilt.search_range.end()
    );
    println!("  View: {:?}", config.display.view);
    println!();
    println!("Press Ctrl+C to stop...");
    println!();

    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let stop_flag = stop_flag.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_flag.store(true, Ordering::SeqCst);
            }
        });
    }

    let session_config = SessionConfig::from(&config);
    let report_path = report.clone();
    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<SessionStats> {
        let mut source = ImageSequenceSource::open(&input)?;
        let mut sink = ImageDirSink::create(&output, stop_flag)?;
        let mut writer = report_path
            .as_ref()
            .map(|path| File::create(path).map(BufWriter::new))
            .transpose()?;

        let mut session = LevelingSession::new(session_config);
        let stats = session.run_with(&mut source, &mut sink, |record| {
            if let Some(writer) = writer.as_mut() {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
            Ok(())
        })?;

        if let Some(mut writer) = writer {
            writer.flush()?;
        }
        Ok(stats)
    })
    .await??;

    println!("Frames processed: {}", stats.frames_processed);
    println!("  Corrected: {}", stats.frames_corrected);
    println!("  Shown unrotated after errors: {}", stats.frames_fallback);
    println!(
        "  Mean |angle|: {:.2} deg",
        stats.mean_abs_angle_degrees
    );
    if let Some(report) = report {
        println!("  Report: {}", report.display());
    }

    Ok(())
}
