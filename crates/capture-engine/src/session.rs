//! Leveling session: the per-frame acquire, estimate, rotate, show loop.

use std::time::Duration;

use levelcam_common::clock::SessionClock;
use levelcam_common::config::{AppConfig, DisplayConfig, TiltConfig};
use levelcam_common::error::LevelcamResult;
use levelcam_frame_model::{Estimate, Frame};
use levelcam_processing_core::{TiltEstimator, TiltReport};
use levelcam_render_engine::compose_view;
use serde::{Deserialize, Serialize};

use crate::sink::DisplaySink;
use crate::source::FrameSource;

/// Configuration for a leveling session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionConfig {
    /// Estimator parameters.
    pub tilt: TiltConfig,

    /// Display parameters.
    pub display: DisplayConfig,
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            tilt: config.tilt,
            display: config.display,
        }
    }
}

/// Outcome of one frame, suitable for a JSON lines report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Zero-based frame number.
    pub index: u64,

    /// Seconds since the session started.
    pub timestamp_secs: f64,

    /// The estimate, absent when estimation failed.
    pub estimate: Option<Estimate>,

    /// Why estimation failed, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals of a finished session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Frames shown.
    pub frames_processed: u64,

    /// Frames shown rotated.
    pub frames_corrected: u64,

    /// Frames shown unrotated because estimation failed.
    pub frames_fallback: u64,

    /// Mean absolute angle over frames that produced an estimate.
    pub mean_abs_angle_degrees: f64,
}

impl SessionStats {
    fn record(&mut self, estimate: Option<&Estimate>) {
        self.frames_processed += 1;
        let Some(estimate) = estimate else {
            self.frames_fallback += 1;
            return;
        };
        if !estimate.is_level() {
            self.frames_corrected += 1;
        }
        let estimated = (self.frames_processed - self.frames_fallback) as f64;
        self.mean_abs_angle_degrees +=
            (estimate.angle_degrees.abs() - self.mean_abs_angle_degrees) / estimated;
    }
}

/// Drives frames from a source through estimation to a sink.
///
/// No estimate is carried from one frame to the next. The estimator is
/// built from the first frame's geometry; a margin that does not fit that
/// geometry ends the session with a precondition error before anything
/// is shown.
pub struct LevelingSession {
    config: SessionConfig,
    clock: Option<SessionClock>,
    estimator: Option<TiltEstimator>,
    stats: SessionStats,
}

impl LevelingSession {
    /// Create a new session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            clock: None,
            estimator: None,
            stats: SessionStats::default(),
        }
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Run until the source is exhausted or the sink asks to quit.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn DisplaySink,
    ) -> LevelcamResult<SessionStats> {
        self.run_with(source, sink, |_| Ok(()))
    }

    /// Like [`run`](Self::run), calling `on_frame` after each frame is shown.
    pub fn run_with<F>(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn DisplaySink,
        mut on_frame: F,
    ) -> LevelcamResult<SessionStats>
    where
        F: FnMut(&FrameRecord) -> LevelcamResult<()>,
    {
        let clock = self.clock.get_or_insert_with(SessionClock::start).clone();
        tracing::info!(
            source = %source.describe(),
            started_at = clock.epoch_wall(),
            "Leveling session started"
        );
        let poll_interval = Duration::from_millis(self.config.display.poll_interval_ms);

        loop {
            let Some(frame) = source.next_frame()? else {
                tracing::info!("Frame source exhausted");
                break;
            };

            let record = self.process_frame(&frame, sink, clock.elapsed_secs())?;
            on_frame(&record)?;

            if sink.poll_quit(poll_interval) {
                tracing::info!("Quit requested");
                break;
            }
        }

        tracing::info!(
            frames = self.stats.frames_processed,
            corrected = self.stats.frames_corrected,
            fallback = self.stats.frames_fallback,
            fps = clock.throughput_fps(self.stats.frames_processed),
            "Leveling session finished"
        );
        Ok(self.stats.clone())
    }

    fn estimator_for(&mut self, frame: &Frame) -> LevelcamResult<TiltEstimator> {
        if let Some(estimator) = self.estimator {
            return Ok(estimator);
        }
        let estimator = TiltEstimator::for_frame(frame, &self.config.tilt)?;
        let geometry = estimator.geometry();
        tracing::info!(
            width = geometry.width(),
            height = geometry.height(),
            margin = geometry.margin_width(),
            center_x_delta = geometry.center_x_delta(),
            "Frame geometry fixed for session"
        );
        self.estimator = Some(estimator);
        Ok(estimator)
    }

    fn process_frame(
        &mut self,
        frame: &Frame,
        sink: &mut dyn DisplaySink,
        timestamp_secs: f64,
    ) -> LevelcamResult<FrameRecord> {
        let index = self.stats.frames_processed;
        let estimator = self.estimator_for(frame)?;

        let (estimate, error) = match estimator.estimate_detailed(frame) {
            Ok(report) => {
                log_report(index, &report);
                (Some(report.estimate), None)
            }
            Err(e) => {
                tracing::warn!(
                    frame = index,
                    "Tilt estimation failed, showing frame unrotated: {e}"
                );
                (None, Some(e.to_string()))
            }
        };

        let view = compose_view(
            frame,
            estimate.as_ref(),
            estimator.geometry(),
            self.config.display.view,
        )?;
        sink.show(&view)?;
        self.stats.record(estimate.as_ref());

        Ok(FrameRecord {
            index,
            timestamp_secs,
            estimate,
            error,
        })
    }
}

fn log_report(index: u64, report: &TiltReport) {
    for row in report.candidate_table() {
        tracing::debug!(
            frame = index,
            shift = row.shift,
            angle = row.angle_degrees,
            score = row.score,
            "candidate"
        );
    }
    if !report.estimate.is_level() {
        tracing::info!(frame = index, "Angle: {:.1}", report.estimate.angle_degrees);
    }
}
