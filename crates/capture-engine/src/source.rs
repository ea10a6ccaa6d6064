//! Frame sources.
//!
//! A source hands out frames one at a time until it reports end of
//! stream. Every frame of a session must have the same size.

use std::path::{Path, PathBuf};

use levelcam_common::error::{LevelcamError, LevelcamResult};
use levelcam_frame_model::Frame;
use levelcam_render_engine::rotate_frame;

/// File extensions read by [`ImageSequenceSource`].
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Supplier of raw frames.
pub trait FrameSource {
    /// The next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Load one image file as an RGB frame.
pub fn load_frame(path: &Path) -> LevelcamResult<Frame> {
    if !path.exists() {
        return Err(LevelcamError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(image::open(path)?.to_rgb8())
}

/// Frames read from the image files of a directory, in file name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    dir: PathBuf,
    paths: Vec<PathBuf>,
    cursor: usize,
    dimensions: Option<(u32, u32)>,
}

impl ImageSequenceSource {
    /// List the image files in `dir`. Subdirectories are ignored.
    pub fn open(dir: &Path) -> LevelcamResult<Self> {
        if !dir.is_dir() {
            return Err(LevelcamError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            tracing::warn!(dir = %dir.display(), "No image files found");
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            paths,
            cursor: 0,
            dimensions: None,
        })
    }

    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>> {
        let Some(path) = self.paths.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        let frame = load_frame(path)?;
        match self.dimensions {
            None => self.dimensions = Some(frame.dimensions()),
            Some(expected) if expected != frame.dimensions() => {
                return Err(LevelcamError::source(format!(
                    "{} is {:?}, earlier frames were {:?}; restart with a consistent sequence",
                    path.display(),
                    frame.dimensions(),
                    expected
                )));
            }
            Some(_) => {}
        }
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("{} ({} frames)", self.dir.display(), self.paths.len())
    }
}

/// The same frame repeated a fixed number of times.
#[derive(Debug, Clone)]
pub struct StillImageSource {
    frame: Frame,
    remaining: usize,
}

impl StillImageSource {
    pub fn new(frame: Frame, count: usize) -> Self {
        Self {
            frame,
            remaining: count,
        }
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.frame.clone()))
    }

    fn describe(&self) -> String {
        let (w, h) = self.frame.dimensions();
        format!("still image {w}x{h}")
    }
}

/// Frames taken from any iterator.
#[derive(Debug)]
pub struct IterSource<I> {
    frames: I,
}

impl<I: Iterator<Item = Frame>> IterSource<I> {
    pub fn new(frames: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Frame>> FrameSource for IterSource<I> {
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>> {
        Ok(self.frames.next())
    }

    fn describe(&self) -> String {
        "in-memory frames".to_string()
    }
}

/// Endless sequence of test angles in degrees.
///
/// Each step adds `step`; once the angle passes `limit` it wraps to `-limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSweep {
    current: f64,
    step: f64,
    limit: f64,
}

impl AngleSweep {
    pub fn new(start: f64, step: f64, limit: f64) -> Self {
        Self {
            current: start,
            step,
            limit: limit.abs(),
        }
    }
}

impl Default for AngleSweep {
    fn default() -> Self {
        Self::new(5.0, 0.1, 7.0)
    }
}

impl Iterator for AngleSweep {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        // Rounded so long sweeps do not accumulate float drift.
        let next = ((self.current + self.step) * 1e6).round() / 1e6;
        self.current = if next > self.limit { -self.limit } else { next };
        Some(self.current)
    }
}

/// A still image rotated by successive [`AngleSweep`] angles.
#[derive(Debug, Clone)]
pub struct SweepSource {
    base: Frame,
    sweep: AngleSweep,
    remaining: usize,
    last_angle: Option<f64>,
}

impl SweepSource {
    pub fn new(base: Frame, sweep: AngleSweep, count: usize) -> Self {
        Self {
            base,
            sweep,
            remaining: count,
            last_angle: None,
        }
    }

    /// The next applied angle and the rotated frame.
    pub fn next_sample(&mut self) -> Option<(f64, Frame)> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let angle = self.sweep.next()?;
        self.last_angle = Some(angle);
        Some((angle, rotate_frame(&self.base, angle)))
    }

    /// Angle applied to the most recent frame.
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }
}

impl FrameSource for SweepSource {
    fn next_frame(&mut self) -> LevelcamResult<Option<Frame>> {
        Ok(self.next_sample().map(|(_, frame)| frame))
    }

    fn describe(&self) -> String {
        let (w, h) = self.base.dimensions();
        format!("rotation sweep over {w}x{h} image")
    }
}
