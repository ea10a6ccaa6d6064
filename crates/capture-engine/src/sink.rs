//! Display sinks.
//!
//! A sink shows one image per frame and is polled for a quit request
//! after every frame. Polling is the only cancellation point of a session.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use levelcam_common::error::{LevelcamError, LevelcamResult};
use levelcam_frame_model::Frame;

/// Longest single sleep while waiting for a stop request.
const POLL_SLICE: Duration = Duration::from_millis(10);

/// Receiver of displayable images.
pub trait DisplaySink {
    /// Show an image. Returns once the image is handed off.
    fn show(&mut self, image: &Frame) -> LevelcamResult<()>;

    /// Wait up to `timeout` for a quit request; true means stop.
    fn poll_quit(&mut self, timeout: Duration) -> bool;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, image: &Frame) -> LevelcamResult<()> {
        (**self).show(image)
    }

    fn poll_quit(&mut self, timeout: Duration) -> bool {
        (**self).poll_quit(timeout)
    }
}

/// Writes every shown image as a numbered PNG into a directory.
///
/// Quit is signalled through a shared stop flag, typically set by a
/// Ctrl+C handler.
#[derive(Debug)]
pub struct ImageDirSink {
    dir: PathBuf,
    shown: u64,
    stop_flag: Arc<AtomicBool>,
}

impl ImageDirSink {
    /// Create the output directory if needed.
    pub fn create(dir: &Path, stop_flag: Arc<AtomicBool>) -> LevelcamResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            shown: 0,
            stop_flag,
        })
    }

    /// Number of images written so far.
    pub fn shown(&self) -> u64 {
        self.shown
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl DisplaySink for ImageDirSink {
    fn show(&mut self, image: &Frame) -> LevelcamResult<()> {
        let path = self.frame_path(self.shown);
        image.save(&path).map_err(|e| {
            LevelcamError::sink(format!("Failed to write {}: {e}", path.display()))
        })?;
        self.shown += 1;
        Ok(())
    }

    fn poll_quit(&mut self, timeout: Duration) -> bool {
        // An interval too large to represent waits for the stop flag alone.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.stop_flag.load(Ordering::SeqCst) {
                return true;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    POLL_SLICE.min(deadline - now)
                }
                None => POLL_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}

/// Keeps shown images in memory; optionally quits after a number of frames.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub shown: Vec<Frame>,
    quit_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request quit once `frames` images have been shown.
    pub fn quitting_after(frames: usize) -> Self {
        Self {
            shown: Vec::new(),
            quit_after: Some(frames),
        }
    }
}

impl DisplaySink for MemorySink {
    fn show(&mut self, image: &Frame) -> LevelcamResult<()> {
        self.shown.push(image.clone());
        Ok(())
    }

    fn poll_quit(&mut self, _timeout: Duration) -> bool {
        self.quit_after
            .is_some_and(|frames| self.shown.len() >= frames)
    }
}
