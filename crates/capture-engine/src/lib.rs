//! LevelCam Capture Engine
//!
//! Runs the per-frame leveling loop between an injected frame source and
//! display sink. The loop is synchronous: each frame is fully estimated,
//! rotated, and shown before the next one is requested.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   LevelingSession                    │
//! │  ┌─────────────┐   ┌───────────────┐   ┌───────────┐ │
//! │  │ FrameSource │──▶│ TiltEstimator │──▶│ Compositor│ │
//! │  └─────────────┘   └───────────────┘   └─────┬─────┘ │
//! │                                              ▼       │
//! │                                      ┌─────────────┐ │
//! │                    quit? ◀───────────│ DisplaySink │ │
//! │                                      └─────────────┘ │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod session;
pub mod sink;
pub mod source;

pub use session::*;
pub use sink::{DisplaySink, ImageDirSink, MemorySink};
pub use source::{
    load_frame, AngleSweep, FrameSource, ImageSequenceSource, IterSource, StillImageSource,
    SweepSource,
};
