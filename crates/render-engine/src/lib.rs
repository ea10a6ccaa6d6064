//! LevelCam Render Engine
//!
//! Turns a frame and its tilt estimate into the image handed to the
//! display sink.
//!
//! ```text
//! frame ──┬── estimate ── angle ≠ 0 ? ── rotate about center ──┐
//!         │                                                    ├── Corrected view
//!         └────────────────────────────── (unrotated) ─────────┘
//!                                                              │
//!         row profile(frame) ─┐                                │
//!                             ├── side by side ── Comparison view
//!         row profile(rotated)┘
//! ```

pub mod compositor;

pub use compositor::*;
