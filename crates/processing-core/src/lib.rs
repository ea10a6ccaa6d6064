//! LevelCam Processing Core — Tilt Estimation
//!
//! Estimates how far a frame is rotated from level by comparing the
//! row-averaged colors of its left and right halves:
//! - **Reduce:** collapse each half into a [`RowProfile`] (one mean color per row)
//! - **Shift search:** find the vertical offset that best aligns the two profiles
//! - **Angle:** convert that offset into degrees using the distance between the halves
//!
//! This crate is pure computation: no I/O, no logging, no state between frames.
//! All inputs are data; all outputs are data.
//!
//! [`RowProfile`]: levelcam_frame_model::RowProfile

pub mod reduce;
pub mod shift;
pub mod tilt;

pub use reduce::reduce_to_column;
pub use shift::{shift_to_angle, ShiftEstimator, ShiftScan};
pub use tilt::{estimate_tilt, estimate_tilt_detailed, TiltEstimator, TiltReport};
