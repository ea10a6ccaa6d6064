//! LevelCam Frame Model
//!
//! Defines the data contracts shared by the leveling pipeline:
//! - **Frame / Region:** an RGB frame and the left/right column spans sampled from it
//! - **RowProfile:** one averaged color vector per frame row
//! - **Estimate:** shift candidates, search range, and the derived tilt angle
//!
//! Nothing here outlives one frame's processing cycle.

pub mod estimate;
pub mod frame;
pub mod profile;

pub use estimate::*;
pub use frame::*;
pub use profile::*;

/// Errors raised when constructing model values that violate their invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("frame has no rows")]
    EmptyFrame,

    #[error(
        "margin {margin_width}px leaves no sampling columns in a {width}px wide frame \
         (requires margin < center x = {center_x})"
    )]
    MarginTooWide {
        margin_width: u32,
        width: u32,
        center_x: u32,
    },

    #[error("columns [{start}, {end}) are outside a {width}px wide frame")]
    ColumnsOutOfBounds { start: u32, end: u32, width: u32 },

    #[error("frame is {actual_width}x{actual_height}, session geometry is {expected_width}x{expected_height}")]
    GeometryMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("search range [{start}, {end}) contains no shifts")]
    InvalidSearchRange { start: i32, end: i32 },
}
