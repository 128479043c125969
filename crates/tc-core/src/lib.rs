//! Foundational primitives for tile-grid boundary tracing.
//!
//! ## Coordinates
//! Tiles are addressed as `(row, col)`, 0-indexed, row increasing downward.
//! Planes are stored row-major with no padding.
//!
//! ## Directions and Turns
//! [`Direction`] is one of eight absolute compass codes (clockwise from north).
//! [`Turn`] is the relative change between two consecutive headings; its
//! codes are not ordered by angle, use [`Turn::angle_deg`] to rank them.
//!
//! ## Grid State
//! [`CellGrid`] owns per-tile activation plus the bookkeeping a single trace
//! writes (visited flag, owning chain, index in that chain). A grid is traced
//! at most once.

mod activation;
mod direction;
mod error;
mod grid;
mod tile;

pub use activation::ActivationMap;
pub use direction::{Direction, Step, Turn};
pub use error::{Error, Result};
pub use grid::{Cell, CellGrid, ChainId};
pub use tile::TilePos;
