use thiserror::Error;

use crate::TilePos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `from` and `to` are not one of the eight unit offsets apart.
    #[error("tiles {from} and {to} are not 8-connected neighbors")]
    NotAdjacent { from: TilePos, to: TilePos },

    /// Shapes are `(height, width)`.
    #[error(
        "shape mismatch: expected {}x{}, got {}x{}",
        .expected.0,
        .expected.1,
        .actual.0,
        .actual.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A buffer of `actual` values was given for a plane of `expected` tiles.
    #[error("size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("tile {pos} is outside the {height}x{width} grid")]
    OutOfBounds {
        pos: TilePos,
        height: usize,
        width: usize,
    },

    #[error("activation at {pos} must be 0 or 1, got {value}")]
    InvalidActivation { value: u8, pos: TilePos },

    #[error("chain {chain_id} is malformed: {tiles} tiles for {steps} steps")]
    MalformedChain {
        chain_id: usize,
        tiles: usize,
        steps: usize,
    },

    #[error("tile {pos} is already owned by a chain")]
    AlreadyClaimed { pos: TilePos },

    #[error("grid already carries tracing state; trace a fresh grid")]
    GridAlreadyTraced,
}

pub type Result<T> = std::result::Result<T, Error>;
