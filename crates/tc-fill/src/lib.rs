//! Single-pass gap filling on tile activation planes.
//!
//! An inactive tile becomes active when, along any of the 8 directions, both
//! the tile before it and the tile after it are active in the *input* plane
//! (an exact `1-0-1` pattern). Filled tiles never feed back into the same
//! pass, so `1-0-0-1` stays open and the result does not depend on scan order.

use log::debug;
use tc_core::{ActivationMap, CellGrid, Direction, TilePos};

/// Returns a new grid of the same shape with single-tile gaps closed.
///
/// Only the activation plane of `src` is read; the output carries fresh
/// tracing state.
pub fn fill_gaps(src: &CellGrid) -> CellGrid {
    let filled = fill_gaps_map(&src.activation_map());
    CellGrid::from_activation(&filled)
}

pub fn fill_gaps_map(src: &ActivationMap) -> ActivationMap {
    let (height, width) = src.shape();
    let mut out = src.clone();
    if height == 0 || width == 0 {
        return out;
    }

    let mut closed = 0usize;
    for row in 0..height {
        for col in 0..width {
            let pos = TilePos::new(row, col);
            if src.is_active(pos) {
                continue;
            }

            if bridges_gap(src, pos) {
                out.set(pos, true)
                    .expect("in-bounds write in fill_gaps_map");
                closed += 1;
            }
        }
    }

    debug!("gap filler closed {closed} tiles on a {height}x{width} grid");
    out
}

fn bridges_gap(src: &ActivationMap, pos: TilePos) -> bool {
    let (height, width) = src.shape();
    for dir in Direction::ALL {
        let Some(before) = pos.offset(dir.opposite(), height, width) else {
            continue;
        };
        let Some(after) = pos.offset(dir, height, width) else {
            continue;
        };

        if src.is_active(before) && src.is_active(after) {
            return true;
        }
    }

    false
}
