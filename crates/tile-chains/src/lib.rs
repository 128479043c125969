//! Umbrella crate for the `tile-chains` workspace.
//!
//! Re-exports the grid model, the gap filler and the tracer, and adds
//! [`extract_chains`], which runs the three stages in order on one
//! activation plane.

mod pipeline;

pub use pipeline::{ChainExtraction, ExtractConfig, extract_chains};
pub use tc_core::*;
pub use tc_fill::{fill_gaps, fill_gaps_map};
pub use tc_trace::*;
