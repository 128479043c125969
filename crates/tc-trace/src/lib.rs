//! Boundary chain tracing and chain filtering on tile grids.
//!
//! [`ChainTracer`] walks every active tile of a [`tc_core::CellGrid`] and
//! emits [`Chain`]s:
//! - At each tile the walk continues towards the unvisited neighbor needing
//!   the smallest turn; ties go to the earlier direction in `N..NW` order.
//! - Other unvisited neighbors of a branch point become separate chains that
//!   share the history up to the branch point.
//! - A walk with only visited neighbors takes one last step onto one of them.
//!   Landing on its own first tile makes a loop, anywhere else a splice.
//!
//! [`filter_chains`] then drops chains that are too short or float freely
//! away from the border.

mod chain;
mod filter;
mod trace;

pub use chain::Chain;
pub use filter::{FilterConfig, Verdict, classify_chain, filter_chains};
pub use trace::{ChainTracer, TraceStats, trace_chains};
