use log::debug;
use tc_core::{Error, TilePos};

use crate::chain::Chain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Minimum tile count. Shorter chains are dropped, loops included.
    pub min_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

/// Why a chain was kept or dropped. Variants are listed in the order the
/// rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    TooShort,
    Loop,
    Spliced,
    Border,
    /// Open, unspliced and away from the border.
    Floating,
}

impl Verdict {
    pub fn is_kept(self) -> bool {
        matches!(self, Verdict::Loop | Verdict::Spliced | Verdict::Border)
    }
}

pub fn classify_chain(
    chain: &Chain,
    height: usize,
    width: usize,
    min_length: usize,
) -> Result<Verdict, Error> {
    chain.validate()?;

    if chain.len() < min_length {
        return Ok(Verdict::TooShort);
    }
    if chain.is_loop() {
        return Ok(Verdict::Loop);
    }
    if chain.spliced {
        return Ok(Verdict::Spliced);
    }

    let on_border = |p: Option<TilePos>| p.is_some_and(|p| p.on_border(height, width));
    if on_border(chain.start_pos()) || on_border(chain.end_pos()) {
        return Ok(Verdict::Border);
    }

    Ok(Verdict::Floating)
}

/// Keeps the chains whose [`Verdict`] is kept, preserving input order. Any
/// malformed chain fails the whole call.
pub fn filter_chains(
    chains: Vec<Chain>,
    height: usize,
    width: usize,
    min_length: usize,
) -> Result<Vec<Chain>, Error> {
    let total = chains.len();
    let mut kept = Vec::with_capacity(total);
    for chain in chains {
        if classify_chain(&chain, height, width, min_length)?.is_kept() {
            kept.push(chain);
        }
    }

    debug!(
        "chain filter kept {}/{} chains (min_length={min_length})",
        kept.len(),
        total
    );
    Ok(kept)
}
