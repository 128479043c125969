use log::{debug, trace};
use tc_core::{ActivationMap, CellGrid, Error};
use tc_fill::fill_gaps_map;
use tc_trace::{Chain, ChainTracer, FilterConfig, TraceStats, filter_chains};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Close single-tile gaps before tracing.
    pub fill_gaps: bool,
    pub filter: FilterConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            fill_gaps: true,
            filter: FilterConfig::default(),
        }
    }
}

/// Everything a feature extractor needs from one activation plane.
#[derive(Debug, Clone)]
pub struct ChainExtraction {
    /// Chains that passed the filter, in trace order.
    pub chains: Vec<Chain>,
    /// Number of chains before filtering.
    pub raw_chains: usize,
    /// Plane that was actually traced (the input when filling is off).
    pub filled: ActivationMap,
    pub stats: TraceStats,
}

impl ChainExtraction {
    pub fn height(&self) -> usize {
        self.filled.height()
    }

    pub fn width(&self) -> usize {
        self.filled.width()
    }
}

/// Fill, trace and filter `map`.
pub fn extract_chains(map: &ActivationMap, cfg: &ExtractConfig) -> Result<ChainExtraction, Error> {
    let filled = if cfg.fill_gaps {
        fill_gaps_map(map)
    } else {
        map.clone()
    };

    trace!("tracing plane:\n{filled}");
    let mut grid = CellGrid::from_activation(&filled);
    let mut tracer = ChainTracer::new();
    let raw = tracer.trace(&mut grid)?;
    let raw_chains = raw.len();

    let (height, width) = filled.shape();
    let chains = filter_chains(raw, height, width, cfg.filter.min_length)?;

    debug!(
        "extracted {} of {raw_chains} chains from {height}x{width} plane (fill_gaps={})",
        chains.len(),
        cfg.fill_gaps
    );

    Ok(ChainExtraction {
        chains,
        raw_chains,
        filled,
        stats: tracer.stats(),
    })
}

#[cfg(test)]
mod tests {
    use tc_core::{ActivationMap, TilePos};

    use super::{ExtractConfig, extract_chains};

    #[test]
    fn default_config_fills_and_uses_length_three() {
        let cfg = ExtractConfig::default();
        assert!(cfg.fill_gaps);
        assert_eq!(cfg.filter.min_length, 3);
    }

    #[test]
    fn filling_can_be_disabled() {
        let map = ActivationMap::from_ascii(
            "
            .......
            .#.#...
            .......
            ",
        )
        .expect("valid fixture");

        let filled = extract_chains(&map, &ExtractConfig::default()).expect("extract");
        assert!(filled.filled.is_active(TilePos::new(1, 2)));
        assert_eq!(filled.raw_chains, 1);

        let cfg = ExtractConfig {
            fill_gaps: false,
            ..ExtractConfig::default()
        };
        let raw = extract_chains(&map, &cfg).expect("extract");
        assert_eq!(raw.filled, map);
        assert_eq!(raw.raw_chains, 0);
        assert_eq!(raw.stats.isolated, 2);
        assert!(raw.chains.is_empty());
    }
}
