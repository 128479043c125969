use tc_core::{ChainId, Error, Step, TilePos};

/// Ordered boundary path: `tiles[k + 1]` is reached from `tiles[k]` by
/// `steps[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub chain_id: ChainId,
    pub steps: Vec<Step>,
    pub tiles: Vec<TilePos>,
    /// The last step re-entered an already visited tile other than
    /// `tiles[0]`.
    pub spliced: bool,
}

impl Chain {
    pub fn start_pos(&self) -> Option<TilePos> {
        self.tiles.first().copied()
    }

    pub fn end_pos(&self) -> Option<TilePos> {
        self.tiles.last().copied()
    }

    pub fn is_loop(&self) -> bool {
        self.tiles.len() >= 2 && self.start_pos() == self.end_pos()
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Tile count.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of step distances, in tiles.
    pub fn arc_length(&self) -> f32 {
        self.steps.iter().map(|s| s.distance).sum()
    }

    /// Checks `tiles.len() == steps.len() + 1` (or both empty).
    pub fn validate(&self) -> Result<(), Error> {
        let ok = if self.tiles.is_empty() {
            self.steps.is_empty()
        } else {
            self.tiles.len() == self.steps.len() + 1
        };

        if ok {
            Ok(())
        } else {
            Err(Error::MalformedChain {
                chain_id: self.chain_id,
                tiles: self.tiles.len(),
                steps: self.steps.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::SQRT_2;

    use tc_core::{Direction, Error, Step, TilePos};

    use crate::Chain;

    fn chain(tiles: &[(usize, usize)]) -> Chain {
        let tiles: Vec<TilePos> = tiles.iter().copied().map(TilePos::from).collect();
        let mut steps = Vec::new();
        let mut heading = Direction::E;
        for w in tiles.windows(2) {
            let d = Direction::between(w[0], w[1]).expect("adjacent fixture tiles");
            steps.push(Step::new(heading, d));
            heading = d;
        }
        Chain {
            chain_id: 0,
            steps,
            tiles,
            spliced: false,
        }
    }

    #[test]
    fn loop_requires_two_tiles_and_equal_ends() {
        assert!(chain(&[(2, 2), (2, 3), (3, 3), (3, 2), (2, 2)]).is_loop());
        assert!(!chain(&[(2, 2), (2, 3), (2, 4)]).is_loop());
        assert!(!chain(&[(2, 2)]).is_loop());
        assert!(!chain(&[]).is_loop());
    }

    #[test]
    fn endpoints_and_lengths() {
        let c = chain(&[(1, 1), (1, 2), (2, 3)]);
        assert_eq!(c.start_pos(), Some(TilePos::new(1, 1)));
        assert_eq!(c.end_pos(), Some(TilePos::new(2, 3)));
        assert_eq!(c.len(), 3);
        assert_eq!(c.num_steps(), 2);
        assert!((c.arc_length() - (1.0 + SQRT_2)).abs() < 1e-6);

        let empty = chain(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.start_pos(), None);
        assert_eq!(empty.arc_length(), 0.0);
    }

    #[test]
    fn validate_rejects_mismatched_steps() {
        assert!(chain(&[(1, 1), (1, 2)]).validate().is_ok());
        assert!(chain(&[]).validate().is_ok());

        let mut bad = chain(&[(1, 1), (1, 2), (1, 3)]);
        bad.steps.pop();
        assert_eq!(
            bad.validate(),
            Err(Error::MalformedChain {
                chain_id: 0,
                tiles: 3,
                steps: 1,
            })
        );

        let mut orphan_steps = chain(&[(1, 1), (1, 2)]);
        orphan_steps.tiles.clear();
        assert!(orphan_steps.validate().is_err());
    }
}
