use log::{debug, trace};
use tc_core::{CellGrid, ChainId, Direction, Error, Step, TilePos, Turn};

use crate::chain::Chain;

/// Counters from the last [`ChainTracer::trace`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub seeds: usize,
    /// Active tiles with no active neighbor; marked visited, never emitted.
    pub isolated: usize,
    pub chains: usize,
    pub loops: usize,
    pub spliced: usize,
    pub branches_spawned: usize,
    /// Pending branches whose target was claimed before they were resumed.
    pub branches_dropped: usize,
}

/// A neighbor left behind at a branch point. If resumed, its chain starts
/// with the first `prefix` tiles of the chain at `out[parent]`, then takes
/// `step` onto `target`.
#[derive(Debug, Clone, Copy)]
struct PendingBranch {
    parent: usize,
    prefix: usize,
    target: TilePos,
    heading: Direction,
    step: Step,
}

#[derive(Debug)]
struct Walk {
    chain_id: ChainId,
    /// Index the finished chain will take in the output.
    slot: usize,
    pos: TilePos,
    heading: Direction,
    steps: Vec<Step>,
    tiles: Vec<TilePos>,
}

impl Walk {
    fn push_step(&mut self, next: TilePos) -> Result<(), Error> {
        let dir = Direction::between(self.pos, next)?;
        self.steps.push(Step::new(self.heading, dir));
        self.tiles.push(next);
        self.pos = next;
        self.heading = dir;
        Ok(())
    }

    fn branch_to(&self, target: TilePos) -> Result<PendingBranch, Error> {
        let dir = Direction::between(self.pos, target)?;
        Ok(PendingBranch {
            parent: self.slot,
            prefix: self.tiles.len(),
            target,
            heading: dir,
            step: Step::new(self.heading, dir),
        })
    }

    fn finish(self, spliced: bool) -> Chain {
        Chain {
            chain_id: self.chain_id,
            steps: self.steps,
            tiles: self.tiles,
            spliced,
        }
    }
}

/// Walks an activation grid into boundary chains.
///
/// Seeds are taken in row-major order. From each seed the tracer follows the
/// straightest unvisited neighbor; the other unvisited neighbors of a branch
/// point become pending branches. Pending branches live on an explicit stack
/// and are resumed once the walk that found them ends, in depth-first
/// discovery order. A resumed branch copies the history up to its branch
/// point out of the finished parent chain; a branch whose target was claimed
/// meanwhile is dropped without copying anything.
///
/// A walk with nowhere new to go steps onto the straightest visited neighbor
/// and stops: a loop if that tile is its own first tile, a splice otherwise.
///
/// The tracer keeps its stack between calls to avoid reallocating.
#[derive(Debug, Default)]
pub struct ChainTracer {
    pending: Vec<PendingBranch>,
    next_id: ChainId,
    stats: TraceStats,
}

impl ChainTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Traces every active tile of `grid`. The grid must not have been
    /// traced before.
    ///
    /// Chains of one seed come out as the seed's own chain followed by its
    /// branch chains in depth-first discovery order.
    pub fn trace(&mut self, grid: &mut CellGrid) -> Result<Vec<Chain>, Error> {
        if !grid.is_pristine() {
            return Err(Error::GridAlreadyTraced);
        }

        self.pending.clear();
        self.next_id = 0;
        self.stats = TraceStats::default();

        let mut chains = Vec::new();
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let seed = TilePos::new(row, col);
                if !grid.is_active(seed) || grid.is_visited(seed) {
                    continue;
                }

                let Some((heading, _)) = grid.active_neighbors(seed).next() else {
                    grid.discard(seed)?;
                    self.stats.isolated += 1;
                    continue;
                };

                self.stats.seeds += 1;
                self.trace_seed(grid, seed, heading, &mut chains)?;
            }
        }

        debug!(
            "traced {}x{} grid: {} seeds, {} isolated, {} chains ({} loops, {} spliced), \
             {} branches spawned, {} dropped",
            grid.height(),
            grid.width(),
            self.stats.seeds,
            self.stats.isolated,
            self.stats.chains,
            self.stats.loops,
            self.stats.spliced,
            self.stats.branches_spawned,
            self.stats.branches_dropped,
        );

        Ok(chains)
    }

    fn trace_seed(
        &mut self,
        grid: &mut CellGrid,
        seed: TilePos,
        heading: Direction,
        out: &mut Vec<Chain>,
    ) -> Result<(), Error> {
        let chain_id = self.alloc_id();
        grid.claim(seed, chain_id, 0)?;
        let root = Walk {
            chain_id,
            slot: out.len(),
            pos: seed,
            heading,
            steps: Vec::new(),
            tiles: vec![seed],
        };
        self.run(grid, root, out)?;

        while let Some(branch) = self.pending.pop() {
            if grid.is_visited(branch.target) {
                trace!("dropping branch into {}: already claimed", branch.target);
                self.stats.branches_dropped += 1;
                continue;
            }

            let parent = &out[branch.parent];
            let mut tiles = Vec::with_capacity(branch.prefix + 1);
            tiles.extend_from_slice(&parent.tiles[..branch.prefix]);
            tiles.push(branch.target);
            let mut steps = Vec::with_capacity(branch.prefix);
            steps.extend_from_slice(&parent.steps[..branch.prefix - 1]);
            steps.push(branch.step);

            let chain_id = self.alloc_id();
            grid.claim(branch.target, chain_id, branch.prefix)?;
            let walk = Walk {
                chain_id,
                slot: out.len(),
                pos: branch.target,
                heading: branch.heading,
                steps,
                tiles,
            };
            self.run(grid, walk, out)?;
        }

        Ok(())
    }

    fn run(
        &mut self,
        grid: &mut CellGrid,
        walk: Walk,
        out: &mut Vec<Chain>,
    ) -> Result<(), Error> {
        debug_assert_eq!(walk.slot, out.len());
        let chain = self.walk(grid, walk)?;
        self.record(&chain);
        out.push(chain);
        Ok(())
    }

    /// Runs one walk to its end and queues the branches it found so the first
    /// one found is resumed first.
    fn walk(&mut self, grid: &mut CellGrid, mut walk: Walk) -> Result<Chain, Error> {
        let mut found = Vec::new();
        let mut unvisited = Vec::with_capacity(8);
        let mut visited = Vec::with_capacity(8);

        let spliced = loop {
            unvisited.clear();
            visited.clear();
            for (_, nb) in grid.active_neighbors(walk.pos) {
                if grid.is_visited(nb) {
                    visited.push(nb);
                } else {
                    unvisited.push(nb);
                }
            }

            if let Some(main) = straightest(walk.pos, walk.heading, &unvisited)? {
                for &nb in unvisited.iter().filter(|&&nb| nb != main) {
                    trace!(
                        "chain {}: branch at {} towards {}",
                        walk.chain_id, walk.pos, nb
                    );
                    found.push(walk.branch_to(nb)?);
                }

                walk.push_step(main)?;
                grid.claim(main, walk.chain_id, walk.tiles.len() - 1)?;
                continue;
            }

            match straightest(walk.pos, walk.heading, &visited)? {
                Some(target) => {
                    walk.push_step(target)?;
                    let closed = walk.tiles.first() == Some(&target);
                    break !closed;
                }
                None => break false,
            }
        };

        self.stats.branches_spawned += found.len();
        self.pending.extend(found.into_iter().rev());
        Ok(walk.finish(spliced))
    }

    fn alloc_id(&mut self) -> ChainId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, chain: &Chain) {
        self.stats.chains += 1;
        if chain.is_loop() {
            self.stats.loops += 1;
        }
        if chain.spliced {
            self.stats.spliced += 1;
        }
    }
}

/// Traces `grid` with a fresh [`ChainTracer`].
pub fn trace_chains(grid: &mut CellGrid) -> Result<Vec<Chain>, Error> {
    ChainTracer::new().trace(grid)
}

/// Candidate needing the smallest turn from `heading`; ties keep the earlier
/// candidate.
fn straightest(
    from: TilePos,
    heading: Direction,
    candidates: &[TilePos],
) -> Result<Option<TilePos>, Error> {
    let mut best: Option<(u16, TilePos)> = None;
    for &c in candidates {
        let angle = Turn::between(heading, Direction::between(from, c)?).angle_deg();
        if best.is_none_or(|(a, _)| angle < a) {
            best = Some((angle, c));
        }
    }
    Ok(best.map(|(_, c)| c))
}
