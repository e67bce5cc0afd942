use crate::{block::BlockID, cfg::Cfg};
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

pub type BlockSet = BTreeSet<BlockID>;

/// Dominator sets for every block of a graph, indexed by `BlockID`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dominators {
    sets: Vec<BlockSet>,

    /// Full sweeps over the blocks until nothing changed, the final
    /// unchanged sweep included.
    pub iterations: usize,
}

impl Dominators {
    /// Calculate dominator sets for each block in `cfg`.
    /// Initial conditions:
    /// 1. The entry block's dominator set includes only itself.
    /// 2. For all other blocks the dominator set includes all blocks.
    ///
    /// Then sweep the non-entry blocks in source order, replacing each set by
    /// the block itself unioned with the intersection of its predecessors'
    /// sets, until a full sweep changes nothing. Predecessors unreachable
    /// from the entry lie on no path from it and are left out of the
    /// intersection, so a block with no reachable predecessors ends up
    /// dominated only by itself.
    pub fn compute(cfg: &Cfg) -> Dominators {
        Dominators::compute_with(cfg, |_| {})
    }

    /// Same as `compute`, calling `on_sweep` with every set after each full
    /// sweep, the initial sets first.
    pub fn compute_with<F>(cfg: &Cfg, mut on_sweep: F) -> Dominators
    where
        F: FnMut(&[BlockSet]),
    {
        let count = cfg.len();
        if count == 0 {
            return Dominators {
                sets: Vec::new(),
                iterations: 0,
            };
        }

        let mut reachable = vec![false; count];
        for id in cfg.reverse_post_order() {
            reachable[id] = true;
        }
        let preds: Vec<Vec<BlockID>> = (0..count)
            .map(|id| {
                cfg.predecessors(id)
                    .iter()
                    .cloned()
                    .filter(|&p| reachable[p])
                    .collect()
            })
            .collect();

        let all: BlockSet = (0..count).collect();
        let mut sets = vec![all; count];
        sets[0] = [0].iter().cloned().collect();
        on_sweep(&sets);

        let mut iterations = 0;
        let mut changed = true;
        while changed {
            changed = false;
            iterations += 1;

            for id in 1..count {
                let mut next = dom_intersection(&sets, &preds[id]);
                next.insert(id);

                if next != sets[id] {
                    sets[id] = next;
                    changed = true;
                }
            }
            on_sweep(&sets);
        }

        debug!(blocks = count, iterations, "computed dominator sets");

        Dominators { sets, iterations }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn dom_set(&self, id: BlockID) -> &BlockSet {
        &self.sets[id]
    }

    pub fn sets(&self) -> &[BlockSet] {
        &self.sets
    }

    /// Whether `a` is in the dominator set of `b`. Reflexive.
    pub fn dominates(&self, a: BlockID, b: BlockID) -> bool {
        self.sets[b].contains(&a)
    }

    pub fn strictly_dominates(&self, a: BlockID, b: BlockID) -> bool {
        a != b && self.dominates(a, b)
    }
}

/// Intersection of the dominator sets of `preds`. Empty when there are no
/// predecessors.
fn dom_intersection(sets: &[BlockSet], preds: &[BlockID]) -> BlockSet {
    let (first, rest) = match preds.split_first() {
        Some(split) => split,
        None => return BlockSet::new(),
    };

    sets[*first]
        .iter()
        .filter(|id| rest.iter().all(|p| sets[*p].contains(*id)))
        .cloned()
        .collect()
}

/// Immediate dominator links. `idom(b)` is the strict dominator of `b` that
/// strictly dominates no other strict dominator of `b`.
///
/// Reachable blocks form a tree rooted at the entry. Every unreachable block
/// is a root of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    idom: Vec<Option<BlockID>>,
    children: Vec<Vec<BlockID>>,
}

impl DomTree {
    pub fn build(doms: &Dominators) -> DomTree {
        let count = doms.len();
        let mut idom = vec![None; count];
        let mut children = vec![Vec::new(); count];

        for b in 0..count {
            let strict: Vec<BlockID> = doms.dom_set(b).iter().cloned().filter(|&a| a != b).collect();

            // Strict dominators form a chain, so at most one candidate fits.
            let parent = strict
                .iter()
                .cloned()
                .find(|&a| !strict.iter().any(|&c| doms.strictly_dominates(a, c)));

            if let Some(a) = parent {
                idom[b] = Some(a);
                children[a].push(b);
            }
        }

        DomTree { idom, children }
    }

    pub fn len(&self) -> usize {
        self.idom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idom.is_empty()
    }

    pub fn idom(&self, id: BlockID) -> Option<BlockID> {
        self.idom[id]
    }

    /// Immediately dominated blocks, in block order.
    pub fn children(&self, id: BlockID) -> &[BlockID] {
        &self.children[id]
    }

    /// Blocks without an immediate dominator: the entry, plus any block
    /// unreachable from it.
    pub fn roots(&self) -> Vec<BlockID> {
        (0..self.len()).filter(|&b| self.idom[b].is_none()).collect()
    }

    /// Whether `b` can be reached from `a` along child links. Every block
    /// dominates itself.
    pub fn dominates(&self, a: BlockID, b: BlockID) -> bool {
        if a == b {
            return true;
        }

        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::new();
        seen[a] = true;
        queue.push_back(a);

        while let Some(curr) = queue.pop_front() {
            for &child in self.children(curr) {
                if child == b {
                    return true;
                }
                if !seen[child] {
                    seen[child] = true;
                    queue.push_back(child);
                }
            }
        }

        false
    }

    pub fn strictly_dominates(&self, a: BlockID, b: BlockID) -> bool {
        a != b && self.dominates(a, b)
    }
}

/// Dominance frontier of every block. For each block `n` with predecessors,
/// every block in the union of the predecessors' dominator sets that does not
/// strictly dominate `n` has `n` in its frontier. When every predecessor is
/// reachable the blocks left out are exactly the intersection of those sets.
pub fn dominance_frontier(cfg: &Cfg, doms: &Dominators) -> Vec<BlockSet> {
    let mut frontier = vec![BlockSet::new(); cfg.len()];

    for n in 0..cfg.len() {
        let preds = cfg.predecessors(n);
        if preds.is_empty() {
            continue;
        }

        let mut union = BlockSet::new();
        for &p in preds {
            union.extend(doms.dom_set(p).iter().cloned());
        }

        for x in union {
            if !doms.strictly_dominates(x, n) {
                frontier[x].insert(n);
            }
        }
    }

    frontier
}
