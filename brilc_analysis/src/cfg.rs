use crate::block::{BlockID, BlockMap};
use brilc_err::cfg_err::{CfgErr, CfgErrTy};
use std::collections::HashSet;
use tracing::debug;

/// Successor and predecessor lists for the blocks of one function, indexed by
/// `BlockID`. The graph is derived from a `BlockMap` and has to be rebuilt if
/// the blocks change.
#[derive(Debug, Clone, PartialEq)]
pub struct Cfg {
    names: Vec<String>,
    succs: Vec<Vec<BlockID>>,
    preds: Vec<Vec<BlockID>>,
}

impl Cfg {
    /// Builds the graph from the last operation of each block:
    ///
    /// 1. `jmp` and `br` go to their labels, in the order given.
    /// 2. `ret` has no successors.
    /// 3. Anything else (including an empty block) falls through to the next
    ///    block in source order, or has no successor if it is the last block.
    ///
    /// A label naming no block in the function is an error rather than a
    /// silently dropped edge.
    pub fn build(blocks: &BlockMap) -> Result<Cfg, CfgErr> {
        let count = blocks.len();
        let mut succs = Vec::with_capacity(count);

        for block in blocks.iter() {
            let edges = match block.last() {
                Some(op) if op.op == "jmp" || op.op == "br" => {
                    let mut edges = Vec::with_capacity(op.labels.len());
                    for target in &op.labels {
                        match blocks.id_of(target) {
                            Some(id) => edges.push(id),
                            None => {
                                return Err(CfgErr::new(
                                    blocks.func_name(),
                                    CfgErrTy::DanglingTarget {
                                        block: block.name.clone(),
                                        target: target.clone(),
                                    },
                                ))
                            }
                        }
                    }
                    edges
                }
                Some(op) if op.op == "ret" => Vec::new(),
                _ => {
                    if block.id + 1 < count {
                        vec![block.id + 1]
                    } else {
                        Vec::new()
                    }
                }
            };
            succs.push(edges);
        }

        debug!(
            func = blocks.func_name(),
            edges = succs.iter().map(|e| e.len()).sum::<usize>(),
            "built cfg"
        );

        Ok(Cfg::from_successors(blocks.names(), succs))
    }

    /// Builds a graph directly from successor lists. Every successor must be
    /// a valid index into `names`.
    pub fn from_successors(names: Vec<String>, succs: Vec<Vec<BlockID>>) -> Cfg {
        // Every block gets an entry up front, so blocks nobody jumps to still
        // have an (empty) predecessor list.
        let mut preds: Vec<Vec<BlockID>> = vec![Vec::new(); names.len()];
        for (from, edges) in succs.iter().enumerate() {
            for &to in edges {
                if !preds[to].contains(&from) {
                    preds[to].push(from);
                }
            }
        }

        Cfg {
            names,
            succs,
            preds,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The first block in source order. None for an empty function.
    pub fn entry(&self) -> Option<BlockID> {
        if self.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// The last block in source order.
    pub fn exit(&self) -> Option<BlockID> {
        self.len().checked_sub(1)
    }

    pub fn name(&self, id: BlockID) -> &str {
        &self.names[id]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn successors(&self, id: BlockID) -> &[BlockID] {
        &self.succs[id]
    }

    pub fn predecessors(&self, id: BlockID) -> &[BlockID] {
        &self.preds[id]
    }

    /// Block name to successor names, in block order.
    pub fn successor_map(&self) -> Vec<(String, Vec<String>)> {
        self.named(&self.succs)
    }

    /// Block name to predecessor names, in block order.
    pub fn predecessor_map(&self) -> Vec<(String, Vec<String>)> {
        self.named(&self.preds)
    }

    fn named(&self, edges: &[Vec<BlockID>]) -> Vec<(String, Vec<String>)> {
        edges
            .iter()
            .enumerate()
            .map(|(id, list)| {
                let names = list.iter().map(|&to| self.names[to].clone()).collect();
                (self.names[id].clone(), names)
            })
            .collect()
    }

    /// Reachable blocks in reverse post-order from the entry. Successors are
    /// visited in the order the terminator lists them.
    pub fn reverse_post_order(&self) -> Vec<BlockID> {
        fn dfs(cfg: &Cfg, id: BlockID, seen: &mut HashSet<BlockID>, post: &mut Vec<BlockID>) {
            if !seen.insert(id) {
                return;
            }
            for &succ in cfg.successors(id) {
                dfs(cfg, succ, seen, post);
            }
            post.push(id);
        }

        let mut post = Vec::with_capacity(self.len());
        if let Some(entry) = self.entry() {
            let mut seen = HashSet::new();
            dfs(self, entry, &mut seen, &mut post);
        }
        post.reverse();
        post
    }

    /// Whether some path from the entry reaches `id`.
    pub fn is_reachable(&self, id: BlockID) -> bool {
        let entry = match self.entry() {
            Some(entry) if id < self.len() => entry,
            _ => return false,
        };

        let mut seen = HashSet::new();
        let mut stack = vec![entry];
        seen.insert(entry);

        while let Some(curr) = stack.pop() {
            if curr == id {
                return true;
            }
            for &succ in self.successors(curr) {
                if seen.insert(succ) {
                    stack.push(succ);
                }
            }
        }

        false
    }
}
