use brilc_err::cfg_err::{CfgErr, CfgErrTy};
use brilc_ir::{
    instr::{Instr, Operation},
    program::Function,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Index of a block within its function, in source order. The entry block is
/// always 0.
pub type BlockID = usize;

/// Prefix of names given to blocks that do not start with a label.
pub const GEN_PREFIX: &str = "gen_bk_";

/// A maximal straight-line run of operations. The label that started the
/// block, if any, is not stored in `instrs`; it became the block's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// String identifier, unique within the function
    pub name: String,

    /// Position of the block in source order
    pub id: BlockID,

    /// Whether `name` came from a label in the source. Generated names are
    /// not written back out when the function is reassembled.
    pub labeled: bool,

    /// Operations in the block. Only the last one may be a terminator.
    pub instrs: Vec<Operation>,
}

impl Block {
    pub fn new(name: &str, id: BlockID, labeled: bool) -> Block {
        Block {
            name: name.to_string(),
            id,
            labeled,
            instrs: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&Operation> {
        self.instrs.last()
    }

    /// The block's operations with its label put back in front.
    pub fn to_instrs(&self) -> Vec<Instr> {
        let mut out = Vec::with_capacity(self.instrs.len() + 1);
        if self.labeled {
            out.push(Instr::label(&self.name));
        }
        out.extend(self.instrs.iter().cloned().map(Instr::Op));
        out
    }
}

/// Splits a flat instruction list into basic blocks. A block ends after a
/// terminator or right before a label. Leading labels stay in the block they
/// start; naming happens in `BlockMap::from_raw`.
///
/// Two labels in a row produce a block holding only the first label.
pub fn form_blocks(instrs: &[Instr]) -> Vec<Vec<Instr>> {
    let mut blocks = Vec::new();
    let mut curr: Vec<Instr> = Vec::new();

    for instr in instrs {
        match instr {
            Instr::Op(op) => {
                curr.push(instr.clone());
                if op.is_terminator() {
                    blocks.push(std::mem::take(&mut curr));
                }
            }
            Instr::Label { .. } => {
                if !curr.is_empty() {
                    blocks.push(std::mem::take(&mut curr));
                }
                curr.push(instr.clone());
            }
        }
    }

    if !curr.is_empty() {
        blocks.push(curr);
    }

    blocks
}

/// Blocks of a single function in source order, addressable by id or name.
/// Source order matters: it decides where a block without a terminator falls
/// through to.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMap {
    func: String,
    blocks: Vec<Block>,
    index: HashMap<String, BlockID>,
}

impl BlockMap {
    /// Forms and names the blocks of `func`.
    pub fn build(func: &Function) -> Result<BlockMap, CfgErr> {
        let raw = form_blocks(&func.instrs);
        let map = BlockMap::from_raw(&func.name, raw)?;
        debug!(func = %func.name, blocks = map.len(), "formed blocks");
        Ok(map)
    }

    /// Names raw blocks. A block starting with a label takes the label as its
    /// name; every other block gets the next `gen_bk_N` name, counting only
    /// unlabeled blocks. A generated name already used by a label in the
    /// function is skipped.
    pub fn from_raw(func: &str, raw: Vec<Vec<Instr>>) -> Result<BlockMap, CfgErr> {
        let labels: HashSet<String> = raw
            .iter()
            .filter_map(|instrs| match instrs.first() {
                Some(Instr::Label { label }) => Some(label.clone()),
                _ => None,
            })
            .collect();

        let mut blocks = Vec::with_capacity(raw.len());
        let mut index = HashMap::new();
        let mut generated = 0;

        for (id, instrs) in raw.into_iter().enumerate() {
            let mut iter = instrs.into_iter().peekable();

            let mut block = match iter.peek() {
                Some(Instr::Label { label }) => {
                    let block = Block::new(label, id, true);
                    iter.next();
                    block
                }
                _ => {
                    let mut name = format!("{}{}", GEN_PREFIX, generated);
                    while labels.contains(&name) {
                        generated += 1;
                        name = format!("{}{}", GEN_PREFIX, generated);
                    }
                    generated += 1;
                    Block::new(&name, id, false)
                }
            };

            for instr in iter {
                if let Instr::Op(op) = instr {
                    block.instrs.push(op);
                }
            }

            if index.insert(block.name.clone(), id).is_some() {
                return Err(CfgErr::new(func, CfgErrTy::DuplicateBlock(block.name)));
            }
            blocks.push(block);
        }

        Ok(BlockMap {
            func: func.to_string(),
            blocks,
            index,
        })
    }

    pub fn func_name(&self) -> &str {
        &self.func
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockID) -> &Block {
        &self.blocks[id]
    }

    pub fn get_mut(&mut self, id: BlockID) -> &mut Block {
        &mut self.blocks[id]
    }

    pub fn id_of(&self, name: &str) -> Option<BlockID> {
        self.index.get(name).copied()
    }

    /// Like `id_of`, but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<BlockID, CfgErr> {
        self.id_of(name).ok_or_else(|| {
            CfgErr::new(&self.func, CfgErrTy::UnknownBlock(name.to_string()))
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&Block> {
        self.id_of(name).map(|id| &self.blocks[id])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.name.clone()).collect()
    }

    /// Flattens the blocks back into an instruction list. For an unmodified
    /// map this is exactly the list the map was built from.
    pub fn reassemble(&self) -> Vec<Instr> {
        self.blocks.iter().flat_map(|b| b.to_instrs()).collect()
    }

    /// Makes every fallthrough explicit: a block that does not end in a
    /// terminator gets `jmp` to the next block, or `ret` if it is the last
    /// block. A block that becomes a jump target is marked as labeled so the
    /// reassembled code still has the label to jump to.
    pub fn add_terminators(&mut self) {
        let count = self.blocks.len();
        for id in 0..count {
            let ends = self.blocks[id]
                .last()
                .map(|op| op.is_terminator())
                .unwrap_or(false);
            if ends {
                continue;
            }

            if id + 1 < count {
                let next = self.blocks[id + 1].name.clone();
                self.blocks[id + 1].labeled = true;
                self.blocks[id]
                    .instrs
                    .push(Operation::effect("jmp", &[], &[next.as_str()]));
            } else {
                self.blocks[id]
                    .instrs
                    .push(Operation::effect("ret", &[], &[]));
            }
        }
    }

    /// Number of operations in each block, in block order.
    pub fn instr_counts(&self) -> Vec<(String, usize)> {
        self.blocks
            .iter()
            .map(|b| (b.name.clone(), b.instrs.len()))
            .collect()
    }
}
