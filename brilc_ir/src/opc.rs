/// Opcodes that end a basic block. Anything after one of these in the same
/// straight-line region would be unreachable, so block formation cuts here.
pub const TERMINATORS: [&str; 3] = ["jmp", "br", "ret"];

/// Opcodes whose result depends on more than their operands, or which act on
/// memory or the outside world. These are never value numbered and never
/// removed as dead.
const EFFECTFUL: [&str; 10] = [
    "call",
    "print",
    "store",
    "load",
    "alloc",
    "free",
    "nop",
    "speculate",
    "commit",
    "guard",
];

/// Operand order does not change the result for these.
const COMMUTATIVE: [&str; 8] = ["add", "mul", "eq", "and", "or", "fadd", "fmul", "feq"];

pub fn is_terminator(op: &str) -> bool {
    TERMINATORS.contains(&op)
}

pub fn is_effectful(op: &str) -> bool {
    EFFECTFUL.contains(&op)
}

pub fn is_commutative(op: &str) -> bool {
    COMMUTATIVE.contains(&op)
}

/// Number of label targets a control operator must carry, if it is one.
pub fn label_arity(op: &str) -> Option<usize> {
    match op {
        "jmp" => Some(1),
        "br" => Some(2),
        _ => None,
    }
}
