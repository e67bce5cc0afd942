use crate::opc;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
};

/// A Bril type. Primitive types are plain names (`int`, `bool`, `float`),
/// parameterized types are single-key objects such as `{"ptr": "int"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Type {
    Prim(String),
    Param(BTreeMap<String, Box<Type>>),
}

impl Type {
    pub fn prim(name: &str) -> Type {
        Type::Prim(name.to_string())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Prim(name) => write!(f, "{}", name),
            Type::Param(params) => {
                for (name, inner) in params {
                    write!(f, "{}<{}>", name, inner)?;
                }
                Ok(())
            }
        }
    }
}

/// Literal operand of a `const` instruction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
}

// Floats compare bitwise so a literal can be used as part of a hash key. This
// treats every NaN payload as distinct, which is what value numbering wants.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Int(a), Literal::Int(b)) => a == b,
            (Literal::Float(a), Literal::Float(b)) => a.to_bits() == b.to_bits(),
            (Literal::Char(a), Literal::Char(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::Bool(b) => b.hash(state),
            Literal::Int(i) => i.hash(state),
            Literal::Float(x) => x.to_bits().hash(state),
            Literal::Char(c) => c.hash(state),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// A single operation. Constants carry `value`, value operations carry `dest`,
/// effect operations carry neither. Control operators name their targets in
/// `labels` and calls name their callee in `funcs`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Operation {
    pub op: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub funcs: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
}

impl Operation {
    /// An effect operation: no destination, e.g. `print`, `jmp`, `br`, `ret`.
    pub fn effect(op: &str, args: &[&str], labels: &[&str]) -> Operation {
        Operation {
            op: op.to_string(),
            dest: None,
            ty: None,
            args: args.iter().map(|a| a.to_string()).collect(),
            funcs: Vec::new(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            value: None,
        }
    }

    /// A value operation writing `dest` from `args`.
    pub fn value(op: &str, dest: &str, ty: Type, args: &[&str]) -> Operation {
        Operation {
            op: op.to_string(),
            dest: Some(dest.to_string()),
            ty: Some(ty),
            args: args.iter().map(|a| a.to_string()).collect(),
            funcs: Vec::new(),
            labels: Vec::new(),
            value: None,
        }
    }

    pub fn constant(dest: &str, ty: Type, value: Literal) -> Operation {
        Operation {
            op: String::from("const"),
            dest: Some(dest.to_string()),
            ty: Some(ty),
            args: Vec::new(),
            funcs: Vec::new(),
            labels: Vec::new(),
            value: Some(value),
        }
    }

    /// `dest = id src`, keeping the destination's type.
    pub fn copy_of(&self, src: &str) -> Operation {
        Operation {
            op: String::from("id"),
            dest: self.dest.clone(),
            ty: self.ty.clone(),
            args: vec![src.to_string()],
            funcs: Vec::new(),
            labels: Vec::new(),
            value: None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        opc::is_terminator(&self.op)
    }

    /// True when the result depends only on the operands and evaluating the
    /// operation has no other effect.
    pub fn is_pure(&self) -> bool {
        self.dest.is_some() && self.funcs.is_empty() && !opc::is_effectful(&self.op)
    }

    pub fn is_commutative(&self) -> bool {
        opc::is_commutative(&self.op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(dest) = &self.dest {
            write!(f, "{}", dest)?;
            if let Some(ty) = &self.ty {
                write!(f, ": {}", ty)?;
            }
            write!(f, " = ")?;
        }

        write!(f, "{}", self.op)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        for func in &self.funcs {
            write!(f, " @{}", func)?;
        }
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        for label in &self.labels {
            write!(f, " .{}", label)?;
        }
        write!(f, ";")
    }
}

/// One element of a function body: either a label marking a potential jump
/// target or an operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Instr {
    Label { label: String },
    Op(Operation),
}

impl Instr {
    pub fn label(name: &str) -> Instr {
        Instr::Label {
            label: name.to_string(),
        }
    }

    pub fn as_op(&self) -> Option<&Operation> {
        match self {
            Instr::Op(op) => Some(op),
            Instr::Label { .. } => None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Instr::Label { .. })
    }
}

impl From<Operation> for Instr {
    fn from(op: Operation) -> Instr {
        Instr::Op(op)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Label { label } => write!(f, ".{}:", label),
            Instr::Op(op) => write!(f, "{}", op),
        }
    }
}
