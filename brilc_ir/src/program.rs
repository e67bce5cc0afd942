use crate::instr::{Instr, Type};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: Type,
}

/// A function body is a flat instruction list. Block structure is derived
/// from it on demand and never stored here.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Function {
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,

    pub instrs: Vec<Instr>,
}

impl Function {
    pub fn new(name: &str, instrs: Vec<Instr>) -> Function {
        Function {
            name: name.to_string(),
            args: Vec::new(),
            ty: None,
            instrs,
        }
    }

    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Default)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
