use crate::err::BrilErr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CfgErrTy {
    /// A jmp or br names a label that no block in the function carries.
    #[error("block '{block}' branches to unknown label '{target}'")]
    DanglingTarget { block: String, target: String },

    #[error("label '{0}' names more than one block")]
    DuplicateBlock(String),

    #[error("no block named '{0}'")]
    UnknownBlock(String),
}

/// Structural error found while forming blocks or building the graph of a
/// single function.
#[derive(Debug, Clone, PartialEq)]
pub struct CfgErr {
    pub func: String,
    pub ty: CfgErrTy,
}

impl CfgErr {
    pub fn new(func: &str, ty: CfgErrTy) -> CfgErr {
        CfgErr {
            func: func.to_string(),
            ty,
        }
    }
}

impl BrilErr for CfgErr {
    fn emit(&self) {
        eprintln!("brilc: CFG error - {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        format!("[@{}] {}", self.func, self.ty)
    }
}

impl std::fmt::Display for CfgErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl std::error::Error for CfgErr {}
