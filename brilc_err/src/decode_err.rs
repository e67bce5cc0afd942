use crate::err::BrilErr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrTy {
    #[error("invalid json: {0}")]
    Json(String),

    #[error("malformed instruction #{index}: {reason}")]
    MalformedInstr { index: usize, reason: String },

    #[error("could not read '{path}': {reason}")]
    Io { path: String, reason: String },
}

/// Raised when a program cannot be turned into the in-memory IR. The function
/// name is known only once the function record itself has been read, so it is
/// optional.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeErr {
    pub func: Option<String>,
    pub ty: DecodeErrTy,
}

impl DecodeErr {
    pub fn new(ty: DecodeErrTy) -> DecodeErr {
        DecodeErr { func: None, ty }
    }

    pub fn in_func(func: &str, ty: DecodeErrTy) -> DecodeErr {
        DecodeErr {
            func: Some(func.to_string()),
            ty,
        }
    }
}

impl BrilErr for DecodeErr {
    fn emit(&self) {
        eprintln!("brilc: Decode error - {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        match &self.func {
            Some(name) => format!("[@{}] {}", name, self.ty),
            None => self.ty.to_string(),
        }
    }
}

impl std::fmt::Display for DecodeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl std::error::Error for DecodeErr {}
