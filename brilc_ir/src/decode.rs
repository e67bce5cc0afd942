use crate::{
    instr::{Instr, Literal, Operation, Type},
    opc,
    program::{Argument, Function, Program},
};
use brilc_err::decode_err::{DecodeErr, DecodeErrTy};
use serde::Deserialize;
use std::{convert::TryFrom, io::Read};

// The wire records accept any combination of fields. Whether a record is a
// label or an operation, and whether the operation is well formed, is decided
// afterwards so the error can name the offending instruction.

#[derive(Deserialize)]
struct RawProgram {
    #[serde(default)]
    functions: Vec<RawFunction>,
}

#[derive(Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    args: Vec<Argument>,
    #[serde(rename = "type")]
    ty: Option<Type>,
    #[serde(default)]
    instrs: Vec<RawInstr>,
}

#[derive(Deserialize)]
struct RawInstr {
    label: Option<String>,
    op: Option<String>,
    dest: Option<String>,
    #[serde(rename = "type")]
    ty: Option<Type>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    funcs: Vec<String>,
    #[serde(default)]
    labels: Vec<String>,
    value: Option<Literal>,
}

/// Decodes a JSON encoded Bril program.
pub fn from_str(input: &str) -> Result<Program, DecodeErr> {
    let raw: RawProgram = serde_json::from_str(input)
        .map_err(|e| DecodeErr::new(DecodeErrTy::Json(e.to_string())))?;
    build_program(raw)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Program, DecodeErr> {
    let raw: RawProgram = serde_json::from_reader(reader)
        .map_err(|e| DecodeErr::new(DecodeErrTy::Json(e.to_string())))?;
    build_program(raw)
}

/// Encodes a program back to pretty printed JSON.
pub fn to_string(program: &Program) -> Result<String, DecodeErr> {
    serde_json::to_string_pretty(program)
        .map_err(|e| DecodeErr::new(DecodeErrTy::Json(e.to_string())))
}

fn build_program(raw: RawProgram) -> Result<Program, DecodeErr> {
    let mut functions = Vec::with_capacity(raw.functions.len());
    for rf in raw.functions {
        let RawFunction {
            name,
            args,
            ty,
            instrs: raw_instrs,
        } = rf;

        let mut instrs = Vec::with_capacity(raw_instrs.len());
        for (index, ri) in raw_instrs.into_iter().enumerate() {
            let instr = Instr::try_from(ri)
                .map_err(|reason| DecodeErr::in_func(&name, malformed(index, reason)))?;
            instrs.push(instr);
        }

        functions.push(Function {
            name,
            args,
            ty,
            instrs,
        });
    }

    Ok(Program { functions })
}

fn malformed(index: usize, reason: String) -> DecodeErrTy {
    DecodeErrTy::MalformedInstr { index, reason }
}

impl TryFrom<RawInstr> for Instr {
    type Error = String;

    fn try_from(raw: RawInstr) -> Result<Instr, String> {
        build_instr(raw)
    }
}

fn build_instr(raw: RawInstr) -> Result<Instr, String> {
    let op = match (raw.label, raw.op) {
        (Some(_), Some(_)) => return Err(String::from("has both 'label' and 'op'")),
        (None, None) => return Err(String::from("has neither 'label' nor 'op'")),
        (Some(label), None) => return Ok(Instr::Label { label }),
        (None, Some(op)) => op,
    };

    if op == "const" && raw.value.is_none() {
        return Err(String::from("const without a 'value'"));
    }

    if let Some(n) = opc::label_arity(&op) {
        if raw.labels.len() != n {
            return Err(format!(
                "'{}' expects {} label(s), found {}",
                op,
                n,
                raw.labels.len()
            ));
        }
    }

    Ok(Instr::Op(Operation {
        op,
        dest: raw.dest,
        ty: raw.ty,
        args: raw.args,
        funcs: raw.funcs,
        labels: raw.labels,
        value: raw.value,
    }))
}
