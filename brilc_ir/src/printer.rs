use crate::{
    instr::Instr,
    program::{Function, Program},
};
use std::fmt;

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|a| format!("{}: {}", a.name, a.ty))
                .collect();
            write!(f, "({})", args.join(", "))?;
        }
        if let Some(ty) = &self.ty {
            write!(f, ": {}", ty)?;
        }
        writeln!(f, " {{")?;

        for instr in &self.instrs {
            match instr {
                Instr::Label { .. } => writeln!(f, "{}", instr)?,
                Instr::Op(_) => writeln!(f, "  {}", instr)?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", func)?;
        }
        Ok(())
    }
}

/// Renders a bare instruction list in text form, one per line. Labels are
/// flush left, operations indented.
pub fn instrs_to_string(instrs: &[Instr]) -> String {
    let mut out = String::new();
    for instr in instrs {
        if !instr.is_label() {
            out.push_str("  ");
        }
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
