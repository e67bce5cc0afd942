pub mod decode;
pub mod instr;
pub mod opc;
pub mod printer;
pub mod program;
