pub mod config;
pub mod dce;
pub mod lvn;
pub mod optimizer;
pub mod pass;
