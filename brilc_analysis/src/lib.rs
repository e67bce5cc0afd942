pub mod analyzer;
pub mod block;
pub mod cfg;
pub mod dataflow;
pub mod defined;
pub mod dom;
pub mod liveness;
