pub mod cfg_err;
pub mod decode_err;
pub mod err;
