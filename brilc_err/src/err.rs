/// Common behaviour for every error raised by the brilc crates. Errors are
/// returned up to the driver, which is the only place `emit` is called.
pub trait BrilErr {
    /// Writes the error to stderr, prefixed with the tool name.
    fn emit(&self);

    /// Full human readable message, including any location context.
    fn to_msg(&self) -> String;
}
