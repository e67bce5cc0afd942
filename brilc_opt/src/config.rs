#[derive(Clone, Debug, PartialEq)]
pub struct OptConfig {
    /// Run dead-code elimination on every block, repeated until a sweep
    /// removes nothing.
    pub dce: bool,

    /// Run local value numbering on every block. When both passes are on,
    /// value numbering runs first so the copies it leaves behind can be
    /// cleaned up by DCE.
    pub lvn: bool,
}

impl Default for OptConfig {
    fn default() -> OptConfig {
        OptConfig {
            dce: true,
            lvn: true,
        }
    }
}
