/// Rendering state threaded through expression serialization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Whether column references are prefixed with their table name.
    /// Single-table statements leave this off.
    pub qualify_columns: bool,
}

impl Context {
    pub fn qualified() -> Self {
        Self {
            qualify_columns: true,
        }
    }
}
