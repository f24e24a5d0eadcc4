//! Usage and access policies handed to buffer builders.

/// How a created buffer is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    /// Written once at creation, never changed.
    #[default]
    Immutable,
    /// Updated by the CPU from time to time.
    Dynamic,
    /// Lives in CPU memory only.
    Cpu,
}

/// CPU access required on a created buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    #[default]
    None,
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn can_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}
