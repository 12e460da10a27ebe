use crate::memory::TypeAddr;

/// Faults raised by the virtual machine.
///
/// `UnknownOpcode` is the only recoverable one: the interpreter reports it and keeps
/// going. Everything else ends the current instruction with an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmuError {
    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("stack overflow: call to {target:#05X} exceeds {depth} nested subroutines")]
    StackOverflow { target: TypeAddr, depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}

impl EmuError {
    /// Whether the interpreter can keep executing after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EmuError::UnknownOpcode { .. })
    }
}
