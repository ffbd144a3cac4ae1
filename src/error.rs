pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Failures raised while loading or stepping a program.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: more than {depth} nested calls")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("failed to read ROM {path}")]
    RomRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Chip8Error {
    /// Step-time conditions caused by the program itself rather than the host.
    pub fn is_program_fault(&self) -> bool {
        !matches!(self, Self::RomTooLarge { .. } | Self::RomRead { .. })
    }
}
