// 16 8-bit data registers named V0 to VF, VF doubles as carry/borrow/collision
// I -> address register (12 bits used)
//
// Stack of 16 return addresses
//
// Delay timer & Sound timer: count down to 0, one tick per step unless the
// host drives them
//
// Display res: 64 width, 32 height, XOR drawing
//
// 34 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      KK: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::Config;
pub use emulator::{CpuState, Emulator, StepResult};
pub use error::{Chip8Error, Result};
