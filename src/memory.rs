use log::{info, warn};

use crate::error::{Chip8Error, Result};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; FONT_GLYPH_BYTES * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_BYTES: usize = 5;
pub const STACK_DEPTH: usize = 16;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the built-in glyph for a hex digit. Values past 0xF are not
/// masked and point beyond the font table.
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_START + digit as TypeAddr * FONT_GLYPH_BYTES as TypeAddr
}

pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    fn checked(addr: usize) -> Result<usize> {
        if addr < MEMORY_SIZE {
            Ok(addr)
        } else {
            warn!("memory access out of bounds at {addr:#06X}");
            Err(Chip8Error::MemoryOutOfBounds { address: addr })
        }
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        self.set_offset(addr, 0, val)
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8> {
        self.get_offset(addr, 0)
    }

    /// `addr + offset` without 16-bit wrap, so block transfers that run off the
    /// end of memory fail instead of landing back at 0x000.
    pub fn set_offset(&mut self, addr: TypeAddr, offset: usize, val: u8) -> Result<()> {
        let i = Self::checked(addr as usize + offset)?;
        self.bytes[i] = val;
        Ok(())
    }

    pub fn get_offset(&self, addr: TypeAddr, offset: usize) -> Result<u8> {
        let i = Self::checked(addr as usize + offset)?;
        Ok(self.bytes[i])
    }

    /// Big-endian instruction word at `addr`.
    pub fn word(&self, addr: TypeAddr) -> Result<u16> {
        let (l, r) = (self.get_offset(addr, 0)?, self.get_offset(addr, 1)?);
        Ok(((l as u16) << 8) | r as u16)
    }

    /// `len` consecutive bytes starting at `addr`. The start address must be
    /// in memory even when `len` is 0.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let start = Self::checked(addr as usize)?;
        if len > 0 {
            Self::checked(start + len - 1)?;
        }
        Ok(&self.bytes[start..start + len])
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<usize> {
        let start_index = PROGRAM_START as usize;
        let max_size = MEMORY_SIZE - start_index;
        if bytes.len() > max_size {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max_size,
            });
        }
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        info!("loaded {} bytes at {:#05X}", bytes.len(), start_index);
        Ok(bytes.len())
    }

    pub fn load_rom_by_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let program = std::fs::read(path).map_err(|source| Chip8Error::RomRead {
            path: path.to_string(),
            source,
        })?;
        self.load_rom(&program)?;
        Ok(program)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return addresses for nested calls. The pointer is the current depth, so an
/// empty stack has pointer 0 and a full one has pointer 16.
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.sp == STACK_DEPTH {
            warn!("stack overflow pushing {addr:#05X}");
            return Err(Chip8Error::StackOverflow { depth: STACK_DEPTH });
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.sp == 0 {
            warn!("stack underflow");
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn pointer(&self) -> usize {
        self.sp
    }

    /// Occupied slots, oldest call first.
    pub fn frames(&self) -> &[TypeAddr] {
        &self.addresses[..self.sp]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
