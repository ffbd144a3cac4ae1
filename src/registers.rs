use crate::memory::{TypeAddr, PROGRAM_START};

pub const FLAG_REGISTER: u8 = 0xF;

#[derive(Debug, Clone, Default)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    /// VX += value, wrapping at 8 bits. Leaves VF alone.
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, raised: bool) {
        self.set_register(FLAG_REGISTER, raised as u8);
    }

    pub fn all(&self) -> &[u8; 16] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self(PROGRAM_START)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as TypeAddr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_register_wraps_without_flag() {
        let mut regs = Registers::new();
        regs.set_register(2, 0xF0);
        regs.add_to_register(2, 0x20);
        assert_eq!(regs.get(2), 0x10);
        assert_eq!(regs.get(FLAG_REGISTER), 0);
    }

    #[test]
    fn test_pc_wraps_at_16_bits() {
        let mut pc = ProgramCounter::default();
        assert_eq!(pc.0, 0x200);
        pc.set_addr(0xFFFE);
        pc.increment();
        assert_eq!(pc.0, 0);
        pc.decrement();
        assert_eq!(pc.0, 0xFFFE);
    }

    #[test]
    fn test_index_add_wraps() {
        let mut i = IndexRegister(0xFFFF);
        i.add(2);
        assert_eq!(i.0, 1);
    }
}
