use std::fmt;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    config::Config,
    decode::OpCodes,
    display::FrameBuffer,
    error::Result,
    keyboard::{KeyLatch, KeyState},
    memory::{glyph_addr, Memory, Stack, TypeAddr},
    registers::{IndexRegister, ProgramCounter, Registers},
    timer::{Timer, TimerMode},
};

/// What the host should do after a successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The next word to fetch is a real instruction.
    Running,
    /// The next word to fetch is 0x0000, which programs use as an end marker.
    EndOfProgram,
}

/// Register-level view of the machine, for debug overlays and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    pub v: [u8; 16],
    pub i: TypeAddr,
    pub pc: TypeAddr,
    pub sp: usize,
    /// Return addresses, oldest call first.
    pub stack: Vec<TypeAddr>,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC={:03X} I={:03X} SP={} DT={:02X} ST={:02X} V=[",
            self.pc, self.i, self.sp, self.delay_timer, self.sound_timer
        )?;
        for (n, v) in self.v.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v:02X}")?;
        }
        write!(f, "] S=[")?;
        for (n, addr) in self.stack.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "{addr:03X}")?;
        }
        write!(f, "]")
    }
}

pub struct Emulator {
    fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    keys: KeyLatch,
    draw_flag: bool,
    rng: StdRng,
    config: Config,
    rom: Vec<u8>,
    cycles: u64,
}

impl Emulator {
    pub fn new(config: Config) -> Self {
        Self::with_latch(config, KeyLatch::new())
    }

    /// Build an interpreter that reads keys from an existing latch.
    pub fn with_latch(config: Config, keys: KeyLatch) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            keys,
            draw_flag: false,
            rng,
            config,
            rom: Vec::new(),
            cycles: 0,
        }
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<usize> {
        let len = self.mem.load_rom(bytes)?;
        self.rom = bytes.to_vec();
        Ok(len)
    }

    pub fn load_rom_by_file(&mut self, path: &str) -> Result<usize> {
        let program = self.mem.load_rom_by_file(path)?;
        let len = program.len();
        self.rom = program;
        Ok(len)
    }

    /// Back to power-on state with the last loaded program in place. The key
    /// latch stays connected to whoever is writing it.
    pub fn reset(&mut self) -> Result<()> {
        let rom = std::mem::take(&mut self.rom);
        let mut fresh = Self::with_latch(self.config.clone(), self.keys.clone());
        fresh.load_rom(&rom)?;
        *self = fresh;
        debug!("reset with {} byte program", self.rom.len());
        Ok(())
    }

    pub fn fetch_decode(&mut self) -> Result<OpCodes> {
        let ins = self.mem.word(self.pc.0)?;
        self.pc.increment();
        OpCodes::decode_raw(ins)
    }

    /// One fetch/decode/execute cycle plus the timer decrement.
    ///
    /// A failed step leaves PC on the faulting word. Every handler checks
    /// before it writes, so nothing else changes either.
    pub fn step(&mut self) -> Result<StepResult> {
        let keys = self.keys.snapshot();
        let addr = self.pc.0;
        self.draw_flag = false;

        let executed = self.fetch_decode().and_then(|operation| {
            trace!("{addr:03X}: {operation}");
            self.execute_ins(operation, keys)
        });
        if let Err(err) = executed {
            self.pc.set_addr(addr);
            return Err(err);
        }

        if self.config.timer_mode == TimerMode::PerStep {
            self.tick_timers();
        }
        self.cycles += 1;

        // an unreadable next word is reported by the step that fetches it
        Ok(match self.mem.word(self.pc.0) {
            Ok(0) => StepResult::EndOfProgram,
            _ => StepResult::Running,
        })
    }

    pub fn execute_ins(&mut self, ins: OpCodes, keys: KeyState) -> Result<()> {
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => {
                self.pc.set_addr(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // pc already points past the call
                self.stack.push(self.pc.0)?;
                self.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.pc.increment();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.pc.increment();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.pc.increment();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.pc.increment();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // In the ALU ops below VF is written before VX, so with X = F the
            // result replaces the flag.
            OpCodes::Add(vx, vy) => {
                let sum = self.regs.get(vx) as u16 + self.regs.get(vy) as u16;
                self.regs.set_flag(sum > 0xFF);
                self.regs.set_register(vx, sum as u8);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(x > y); // no borrow
                self.regs.set_register(vx, x.wrapping_sub(y));
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(y > x); // no borrow
                self.regs.set_register(vx, y.wrapping_sub(x));
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(0xF, vx_value & 1);
                self.regs.set_register(vx, vx_value >> 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(0xF, (vx_value >> 7) & 1);
                self.regs.set_register(vx, vx_value << 1);
            }
            OpCodes::SetIndexRegister(addr) => self.index.set_addr(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.pc
                    .set_addr(addr.wrapping_add(self.regs.get(0) as TypeAddr));
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // rows I..I+N, 8 pixels each, MSB leftmost
                let sprite = self.mem.slice(self.index.0, height as usize)?;
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_flag(vf);
                self.draw_flag = true;
            }
            OpCodes::SkipIfPressed(vx) => {
                if keys.is_pressed(self.regs.get(vx)) {
                    self.pc.increment();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !keys.is_pressed(self.regs.get(vx)) {
                    self.pc.increment();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.get()),
            OpCodes::GetKey(vx) => match keys.highest_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                // fetch this instruction again next step
                None => self.pc.decrement(),
            },
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                self.index.add(self.regs.get(vx));
            }
            OpCodes::PointChar(vx) => {
                self.index.set_addr(glyph_addr(self.regs.get(vx)));
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let i = self.index.0;
                self.mem.slice(i, 3)?;
                self.mem.set(i, value / 100)?;
                self.mem.set_offset(i, 1, (value / 10) % 10)?;
                self.mem.set_offset(i, 2, value % 10)?;
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                self.mem.slice(self.index.0, vx as usize + 1)?;
                for reg in 0..=vx {
                    self.mem
                        .set_offset(self.index.0, reg as usize, self.regs.get(reg))?;
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                self.mem.slice(self.index.0, vx as usize + 1)?;
                for reg in 0..=vx {
                    let reg_val = self.mem.get_offset(self.index.0, reg as usize)?;
                    self.regs.set_register(reg, reg_val);
                }
            }
        }
        Ok(())
    }

    /// Decrement DT and ST once each, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn key_latch(&self) -> KeyLatch {
        self.keys.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn cpu_state(&self) -> CpuState {
        CpuState {
            v: *self.regs.all(),
            i: self.index.0,
            pc: self.pc.0,
            sp: self.stack.pointer(),
            stack: self.stack.frames().to_vec(),
            delay_timer: self.delay_timer.get(),
            sound_timer: self.sound_timer.get(),
        }
    }
}
