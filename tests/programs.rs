use chipcore::timer::TimerMode;
use chipcore::{Chip8Error, Config, Emulator, StepResult};
use proptest::prelude::*;

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(words: &[u16]) -> Emulator {
    let mut emu = Emulator::new(Config {
        seed: Some(0xC8),
        ..Config::default()
    });
    emu.load_rom(&assemble(words)).unwrap();
    emu
}

fn run_to_end(emu: &mut Emulator, limit: usize) -> usize {
    for n in 1..=limit {
        if emu.step().unwrap() == StepResult::EndOfProgram {
            return n;
        }
    }
    panic!("program still running after {limit} steps");
}

#[test]
fn loaded_image_sits_at_0x200_after_font() {
    let image: Vec<u8> = (0..=255u8).collect();
    let mut emu = Emulator::new(Config::default());
    assert_eq!(emu.load_rom(&image).unwrap(), 256);
    assert_eq!(emu.mem.get(0x200).unwrap(), 0);
    assert_eq!(emu.mem.get(0x200 + 255).unwrap(), 255);
    assert_eq!(emu.mem.slice(0x000, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
    assert!(emu.mem.slice(0x050, 0x1B0).unwrap().iter().all(|b| *b == 0));
}

#[test]
fn missing_rom_file_is_a_load_error() {
    let mut emu = Emulator::new(Config::default());
    let err = emu.load_rom_by_file("/nonexistent/pong.ch8").unwrap_err();
    assert!(matches!(err, Chip8Error::RomRead { .. }));
    assert!(!err.is_program_fault());
}

#[test]
fn counting_loop_with_subroutine() {
    // V0 counts to 5 through a subroutine that adds 1, then stores BCD of V0
    let mut emu = boot(&[
        0x2210, // 200: CALL 210
        0x3005, // 202: SE V0, 5
        0x1200, // 204: JP 200
        0xA300, // 206: LD I, 300
        0xF033, // 208: LD B, V0
        0x0000, // 20A: end
        0x0000, //
        0x0000, //
        0x7001, // 210: ADD V0, 1
        0x00EE, // 212: RET
    ]);
    let steps = run_to_end(&mut emu, 100);
    // four full passes of CALL, ADD, RET, SE, JP then the final pass falls through
    assert_eq!(steps, 4 * 5 + 6);
    assert_eq!(emu.regs.get(0), 5);
    assert_eq!(emu.mem.slice(0x300, 3).unwrap(), &[0, 0, 5]);
    assert_eq!(emu.stack.pointer(), 0);
}

#[test]
fn draws_every_hex_digit_without_collision() {
    // digit d drawn at x = 5 * (d % 8), y = 6 * (d / 8)
    let mut words = Vec::new();
    for d in 0..16u16 {
        words.push(0x6000 | d); // LD V0, d
        words.push(0xF029); // LD F, V0
        words.push(0x6100 | (5 * (d % 8))); // LD V1, x
        words.push(0x6200 | (6 * (d / 8))); // LD V2, y
        words.push(0xD125); // DRW V1, V2, 5
    }
    let mut emu = boot(&words);
    run_to_end(&mut emu, 200);
    assert_eq!(emu.regs.get(0xF), 0);
    // "1" glyph: 0x20 row 0 lights only column 2
    assert!(emu.framebuffer().get(5 + 2, 0));
    assert!(!emu.framebuffer().get(5, 0));
    assert!(emu.framebuffer().lit_count() > 16 * 5);
}

#[test]
fn host_timer_mode_leaves_countdown_to_the_host() {
    let mut emu = Emulator::new(Config {
        timer_mode: TimerMode::Host,
        ..Config::default()
    });
    emu.load_rom(&assemble(&[0x6009, 0xF015, 0xF107, 0x1204])).unwrap();
    for _ in 0..20 {
        emu.step().unwrap();
    }
    assert_eq!(emu.regs.get(1), 9);
    for _ in 0..3 {
        emu.tick_timers();
    }
    emu.step().unwrap();
    emu.step().unwrap();
    assert_eq!(emu.regs.get(1), 6);
}

#[test]
fn key_latch_written_from_another_thread() {
    let mut emu = boot(&[0xF30A, 0x0000]);
    let writer = emu.key_latch();
    std::thread::spawn(move || writer.press(0xB)).join().unwrap();
    assert_eq!(emu.step().unwrap(), StepResult::EndOfProgram);
    assert_eq!(emu.regs.get(3), 0xB);
}

#[test]
fn instance_state_is_independent() {
    let mut a = boot(&[0x60AA, 0xD005]);
    let b = boot(&[0x60AA, 0xD005]);
    a.step().unwrap();
    a.step().unwrap();
    assert_eq!(a.regs.get(0), 0xAA);
    assert_eq!(b.regs.get(0), 0);
    assert_eq!(b.framebuffer().lit_count(), 0);
}

proptest! {
    #[test]
    fn add_matches_widened_sum(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8014]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        let sum = a as u16 + b as u16;
        prop_assert_eq!(emu.regs.get(0), (sum & 0xFF) as u8);
        prop_assert_eq!(emu.regs.get(0xF), (sum > 0xFF) as u8);
    }

    #[test]
    fn sub_flag_is_strictly_greater(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8015, 0x6200 | a as u16, 0x8217]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        prop_assert_eq!(emu.regs.get(0), a.wrapping_sub(b));
        prop_assert_eq!(emu.regs.get(0xF), (a > b) as u8);
        // SUBN V2, V1 computes b - a
        emu.step().unwrap();
        emu.step().unwrap();
        prop_assert_eq!(emu.regs.get(2), b.wrapping_sub(a));
        prop_assert_eq!(emu.regs.get(0xF), (b > a) as u8);
    }

    #[test]
    fn timers_never_underflow(start in any::<u8>(), steps in 0usize..400) {
        // LD V0, start; LD DT, V0; LD ST, V0; JP self
        let mut emu = boot(&[0x6000 | start as u16, 0xF015, 0xF018, 0x1206]);
        for _ in 0..steps + 3 {
            emu.step().unwrap();
        }
        // DT ticked once more than ST
        let dt = (start as usize).saturating_sub(steps + 2);
        let st = (start as usize).saturating_sub(steps + 1);
        prop_assert_eq!(emu.delay_timer.get() as usize, dt);
        prop_assert_eq!(emu.sound_timer.get() as usize, st);
    }
}
