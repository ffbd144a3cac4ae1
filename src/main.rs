// Separately:
// CPU: ~700 steps per second
// Display + keys: 60 times / s
// Timer: every step, or 60 times / s with --timer-mode host

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use minifb::Key;

use chipcore::config::{Config, DEFAULT_CYCLES_PER_SECOND, DEFAULT_SCALE};
use chipcore::timer::{TimerMode, TIMER_DEC_PER_SECOND};
use chipcore::{Emulator, StepResult};

use pacing::FrequencyLock;
use screen::Screen;

mod pacing;
mod screen;

const FRAMES_PER_SECOND: u32 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Program image to load at 0x200
    rom: String,

    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    hz: u32,

    /// step: timers tick once per instruction; host: timers tick at 60 Hz wall clock
    #[arg(long, default_value_t = TimerMode::PerStep)]
    timer_mode: TimerMode,

    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: usize,

    /// Seed for the RND instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Start paused and show registers in the title: B toggles pause, N runs one step
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        cycles_per_second: args.hz,
        timer_mode: args.timer_mode,
        seed: args.seed,
    };
    let mut emu = Emulator::new(config);
    let len = emu
        .load_rom_by_file(&args.rom)
        .with_context(|| format!("could not load {}", args.rom))?;
    info!("read {len} bytes from {}", args.rom);

    let mut screen = Screen::new(screen::scale_from(args.scale)).context("could not open window")?;
    let keys = emu.key_latch();

    let mut cpu = FrequencyLock::new(emu.config().cycles_per_second);
    let mut frame = FrequencyLock::new(FRAMES_PER_SECOND);
    let mut timers = FrequencyLock::new(TIMER_DEC_PER_SECOND as u32);
    let mut paused = args.debug;
    let mut step_once = false;
    let mut dirty = true;
    let mut beeping = false;

    while screen.is_open() {
        if !paused || step_once {
            step_once = false;
            let result = emu.step().map_err(|err| {
                error!("halted: {err}");
                err
            });
            // a failed step leaves PC on the faulting word
            let result = result.with_context(|| format!("halted at {}", emu.cpu_state()))?;
            dirty |= emu.draw_flag();
            if paused {
                debug!("{}", emu.cpu_state());
            }
            if result == StepResult::EndOfProgram {
                info!("reached end of program after {} steps", emu.cycles());
                break;
            }
        }

        if emu.config().timer_mode == TimerMode::Host && timers.is_due() {
            emu.tick_timers();
        }

        if frame.is_due() {
            if dirty {
                screen.paint(emu.framebuffer());
                dirty = false;
            }
            if args.debug || paused {
                let state = emu.cpu_state().to_string();
                let beep = if emu.sound_active() { " beep" } else { "" };
                screen.set_status(Some(&format!("{state}{beep}")));
            } else if beeping != emu.sound_active() {
                beeping = emu.sound_active();
                screen.set_status(beeping.then_some("beep"));
            }
            screen.sync(&keys)?;

            // key edges are only fresh right after a window update
            if screen.key_pressed(Key::B) {
                paused = !paused;
                info!("{}", if paused { "paused" } else { "resumed" });
                if !paused && !args.debug {
                    beeping = emu.sound_active();
                    screen.set_status(beeping.then_some("beep"));
                }
            }
            if paused && screen.key_pressed(Key::N) {
                step_once = true;
            }
        }

        cpu.wait();
    }

    Ok(())
}
