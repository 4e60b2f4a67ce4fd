use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use minifb::{Key, Scale, Window, WindowOptions};

use crate::emulator::Vm;
use crate::error::VmError;
use crate::keyboard::HOST_LAYOUT;
use crate::sound::Speaker;

mod decode;
mod display;
mod emulator;
mod error;
mod keyboard;
mod memory;
mod registers;
mod sound;
mod timer;

const PIXEL_ON: u32 = 0x007FFF; // (0, 127, 255)
const PIXEL_OFF: u32 = 0x000000;

#[derive(Parser, Debug)]
#[command(version, about = "A CHIP-8 virtual machine")]
struct Args {
    /// Path to the ROM image to run
    rom: PathBuf,

    /// Instructions executed per rendered frame
    #[arg(long, default_value_t = 10)]
    steps_per_frame: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom).with_context(|| format!("reading {}", args.rom.display()))?;
    let mut vm = Vm::new();
    vm.load(&rom)?;

    let mut window = Window::new(
        "ocho - ESC to exit",
        display::WIDTH,
        display::HEIGHT,
        WindowOptions {
            scale: Scale::X16,
            ..WindowOptions::default()
        },
    )?;
    // ~60 fps
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let mut speaker = match Speaker::new() {
        Ok(speaker) => Some(speaker),
        Err(err) => {
            warn!("audio unavailable, running silent: {err}");
            None
        }
    };

    while window.is_open() && !window.is_key_down(Key::Escape) {
        for (slot, key) in HOST_LAYOUT.iter().enumerate() {
            vm.set_key(slot as u8, window.is_key_down(*key))?;
        }

        for _ in 0..args.steps_per_frame {
            match vm.step() {
                Ok(()) => {}
                // malformed words are diagnostics, not crashes
                Err(err @ VmError::UnknownOpcode { .. }) => warn!("{err}"),
                Err(err) => return Err(err.into()),
            }
            if vm.is_sound_active() {
                if let Some(speaker) = speaker.as_mut() {
                    speaker.beep();
                }
            }
        }

        if vm.framebuffer().is_dirty() {
            let frame = vm.framebuffer().to_argb(PIXEL_ON, PIXEL_OFF);
            window.update_with_buffer(&frame, display::WIDTH, display::HEIGHT)?;
            vm.clear_dirty();
        } else {
            window.update();
        }

        if let Some(speaker) = speaker.as_mut() {
            speaker.poll();
        }
    }

    Ok(())
}
