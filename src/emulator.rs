use log::trace;
use rand::Rng;

use crate::decode::Instruction;
use crate::display::FrameBuffer;
use crate::error::VmError;
use crate::keyboard::Keypad;
use crate::memory::{Memory, Stack};
use crate::registers::Registers;
use crate::timer::Timer;

/// The CHIP-8 virtual machine.
///
/// Owns the whole machine: RAM, registers, call stack, timers, key latch
/// and framebuffer. The driver advances it one instruction at a time with
/// `step`, feeds key transitions through `set_key`, and consumes the
/// framebuffer whenever it is dirty. There is no hidden process-wide
/// state; everything lives in this value.
pub struct Vm {
    mem: Memory,
    regs: Registers,
    stack: Stack,
    keypad: Keypad,
    fb: FrameBuffer,
    delay: Timer,
    sound: Timer,
    sound_edge: bool,
}

impl Vm {
    pub fn new() -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            stack: Stack::new(),
            keypad: Keypad::new(),
            fb: FrameBuffer::new(),
            delay: Timer::new(),
            sound: Timer::new(),
            sound_edge: false,
        }
    }

    /// Rezeroes every piece of machine state and reloads the glyph sheet.
    /// May be called any number of times, e.g. before loading a new ROM.
    pub fn reset(&mut self) {
        self.mem.reset();
        self.regs.reset();
        self.stack.reset();
        self.keypad.reset();
        self.fb.reset();
        self.delay = Timer::new();
        self.sound = Timer::new();
        self.sound_edge = false;
    }

    /// Copies a ROM image into RAM at 0x200.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), VmError> {
        self.mem.load_rom(rom)?;
        log::debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Latches the pressed state of one logical key (0x0..=0xF).
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), VmError> {
        self.keypad.set(key, pressed)
    }

    /// True exactly during the step in which the sound timer reached zero
    /// from a positive value. The driver turns this edge into one tone.
    pub fn is_sound_active(&self) -> bool {
        self.sound_edge
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Acknowledges the current frame after the renderer consumed it.
    pub fn clear_dirty(&mut self) {
        self.fb.clear_dirty();
    }

    /// Fetches, decodes and executes exactly one instruction, then ticks
    /// both timers.
    ///
    /// An unrecognized word is reported and skipped: pc moves past it so a
    /// caller that keeps stepping cannot spin on the same word. Stack
    /// faults leave pc (and everything else) untouched. Timers do not
    /// tick on an errored step.
    pub fn step(&mut self) -> Result<(), VmError> {
        self.sound_edge = false;
        let pc = self.regs.pc;
        let op = self.mem.opcode_at(pc);
        let ins = match Instruction::decode(op) {
            Some(ins) => ins,
            None => {
                self.regs.pc = pc.wrapping_add(2);
                return Err(VmError::UnknownOpcode { opcode: op.0, pc });
            }
        };
        trace!("{pc:#05X}: {:#06X} {ins:?}", op.0);
        self.execute(ins)?;
        self.delay.tick();
        self.sound_edge = self.sound.tick();
        Ok(())
    }

    fn execute(&mut self, ins: Instruction) -> Result<(), VmError> {
        use Instruction::*;

        let pc = self.regs.pc;
        let mut next = pc.wrapping_add(2);

        match ins {
            ClearScreen => self.fb.clear(),
            Return => next = self.stack.pop()?.wrapping_add(2),
            Jump(addr) => next = addr,
            Call(addr) => {
                self.stack.push(pc)?;
                next = addr;
            }
            SkipEqImm(x, nn) => {
                if self.regs.get(x) == nn {
                    next = pc.wrapping_add(4);
                }
            }
            SkipNeImm(x, nn) => {
                if self.regs.get(x) != nn {
                    next = pc.wrapping_add(4);
                }
            }
            SkipEqReg(x, y) => {
                if self.regs.get(x) == self.regs.get(y) {
                    next = pc.wrapping_add(4);
                }
            }
            LoadImm(x, nn) => self.regs.set(x, nn),
            AddImm(x, nn) => {
                let sum = self.regs.get(x).wrapping_add(nn);
                self.regs.set(x, sum);
            }
            Move(x, y) => self.regs.set(x, self.regs.get(y)),
            Or(x, y) => self.regs.set(x, self.regs.get(x) | self.regs.get(y)),
            And(x, y) => self.regs.set(x, self.regs.get(x) & self.regs.get(y)),
            Xor(x, y) => self.regs.set(x, self.regs.get(x) ^ self.regs.get(y)),
            Add(x, y) => {
                let (sum, carry) = self.regs.get(x).overflowing_add(self.regs.get(y));
                self.regs.set_flag(carry);
                self.regs.set(x, sum);
            }
            Sub(x, y) => {
                let (diff, borrow) = self.regs.get(x).overflowing_sub(self.regs.get(y));
                // flag convention: 1 means the subtraction did NOT borrow
                self.regs.set_flag(!borrow);
                self.regs.set(x, diff);
            }
            ShiftRight(x) => {
                let vx = self.regs.get(x);
                self.regs.set_flag(vx & 0x01 != 0);
                self.regs.set(x, vx >> 1);
            }
            SubReversed(x, y) => {
                let (diff, borrow) = self.regs.get(y).overflowing_sub(self.regs.get(x));
                self.regs.set_flag(!borrow);
                self.regs.set(x, diff);
            }
            ShiftLeft(x) => {
                let vx = self.regs.get(x);
                self.regs.set_flag(vx & 0x80 != 0);
                self.regs.set(x, vx << 1);
            }
            SkipNeReg(x, y) => {
                if self.regs.get(x) != self.regs.get(y) {
                    next = pc.wrapping_add(4);
                }
            }
            LoadIndex(addr) => self.regs.i = addr,
            JumpOffset(addr) => next = addr.wrapping_add(self.regs.get(0x0) as u16),
            Random(x, nn) => {
                let byte: u8 = rand::thread_rng().gen();
                self.regs.set(x, byte & nn);
            }
            Draw(x, y, n) => {
                let mut rows = [0u8; 16];
                for row in 0..n as u16 {
                    rows[row as usize] = self.mem.read(self.regs.i.wrapping_add(row));
                }
                let collision =
                    self.fb
                        .draw_sprite(self.regs.get(x), self.regs.get(y), &rows[..n as usize]);
                self.regs.set_flag(collision);
            }
            SkipKeyPressed(x) => {
                if self.keypad.is_pressed(self.regs.get(x)) {
                    next = pc.wrapping_add(4);
                }
            }
            SkipKeyReleased(x) => {
                if !self.keypad.is_pressed(self.regs.get(x)) {
                    next = pc.wrapping_add(4);
                }
            }
            ReadDelay(x) => self.regs.set(x, self.delay.get()),
            WaitKey(x) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set(x, key),
                // nothing latched: hold pc and rescan on the next step
                None => next = pc,
            },
            SetDelay(x) => self.delay.set(self.regs.get(x)),
            SetSound(x) => self.sound.set(self.regs.get(x)),
            AddIndex(x) => {
                let sum = self.regs.i as u32 + self.regs.get(x) as u32;
                self.regs.set_flag(sum > 0xFFF);
                self.regs.i = sum as u16;
            }
            LoadGlyph(x) => self.regs.i = self.regs.get(x) as u16 * 5,
            StoreBcd(x) => {
                let value = self.regs.get(x);
                self.mem.write(self.regs.i, value / 100);
                self.mem.write(self.regs.i.wrapping_add(1), value / 10 % 10);
                self.mem.write(self.regs.i.wrapping_add(2), value % 10);
            }
            StoreRegisters(x) => {
                for r in 0..=x {
                    self.mem
                        .write(self.regs.i.wrapping_add(r as u16), self.regs.get(r));
                }
                self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
            }
            LoadRegisters(x) => {
                for r in 0..=x {
                    let byte = self.mem.read(self.regs.i.wrapping_add(r as u16));
                    self.regs.set(r, byte);
                }
                self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
            }
        }

        self.regs.pc = next;
        Ok(())
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
