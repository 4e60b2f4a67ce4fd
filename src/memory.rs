use crate::decode::Opcode;
use crate::error::VmError;

/// A 12-bit RAM address carried in a `u16`.
pub type Addr = u16;

pub const RAM_SIZE: usize = 4096;
/// Programs load here; below this the interpreter keeps its glyph sheet.
pub const PROG_START: usize = 0x200;
pub const MAX_ROM_SIZE: usize = RAM_SIZE - PROG_START;

/// 4x5 pixel glyphs for the hexadecimal digits, 5 bytes each, kept at
/// 0x000..0x050 so FX29 can find digit `d` at `d * 5`.
const GLYPHS: [u8; 5 * 16] = [
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

/// The machine's 4096 bytes of RAM.
///
/// Every access is masked to 12 bits, so index-register arithmetic that
/// runs past 0xFFF wraps instead of faulting.
pub struct Memory {
    bytes: [u8; RAM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self { bytes: [0; RAM_SIZE] };
        mem.bytes[..GLYPHS.len()].copy_from_slice(&GLYPHS);
        mem
    }

    /// Rezeroes RAM and restores the glyph sheet.
    pub fn reset(&mut self) {
        self.bytes = [0; RAM_SIZE];
        self.bytes[..GLYPHS.len()].copy_from_slice(&GLYPHS);
    }

    pub fn read(&self, addr: Addr) -> u8 {
        self.bytes[(addr & 0x0FFF) as usize]
    }

    pub fn write(&mut self, addr: Addr, val: u8) {
        self.bytes[(addr & 0x0FFF) as usize] = val;
    }

    /// The big-endian instruction word at `addr`.
    pub fn opcode_at(&self, addr: Addr) -> Opcode {
        Opcode((self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16)
    }

    /// Copies a ROM image to 0x200. Rejects oversized images before
    /// touching RAM.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), VmError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(VmError::LoadOverflow { size: rom.len() });
        }
        self.bytes[PROG_START..PROG_START + rom.len()].copy_from_slice(rom);
        Ok(())
    }
}

pub const STACK_DEPTH: usize = 16;

/// The 16-entry return-address stack.
///
/// Depth faults trap with an error instead of clamping; the failing call
/// or return applies no effects.
pub struct Stack {
    slots: [Addr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self { slots: [0; STACK_DEPTH], sp: 0 }
    }

    pub fn reset(&mut self) {
        self.slots = [0; STACK_DEPTH];
        self.sp = 0;
    }

    pub fn push(&mut self, addr: Addr) -> Result<(), VmError> {
        if self.sp == STACK_DEPTH {
            return Err(VmError::StackOverflow);
        }
        self.slots[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Addr, VmError> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp])
    }
}
