use crate::memory::Addr;

/// A raw 16-bit instruction word, fetched big-endian from two memory cells.
///
/// Operand fields live at fixed nibble positions:
///
/// ```text
/// 0xABCD
///   ^^^^
///   |||+-- n   low nibble
///   ||+--- y   second register selector
///   |+---- x   first register selector
///   +----- high nibble, selects the opcode family
///   nn  = low byte    (CD)
///   nnn = low 12 bits (BCD)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> Addr {
        self.0 & 0x0FFF
    }
}

/// One decoded instruction, ready to execute.
///
/// Register selectors are nibbles (0x0..=0xF), immediates are bytes,
/// addresses are 12-bit values carried in a `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0: blank the framebuffer
    ClearScreen,
    // 00EE: pop the return address into pc
    Return,
    // 1NNN: pc = nnn
    Jump(Addr),
    // 2NNN: push pc, then pc = nnn
    Call(Addr),
    // 3XNN: skip next instruction if vx == nn
    SkipEqImm(u8, u8),
    // 4XNN: skip next instruction if vx != nn
    SkipNeImm(u8, u8),
    // 5XY0: skip next instruction if vx == vy
    SkipEqReg(u8, u8),
    // 6XNN: vx = nn
    LoadImm(u8, u8),
    // 7XNN: vx += nn, carry dropped
    AddImm(u8, u8),
    // 8XY0: vx = vy
    Move(u8, u8),
    // 8XY1: vx |= vy
    Or(u8, u8),
    // 8XY2: vx &= vy
    And(u8, u8),
    // 8XY3: vx ^= vy
    Xor(u8, u8),
    // 8XY4: vx += vy, carry into vf
    Add(u8, u8),
    // 8XY5: vx -= vy, vf = 1 when no borrow
    Sub(u8, u8),
    // 8XY6: vf = lsb(vx), vx >>= 1
    ShiftRight(u8),
    // 8XY7: vx = vy - vx, vf = 1 when no borrow
    SubReversed(u8, u8),
    // 8XYE: vf = msb(vx), vx <<= 1
    ShiftLeft(u8),
    // 9XY0: skip next instruction if vx != vy
    SkipNeReg(u8, u8),
    // ANNN: i = nnn
    LoadIndex(Addr),
    // BNNN: pc = nnn + v0
    JumpOffset(Addr),
    // CXNN: vx = random byte & nn
    Random(u8, u8),
    // DXYN: xor an n-row sprite from memory[i..] at (vx, vy)
    Draw(u8, u8, u8),
    // EX9E: skip next instruction if key vx is down
    SkipKeyPressed(u8),
    // EXA1: skip next instruction if key vx is up
    SkipKeyReleased(u8),
    // FX07: vx = delay timer
    ReadDelay(u8),
    // FX0A: hold pc until any key is down, store it in vx
    WaitKey(u8),
    // FX15: delay timer = vx
    SetDelay(u8),
    // FX18: sound timer = vx
    SetSound(u8),
    // FX1E: i += vx, vf = 1 when the sum leaves 12 bits
    AddIndex(u8),
    // FX29: i = glyph address for digit vx
    LoadGlyph(u8),
    // FX33: memory[i..i+3] = decimal digits of vx
    StoreBcd(u8),
    // FX55: memory[i..=i+x] = v0..=vx, then i += x + 1
    StoreRegisters(u8),
    // FX65: v0..=vx = memory[i..=i+x], then i += x + 1
    LoadRegisters(u8),
}

impl Instruction {
    /// Decodes a raw opcode, or `None` when the word matches no recognized
    /// pattern.
    pub fn decode(op: Opcode) -> Option<Self> {
        let ins = match op.family() {
            0x0 => match op.0 {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                _ => return None,
            },
            0x1 => Self::Jump(op.nnn()),
            0x2 => Self::Call(op.nnn()),
            0x3 => Self::SkipEqImm(op.x(), op.nn()),
            0x4 => Self::SkipNeImm(op.x(), op.nn()),
            0x5 if op.n() == 0x0 => Self::SkipEqReg(op.x(), op.y()),
            0x6 => Self::LoadImm(op.x(), op.nn()),
            0x7 => Self::AddImm(op.x(), op.nn()),
            0x8 => match op.n() {
                0x0 => Self::Move(op.x(), op.y()),
                0x1 => Self::Or(op.x(), op.y()),
                0x2 => Self::And(op.x(), op.y()),
                0x3 => Self::Xor(op.x(), op.y()),
                0x4 => Self::Add(op.x(), op.y()),
                0x5 => Self::Sub(op.x(), op.y()),
                0x6 => Self::ShiftRight(op.x()),
                0x7 => Self::SubReversed(op.x(), op.y()),
                0xE => Self::ShiftLeft(op.x()),
                _ => return None,
            },
            0x9 if op.n() == 0x0 => Self::SkipNeReg(op.x(), op.y()),
            0xA => Self::LoadIndex(op.nnn()),
            0xB => Self::JumpOffset(op.nnn()),
            0xC => Self::Random(op.x(), op.nn()),
            0xD => Self::Draw(op.x(), op.y(), op.n()),
            0xE => match op.nn() {
                0x9E => Self::SkipKeyPressed(op.x()),
                0xA1 => Self::SkipKeyReleased(op.x()),
                _ => return None,
            },
            0xF => match op.nn() {
                0x07 => Self::ReadDelay(op.x()),
                0x0A => Self::WaitKey(op.x()),
                0x15 => Self::SetDelay(op.x()),
                0x18 => Self::SetSound(op.x()),
                0x1E => Self::AddIndex(op.x()),
                0x29 => Self::LoadGlyph(op.x()),
                0x33 => Self::StoreBcd(op.x()),
                0x55 => Self::StoreRegisters(op.x()),
                0x65 => Self::LoadRegisters(op.x()),
                _ => return None,
            },
            _ => return None,
        };
        Some(ins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_extraction() {
        let op = Opcode(0x4CEE);
        assert_eq!(op.family(), 0x4);
        assert_eq!(op.x(), 0xC);
        assert_eq!(op.y(), 0xE);
        assert_eq!(op.n(), 0xE);
        assert_eq!(op.nn(), 0xEE);
        assert_eq!(op.nnn(), 0xCEE);
    }

    #[test]
    fn decodes_every_recognized_form() {
        let cases = [
            (0x00E0, Instruction::ClearScreen),
            (0x00EE, Instruction::Return),
            (0x1ABC, Instruction::Jump(0xABC)),
            (0x2456, Instruction::Call(0x456)),
            (0x342A, Instruction::SkipEqImm(0x4, 0x2A)),
            (0x4A75, Instruction::SkipNeImm(0xA, 0x75)),
            (0x5AE0, Instruction::SkipEqReg(0xA, 0xE)),
            (0x63F5, Instruction::LoadImm(0x3, 0xF5)),
            (0x7B12, Instruction::AddImm(0xB, 0x12)),
            (0x8590, Instruction::Move(0x5, 0x9)),
            (0x8101, Instruction::Or(0x1, 0x0)),
            (0x8642, Instruction::And(0x6, 0x4)),
            (0x87F3, Instruction::Xor(0x7, 0xF)),
            (0x8264, Instruction::Add(0x2, 0x6)),
            (0x8C45, Instruction::Sub(0xC, 0x4)),
            (0x8106, Instruction::ShiftRight(0x1)),
            (0x86D7, Instruction::SubReversed(0x6, 0xD)),
            (0x8E0E, Instruction::ShiftLeft(0xE)),
            (0x9990, Instruction::SkipNeReg(0x9, 0x9)),
            (0xA568, Instruction::LoadIndex(0x568)),
            (0xBABC, Instruction::JumpOffset(0xABC)),
            (0xC5AF, Instruction::Random(0x5, 0xAF)),
            (0xD7B4, Instruction::Draw(0x7, 0xB, 0x4)),
            (0xE49E, Instruction::SkipKeyPressed(0x4)),
            (0xECA1, Instruction::SkipKeyReleased(0xC)),
            (0xF907, Instruction::ReadDelay(0x9)),
            (0xFD0A, Instruction::WaitKey(0xD)),
            (0xF315, Instruction::SetDelay(0x3)),
            (0xF718, Instruction::SetSound(0x7)),
            (0xF91E, Instruction::AddIndex(0x9)),
            (0xFF29, Instruction::LoadGlyph(0xF)),
            (0xF533, Instruction::StoreBcd(0x5)),
            (0xF655, Instruction::StoreRegisters(0x6)),
            (0xF265, Instruction::LoadRegisters(0x2)),
        ];
        for (raw, expected) in cases {
            assert_eq!(Instruction::decode(Opcode(raw)), Some(expected), "{raw:#06X}");
        }
    }

    #[test]
    fn rejects_unrecognized_words() {
        for raw in [0x0000, 0x00FF, 0x5AB1, 0x8AB8, 0x9AB5, 0xE4FF, 0xF4FF] {
            assert_eq!(Instruction::decode(Opcode(raw)), None, "{raw:#06X}");
        }
    }
}
