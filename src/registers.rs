use crate::memory::{Addr, PROG_START};

/// The register file: sixteen 8-bit general registers, the 16-bit index
/// register `i`, and the program counter.
///
/// VF doubles as the arithmetic flag register and is clobbered by the
/// carry/borrow/shift/collision ops.
pub struct Registers {
    v: [u8; 16],
    pub i: Addr,
    pub pc: Addr,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            v: [0; 16],
            i: 0,
            pc: PROG_START as Addr,
        }
    }

    pub fn reset(&mut self) {
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROG_START as Addr;
    }

    pub fn get(&self, x: u8) -> u8 {
        self.v[x as usize]
    }

    pub fn set(&mut self, x: u8, val: u8) {
        self.v[x as usize] = val;
    }

    /// Writes the VF flag register as 0 or 1.
    pub fn set_flag(&mut self, flag: bool) {
        self.v[0xF] = flag as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_program_start() {
        let regs = Registers::new();
        assert_eq!(regs.pc, 0x200);
        assert_eq!(regs.i, 0);
        assert_eq!(regs.get(0xF), 0);
    }

    #[test]
    fn reset_is_replayable() {
        let mut regs = Registers::new();
        regs.set(0x3, 0xAB);
        regs.set_flag(true);
        regs.i = 0x123;
        regs.pc = 0x456;
        regs.reset();
        assert_eq!(regs.get(0x3), 0);
        assert_eq!(regs.get(0xF), 0);
        assert_eq!(regs.i, 0);
        assert_eq!(regs.pc, 0x200);
    }
}
