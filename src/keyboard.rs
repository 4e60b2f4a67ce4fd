use minifb::Key;

use crate::error::VmError;

/// The 16-key hexadecimal keypad latch.
///
/// Written only by the input collaborator via `set`; the interpreter just
/// reads whatever was latched before the current step.
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
    }

    pub fn set(&mut self, key: u8, pressed: bool) -> Result<(), VmError> {
        if key > 0xF {
            return Err(VmError::InvalidKey(key));
        }
        self.keys[key as usize] = pressed;
        Ok(())
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// The lowest-numbered key currently held, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        (0..16u8).find(|&k| self.keys[k as usize])
    }
}

/// Host keyboard layout for the driver, indexed by logical key 0x0..=0xF.
///
/// The original hex pad maps onto the left four columns:
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|      |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub const HOST_LAYOUT: [Key; 16] = [
    Key::X,    // 0
    Key::Key1, // 1
    Key::Key2, // 2
    Key::Key3, // 3
    Key::Q,    // 4
    Key::W,    // 5
    Key::E,    // 6
    Key::A,    // 7
    Key::S,    // 8
    Key::D,    // 9
    Key::Z,    // A
    Key::C,    // B
    Key::Key4, // C
    Key::R,    // D
    Key::F,    // E
    Key::V,    // F
];
