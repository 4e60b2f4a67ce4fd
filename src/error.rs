/// Everything that can go wrong inside the virtual machine.
///
/// None of these are fatal to the machine itself: the failing operation
/// applies no effects (except `UnknownOpcode`, which skips the bad word)
/// and the caller decides whether to keep stepping.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("ROM is too large ({size} bytes), max size is 3584 bytes")]
    LoadOverflow { size: usize },

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("call stack overflow: more than 16 nested subroutine calls")]
    StackOverflow,

    #[error("call stack underflow: return without a matching call")]
    StackUnderflow,

    #[error("no such key {0:#X}, the keypad has slots 0x0..=0xF")]
    InvalidKey(u8),
}
