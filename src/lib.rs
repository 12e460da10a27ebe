//! CHIP-8 virtual machine core.
//!
//! 16 8-bit data registers named V0 to VF, a 16-bit index register I, 4K of memory with the
//! hex font at 0x000 and programs at 0x200, a 64x32 XOR framebuffer, a 16-key hex keypad and
//! delay/sound timers counting down at 60 Hz.
//!
//! Opcodes are 2 bytes, big-endian:
//!      NNN: address
//!      NN: 8-bit constant
//!      N: 4-bit constant
//!      X and Y: 4-bit register identifier
//!
//! ```
//! use chip8vm::Emulator;
//!
//! // V0 = 5, V1 = 3, V0 += V1
//! let mut emu = Emulator::init(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]).unwrap();
//! for _ in 0..3 {
//!     emu.execute_one().unwrap();
//! }
//! assert_eq!(emu.snapshot_registers().v[0], 8);
//! ```
//!
//! Windowing, input polling and pacing live in the `chip8vm` binary (`frontend` feature).

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use decode::OpCodes;
pub use display::{FrameBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use emulator::{Diagnostic, Emulator, MAX_STACK_DEPTH};
pub use error::EmuError;
pub use keyboard::{Keyboard, KEYPAD_LAYOUT};
pub use memory::{Memory, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
pub use registers::RegisterSnapshot;
pub use timer::TIMER_TICKS_PER_SECOND;
