use log::{debug, info, trace, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::{
    decode::{OpCodes, RawInstruction},
    display::FrameBuffer,
    error::EmuError,
    keyboard::Keyboard,
    memory::{Memory, TypeAddr, FONT_GLYPH_SIZE, FONT_START, PROGRAM_START},
    registers::{ProgramCounter, RegisterSnapshot},
};


/// Deepest subroutine nesting before `2NNN` faults.
pub const MAX_STACK_DEPTH: usize = 16;

/// Highest address FX1E leaves in the index register without reporting overflow.
const INDEX_LIMIT: u32 = 0xFFF;

/// What happened during one `execute_one` call that made progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Address the instruction was fetched from.
    pub pc: TypeAddr,
    pub raw: u16,
    /// `None` when the raw word did not decode.
    pub instruction: Option<OpCodes>,
    /// Non-fatal problem, currently only `UnknownOpcode`.
    pub error: Option<EmuError>,
}

/// The interpreter. Owns every piece of machine state for one session.
///
/// The run loop is expected to call `execute_one` at its instruction rate, `tick` at 60 Hz and
/// read `frame_buffer` whenever it redraws.
pub struct Emulator<R = ThreadRng> {
    fb: FrameBuffer,
    mem: Memory,
    keyboard: Keyboard,
    pc: ProgramCounter,
    stack: Vec<TypeAddr>,
    // destination register of a pending FX0A
    awaiting_key: Option<u8>,
    rng: R,
}

impl Emulator<ThreadRng> {
    /// Fresh machine with `rom` loaded and a thread-local random source for CXNN.
    pub fn init(rom: &[u8]) -> Result<Self, EmuError> {
        Self::with_rng(rom, rand::thread_rng())
    }
}

impl<R: Rng> Emulator<R> {
    pub fn with_rng(rom: &[u8], rng: R) -> Result<Self, EmuError> {
        let mut mem = Memory::new();
        mem.load_rom(rom)?;
        info!("Session ready [pc: {:#05X}]", PROGRAM_START);

        Ok(Self {
            fb: FrameBuffer::new(),
            mem,
            keyboard: Keyboard::new(),
            pc: ProgramCounter(PROGRAM_START),
            stack: Vec::with_capacity(MAX_STACK_DEPTH),
            awaiting_key: None,
            rng,
        })
    }

    /// Runs a single instruction.
    ///
    /// Returns `Ok(None)` while blocked on FX0A with nothing pressed and on the call that
    /// delivers the key. Fatal faults come back as `Err`; the program counter has already
    /// moved past the faulting instruction by then.
    pub fn execute_one(&mut self) -> Result<Option<Diagnostic>, EmuError> {
        if let Some(vx) = self.awaiting_key {
            if let Some(key) = self.keyboard.poll_any_pressed() {
                debug!("Key {key:X} -> V{vx:X}, resuming");
                self.mem.write_register(vx, key);
                self.awaiting_key = None;
            }
            return Ok(None);
        }

        let pc = self.pc.0;
        let raw = self.fetch()?;
        match OpCodes::decode_raw(raw.code()) {
            Ok(ins) => {
                debug!("{pc:03X}: {:04X} {ins:?}", raw.code());
                self.execute_ins(ins)?;
                Ok(Some(Diagnostic {
                    pc,
                    raw: raw.code(),
                    instruction: Some(ins),
                    error: None,
                }))
            }
            Err(err) => {
                warn!("{pc:03X}: {err}, skipping");
                Ok(Some(Diagnostic {
                    pc,
                    raw: raw.code(),
                    instruction: None,
                    error: Some(err),
                }))
            }
        }
    }

    fn fetch(&mut self) -> Result<RawInstruction, EmuError> {
        let word = self.mem.read_word(self.pc.0)?;
        self.pc.increment();
        Ok(RawInstruction::new(word))
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc.increment();
        }
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<(), EmuError> {
        let regs = &mut self.mem.regs;
        match ins {
            OpCodes::ClearScreen => self.fb.clear_buffer(),
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop().ok_or(EmuError::StackUnderflow)?;
                self.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => self.pc.set_addr(addr),
            OpCodes::PushSubroutine(addr) => {
                if self.stack.len() >= MAX_STACK_DEPTH {
                    return Err(EmuError::StackOverflow {
                        target: addr,
                        depth: MAX_STACK_DEPTH,
                    });
                }
                // pc already points past the call
                self.stack.push(self.pc.0);
                self.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                let hit = regs.get(vx) == nn;
                self.skip_if(hit);
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                let hit = regs.get(vx) != nn;
                self.skip_if(hit);
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                let hit = regs.get(vx) == regs.get(vy);
                self.skip_if(hit);
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                let hit = regs.get(vx) != regs.get(vy);
                self.skip_if(hit);
            }
            OpCodes::SetRegister(vx, nn) => regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => regs.add_to_register(vx, nn),
            OpCodes::CopyRegister(vx, vy) => regs.set_register(vx, regs.get(vy)),
            OpCodes::Or(vx, vy) => regs.set_register(vx, regs.get(vx) | regs.get(vy)),
            OpCodes::And(vx, vy) => regs.set_register(vx, regs.get(vx) & regs.get(vy)),
            OpCodes::XOr(vx, vy) => regs.set_register(vx, regs.get(vx) ^ regs.get(vy)),
            // flag is written after the result so VF as a destination ends up holding the flag
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = regs.get(vx).overflowing_add(regs.get(vy));
                regs.set_register(vx, sum);
                regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (regs.get(vx), regs.get(vy));
                regs.set_register(vx, x.wrapping_sub(y));
                regs.set_flag(x >= y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (regs.get(vx), regs.get(vy));
                regs.set_register(vx, y.wrapping_sub(x));
                regs.set_flag(y >= x);
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = regs.get(vx);
                regs.set_register(vx, vx_value >> 1);
                regs.set_register(0xF, vx_value & 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = regs.get(vx);
                regs.set_register(vx, vx_value << 1);
                regs.set_register(0xF, (vx_value >> 7) & 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.write_index(addr),
            OpCodes::JumpWithOffset(addr) => {
                let target = addr + regs.get(0) as u16;
                self.pc.set_addr(target);
            }
            OpCodes::Random(vx, nn) => {
                let byte: u8 = self.rng.gen();
                regs.set_register(vx, nn & byte);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (regs.get(reg_x), regs.get(reg_y));
                let sprite = self.mem.read_slice(self.mem.read_index(), height as usize)?;
                let flipped = self.fb.paint(x, y, sprite);
                self.mem.regs.set_flag(flipped);
            }
            OpCodes::SkipIfPressed(vx) => {
                let hit = self.keyboard.is_pressed(regs.get(vx));
                self.skip_if(hit);
            }
            OpCodes::SkipIfNotPressed(vx) => {
                let hit = !self.keyboard.is_pressed(regs.get(vx));
                self.skip_if(hit);
            }
            OpCodes::CopyDelayToRegister(vx) => {
                regs.set_register(vx, self.mem.delay_timer.count);
            }
            OpCodes::GetKey(vx) => {
                debug!("Waiting for a key -> V{vx:X}");
                self.awaiting_key = Some(vx);
            }
            OpCodes::CopyRegisterToDelay(vx) => {
                let value = regs.get(vx);
                self.mem.delay_timer.set(value);
            }
            OpCodes::CopyRegisterToSound(vx) => {
                let value = regs.get(vx);
                self.mem.sound_timer.set(value);
            }
            OpCodes::AddToIndex(vx) => {
                let offset = regs.get(vx) as u32;
                let sum = self.mem.read_index() as u32 + offset;
                self.mem.write_index((sum & INDEX_LIMIT) as u16);
                self.mem.regs.set_flag(sum > INDEX_LIMIT);
            }
            OpCodes::PointChar(vx) => {
                let glyph = regs.get(vx) as u16 * FONT_GLYPH_SIZE as u16;
                self.mem.write_index(FONT_START + glyph);
            }
            OpCodes::ToDecimal(vx) => {
                let value = regs.get(vx);
                let index = self.mem.read_index();
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (offset, digit) in (0..).zip(digits) {
                    self.mem.write(index.wrapping_add(offset), digit)?;
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let index = self.mem.read_index();
                for reg in 0..=vx {
                    let reg_val = self.mem.read_register(reg);
                    self.mem.write(index.wrapping_add(reg as u16), reg_val)?;
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let index = self.mem.read_index();
                for reg in 0..=vx {
                    let reg_val = self.mem.read(index.wrapping_add(reg as u16))?;
                    self.mem.write_register(reg, reg_val);
                }
            }
        }
        Ok(())
    }

    /// One 60 Hz frame worth of timer countdown.
    pub fn tick(&mut self) {
        trace!("tick");
        self.mem.tick_delay();
        self.mem.tick_sound();
    }

    pub fn inject_key_event(&mut self, key: u8, pressed: bool) {
        trace!("Key {key:X} {}", if pressed { "down" } else { "up" });
        self.keyboard.set(key, pressed);
    }

    pub fn is_halted(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn snapshot_registers(&self) -> RegisterSnapshot {
        self.mem.snapshot(self.pc.0)
    }

    pub fn program_counter(&self) -> TypeAddr {
        self.pc.0
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Whether the buzzer would be sounding.
    pub fn sound_active(&self) -> bool {
        self.mem.sound_timer.is_active()
    }
}
