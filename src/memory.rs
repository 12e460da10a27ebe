use log::{info, trace};

use crate::error::EmuError;
use crate::registers::{IndexRegister, RegisterSnapshot, Registers};
use crate::timer::Timer;

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; FONT_GLYPH_SIZE * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_SIZE: usize = 5;

const DEFAULT_FONT: FontBytes = [
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

/// The memory unit: address space, data registers, index register and both timers.
///
/// Layout:
/// - `0x000..0x050` hex font, 5 bytes per glyph
/// - `0x200..0x1000` program
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    pub regs: Registers,
    pub index: IndexRegister,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);

        Self {
            bytes,
            regs: Registers::new(),
            index: IndexRegister::default(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
        }
    }

    fn check(addr: usize) -> Result<usize, EmuError> {
        if addr < MEMORY_SIZE {
            Ok(addr)
        } else {
            Err(EmuError::OutOfBounds { address: addr })
        }
    }

    pub fn read(&self, addr: TypeAddr) -> Result<u8, EmuError> {
        let addr = Self::check(addr as usize)?;
        Ok(self.bytes[addr])
    }

    pub fn write(&mut self, addr: TypeAddr, val: u8) -> Result<(), EmuError> {
        let addr = Self::check(addr as usize)?;
        self.bytes[addr] = val;
        Ok(())
    }

    /// `len` bytes starting at `addr`. The whole range has to fit in memory.
    pub fn read_slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8], EmuError> {
        let start = addr as usize;
        if len > 0 {
            Self::check(start + len - 1)?;
        }
        Self::check(start)?;
        Ok(&self.bytes[start..start + len])
    }

    /// Big-endian word at `addr`, `addr + 1`.
    pub fn read_word(&self, addr: TypeAddr) -> Result<u16, EmuError> {
        let word = self.read_slice(addr, 2)?;
        Ok(((word[0] as u16) << 8) | word[1] as u16)
    }

    pub fn read_register(&self, reg: u8) -> u8 {
        self.regs.get(reg)
    }

    pub fn write_register(&mut self, reg: u8, val: u8) {
        self.regs.set_register(reg, val);
    }

    pub fn read_index(&self) -> TypeAddr {
        self.index.0
    }

    pub fn write_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    /// Copies the program in at `PROGRAM_START`.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), EmuError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(EmuError::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        info!("Loaded ROM [size: {} bytes, free: {}]", rom.len(), MAX_ROM_SIZE - rom.len());
        Ok(())
    }

    pub fn tick_delay(&mut self) {
        if self.delay_timer.tick() {
            trace!("delay timer -> {}", self.delay_timer.count);
        }
    }

    pub fn tick_sound(&mut self) {
        if self.sound_timer.tick() {
            trace!("sound timer -> {}", self.sound_timer.count);
        }
    }

    pub fn snapshot(&self, pc: TypeAddr) -> RegisterSnapshot {
        RegisterSnapshot {
            v: self.regs.as_array(),
            index: self.index.0,
            pc,
            delay_timer: self.delay_timer.count,
            sound_timer: self.sound_timer.count,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_except_font() {
        let mem = Memory::new();
        assert_eq!(mem.bytes[..80], DEFAULT_FONT);
        assert!(mem.bytes[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_font_glyph_for_zero() {
        let mem = Memory::new();
        assert_eq!(mem.read_slice(0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
    }

    #[test]
    fn test_read_write_bounds() {
        let mut mem = Memory::new();
        mem.write(0xFFF, 0xAB).unwrap();
        assert_eq!(mem.read(0xFFF), Ok(0xAB));
        assert_eq!(
            mem.read(0x1000),
            Err(EmuError::OutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            mem.write(0x1000, 0),
            Err(EmuError::OutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn test_read_slice_past_end() {
        let mem = Memory::new();
        assert!(mem.read_slice(0xFFE, 2).is_ok());
        assert_eq!(
            mem.read_slice(0xFFE, 3),
            Err(EmuError::OutOfBounds { address: 0x1000 })
        );
        assert_eq!(mem.read_slice(0xFFF, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_read_word_big_endian() {
        let mut mem = Memory::new();
        mem.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(mem.read_word(0x200), Ok(0xAABB));
        assert!(mem.read_word(0xFFF).is_err());
    }

    #[test]
    fn test_load_rom_at_program_start() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x00, 0xE0]).unwrap();
        assert_eq!(mem.read_slice(0x200, 2).unwrap(), &[0x00, 0xE0]);
    }

    #[test]
    fn test_load_rom_size_limit() {
        let mut mem = Memory::new();
        let rom = vec![0x12; MAX_ROM_SIZE];
        assert!(mem.load_rom(&rom).is_ok());
        assert_eq!(mem.read(0xFFF), Ok(0x12));

        let rom = vec![0x12; MAX_ROM_SIZE + 1];
        assert_eq!(
            mem.load_rom(&rom),
            Err(EmuError::RomTooLarge {
                size: MAX_ROM_SIZE + 1,
                max_size: MAX_ROM_SIZE
            })
        );
    }

    #[test]
    fn test_index_is_not_masked() {
        let mut mem = Memory::new();
        mem.write_index(0xFFFF);
        assert_eq!(mem.read_index(), 0xFFFF);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut mem = Memory::new();
        mem.delay_timer.set(1);
        mem.sound_timer.set(3);
        mem.tick_delay();
        mem.tick_sound();
        mem.tick_delay();
        assert_eq!(mem.delay_timer.count, 0);
        assert_eq!(mem.sound_timer.count, 2);
    }
}
