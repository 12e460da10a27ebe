use std::fmt;

use crate::memory::TypeAddr;

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;

// V0 to VF, VF doubles as the carry/borrow/collision flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[reg_num as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let reg = &mut self.registers[reg_num as usize];
        *reg = reg.wrapping_add(value);
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG_REGISTER, flag as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[reg_num as usize]
    }

    pub fn as_array(&self) -> [u8; REGISTER_COUNT] {
        self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    /// Moves past one instruction.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

/// Copy of the register file for debug overlays and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub v: [u8; REGISTER_COUNT],
    pub index: TypeAddr,
    pub pc: TypeAddr,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl RegisterSnapshot {
    /// Looks a register up by its conventional name, e.g. `"VA"` or `"I"`.
    pub fn by_name(&self, name: &str) -> Option<u16> {
        match name {
            "I" => Some(self.index),
            "PC" => Some(self.pc),
            "DT" => Some(self.delay_timer as u16),
            "ST" => Some(self.sound_timer as u16),
            _ => {
                let digit = name.strip_prefix('V').filter(|d| d.len() == 1)?;
                let reg = u8::from_str_radix(digit, 16).ok()?;
                Some(self.v[reg as usize] as u16)
            }
        }
    }
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.v.iter().enumerate() {
            write!(f, "V{:X}={:02X} ", i, value)?;
        }
        write!(
            f,
            "I={:03X} PC={:03X} DT={:02X} ST={:02X}",
            self.index, self.pc, self.delay_timer, self.sound_timer
        )
    }
}
