use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use log::{debug, error, info};
use minifb::{Key, Scale, Window, WindowOptions};

use chip8vm::{Emulator, DISPLAY_HEIGHT, DISPLAY_WIDTH};

use crate::Args;

pub struct Frontend {
    window: Window,
    pixel_buffer: Vec<u32>,
    instructions_per_frame: u32,
    dump_registers: bool,
}

impl Frontend {
    pub fn new(args: &Args, title: &str) -> Result<Self> {
        let mut window = Window::new(
            &format!("{title} - ESC to exit"),
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
            WindowOptions {
                scale: scale_from_factor(args.scale)?,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("unable to open window: {e}"))?;
        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / args.fps as u64)));

        Ok(Self {
            window,
            pixel_buffer: vec![OFF; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            instructions_per_frame: (args.ips / args.fps).max(1),
            dump_registers: args.dump_registers,
        })
    }

    fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Drives the emulator until the window closes. A fatal fault stops execution but the
    /// window stays up showing the last frame.
    pub fn run(&mut self, emu: &mut Emulator) -> Result<()> {
        info!(
            "Running [{} instructions per frame]",
            self.instructions_per_frame
        );
        let mut faulted = false;

        while self.is_running() {
            self.forward_keys(emu);

            if !faulted {
                for _ in 0..self.instructions_per_frame {
                    if let Err(err) = emu.execute_one() {
                        error!("Emulation stopped at {:03X}: {err}", emu.program_counter());
                        faulted = true;
                        break;
                    }
                }
                emu.tick();
            }

            if self.dump_registers {
                debug!("{}", emu.snapshot_registers());
            }
            self.sync_display(emu)?;
        }
        Ok(())
    }

    fn forward_keys(&self, emu: &mut Emulator) {
        let down = self.window.get_keys();
        for (key, num) in KEYMAP {
            emu.inject_key_event(num, down.contains(&key));
        }
    }

    fn sync_display(&mut self, emu: &Emulator) -> Result<()> {
        self.pixel_buffer.fill(OFF);
        for (x, y) in emu.frame_buffer().iter_set_pixels() {
            self.pixel_buffer[y * DISPLAY_WIDTH + x] = ON;
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, DISPLAY_WIDTH, DISPLAY_HEIGHT)
            .map_err(|e| anyhow!("unable to draw frame: {e}"))
    }
}

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

const OFF: u32 = from_u8_rgb(0, 0, 0);
const ON: u32 = from_u8_rgb(0, 127, 255);

/// QWERTY left block onto the hex keypad.
/// ```text
/// |1|2|3|4|      |1|2|3|C|
/// |Q|W|E|R|  ->  |4|5|6|D|
/// |A|S|D|F|  ->  |7|8|9|E|
/// |Z|X|C|V|      |A|0|B|F|
/// ```
const KEYMAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

fn scale_from_factor(factor: u32) -> Result<Scale> {
    Ok(match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        16 => Scale::X16,
        32 => Scale::X32,
        other => bail!("unsupported scale factor {other}, expected 1, 2, 4, 8, 16 or 32"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8vm::KEYPAD_LAYOUT;

    #[test]
    fn test_keymap_follows_keypad_layout() {
        // the QWERTY block is laid out row by row like the keypad
        let nums: Vec<u8> = KEYMAP.iter().map(|(_, num)| *num).collect();
        let layout: Vec<u8> = KEYPAD_LAYOUT.iter().flatten().copied().collect();
        assert_eq!(nums, layout);
    }

    #[test]
    fn test_scale_factor() {
        assert!(matches!(scale_from_factor(16), Ok(Scale::X16)));
        assert!(scale_from_factor(3).is_err());
    }
}
