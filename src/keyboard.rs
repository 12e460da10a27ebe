pub const KEY_COUNT: usize = 16;

/// The COSMAC VIP hex keypad, row by row as it appears on the device.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub const KEYPAD_LAYOUT: [[u8; 4]; 4] = [
    [0x1, 0x2, 0x3, 0xC],
    [0x4, 0x5, 0x6, 0xD],
    [0x7, 0x8, 0x9, 0xE],
    [0xA, 0x0, 0xB, 0xF],
];

/// Pressed state of the 16 logical keys. Knows nothing about physical keyboards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn press(&mut self, key: u8) {
        self.keys[Self::slot(key)] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[Self::slot(key)] = false;
    }

    pub fn set(&mut self, key: u8, pressed: bool) {
        self.keys[Self::slot(key)] = pressed;
    }

    /// Programs may ask about any register value; only the low nibble names a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[Self::slot(key)]
    }

    /// Lowest pressed key, if any.
    pub fn poll_any_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|k| k as u8)
    }

    fn slot(key: u8) -> usize {
        (key & 0xF) as usize
    }
}
