/// How often the run loop is expected to call `tick`.
pub const TIMER_TICKS_PER_SECOND: u64 = 60;

/// 8-bit countdown register. Counts down once per tick until 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Returns whether the timer moved.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_down_to_zero() {
        let mut timer = Timer::new(2);
        assert!(timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.count, 0);
        assert!(!timer.tick());
        assert_eq!(timer.count, 0);
        assert!(!timer.is_active());
    }
}
