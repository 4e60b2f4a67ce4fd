/// An 8-bit countdown counter.
///
/// Ticked once per executed instruction; the driver's steps-per-frame
/// cadence determines the wall-clock decay rate. Never counts below zero.
#[derive(Debug, Default)]
pub struct Timer {
    count: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    /// Counts down one step. Returns true exactly when the counter
    /// reaches zero from a positive value.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_at_zero() {
        let mut timer = Timer::new();
        assert!(!timer.tick());
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn signals_only_the_tick_that_reaches_zero() {
        let mut timer = Timer::new();
        timer.set(2);
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(!timer.tick());
    }
}
