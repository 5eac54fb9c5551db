use std::time::Duration;

use strum_macros::EnumIter;

/// Which half of the frame pair we are on.
/// Alternates every step and drives the horizontal mirroring of
/// neighborhood sampling, so the fixed diagonal check order does not
/// accumulate a sideways drift over many steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum FrameParity {
    #[default]
    Even,
    Odd,
}

impl FrameParity {
    /// The parity of a frame counter
    pub fn from_frame(frame: u32) -> Self {
        if frame % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// The factor applied to the x component of neighborhood offsets.
    /// Even frames sample left-priority, odd frames right-priority.
    pub fn mirror_factor(&self) -> isize {
        match self {
            Self::Even => 1,
            Self::Odd => -1,
        }
    }

    /// The other parity
    pub fn flipped(&self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

/// A clock for the simulation driver
#[derive(Debug, Default, Clone, Copy)]
pub struct Clock {
    elapsed: Duration,
    last_delta: Duration,
    frame: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_current_time(&self) -> Duration {
        self.elapsed
    }
    pub fn get_last_delta(&self) -> Duration {
        self.last_delta
    }
    pub fn get_current_frame(&self) -> u32 {
        self.frame
    }
    pub fn frame_parity(&self) -> FrameParity {
        FrameParity::from_frame(self.frame)
    }
    /// Advance one frame by the given elapsed real time
    pub fn update(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.last_delta = delta;
        self.frame = self.frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_advances_time_and_frame() {
        let mut clock = Clock::new();
        assert_eq!(clock.get_current_frame(), 0);
        assert_eq!(clock.frame_parity(), FrameParity::Even);

        clock.update(Duration::from_millis(100));
        assert_eq!(clock.get_current_time(), Duration::from_millis(100));
        assert_eq!(clock.get_last_delta(), Duration::from_millis(100));
        assert_eq!(clock.get_current_frame(), 1);
        assert_eq!(clock.frame_parity(), FrameParity::Odd);

        clock.update(Duration::from_millis(50));
        assert_eq!(clock.get_current_time(), Duration::from_millis(150));
        assert_eq!(clock.get_last_delta(), Duration::from_millis(50));
        assert_eq!(clock.frame_parity(), FrameParity::Even);
    }

    #[test]
    fn test_mirror_factor_alternates() {
        assert_eq!(FrameParity::from_frame(0).mirror_factor(), 1);
        assert_eq!(FrameParity::from_frame(1).mirror_factor(), -1);
        assert_eq!(FrameParity::from_frame(2).mirror_factor(), 1);
        assert_eq!(FrameParity::Even.flipped(), FrameParity::Odd);
    }
}
