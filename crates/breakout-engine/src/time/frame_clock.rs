use std::time::{Duration, Instant};

/// Simulation step of the default clock (60 Hz).
pub const DEFAULT_STEP: Duration = Duration::from_nanos(16_666_667);

/// Longest frame the default clock will account for.
pub const DEFAULT_FRAME_CLAMP: Duration = Duration::from_millis(250);

/// Result of one clock tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Number of fixed steps to simulate this frame. May be zero.
    pub steps: u32,

    /// Fixed step length in seconds.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Fixed-timestep accumulator.
///
/// Elapsed wall time is clamped to `max_frame` so a stall (debugger, minimized
/// window) does not turn into a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    accumulator: Duration,
    step: Duration,
    max_frame: Duration,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP, DEFAULT_FRAME_CLAMP)
    }

    pub fn with_step(step: Duration, max_frame: Duration) -> Self {
        debug_assert!(!step.is_zero());
        debug_assert!(step <= max_frame);
        Self {
            last: Instant::now(),
            accumulator: Duration::ZERO,
            step,
            max_frame,
            frame_index: 0,
        }
    }

    /// Measures wall time since the previous tick and advances by it.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(elapsed)
    }

    /// Advances by an explicit `elapsed` duration.
    pub fn advance(&mut self, elapsed: Duration) -> FrameTime {
        self.accumulator += elapsed.min(self.max_frame);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }

        let ft = FrameTime {
            steps,
            dt: self.step.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FrameClock {
        FrameClock::with_step(Duration::from_millis(10), Duration::from_millis(250))
    }

    #[test]
    fn whole_steps_are_consumed() {
        let mut c = clock();
        let ft = c.advance(Duration::from_millis(35));
        assert_eq!(ft.steps, 3);
        assert!((ft.dt - 0.01).abs() < 1e-7);
        // 5 ms carried over.
        assert_eq!(c.advance(Duration::from_millis(5)).steps, 1);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut c = clock();
        assert_eq!(c.advance(Duration::from_millis(4)).steps, 0);
        assert_eq!(c.advance(Duration::from_millis(4)).steps, 0);
        assert_eq!(c.advance(Duration::from_millis(4)).steps, 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut c = clock();
        assert_eq!(c.advance(Duration::from_secs(5)).steps, 25);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut c = clock();
        assert_eq!(c.advance(Duration::ZERO).frame_index, 0);
        assert_eq!(c.advance(Duration::ZERO).frame_index, 1);
        assert_eq!(c.tick().frame_index, 2);
    }

    #[test]
    fn default_step_is_sixty_hz() {
        let c = FrameClock::default();
        assert!((c.step.as_secs_f32() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(c.max_frame, Duration::from_millis(250));
    }
}
