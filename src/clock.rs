//! Frame timing.

use std::time::Instant;

/// Time slice handed to every update call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Seconds since the previous frame, already clamped by the scene.
    pub dt: f32,
    /// Milliseconds on the frame clock.
    pub now_ms: u64,
}

impl Frame {
    pub fn new(dt: f32, now_ms: u64) -> Self {
        Self { dt, now_ms }
    }
}

pub trait FrameClock {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;

    /// Seconds elapsed since the previous `delta` or `reset`.
    fn delta(&mut self) -> f32;

    /// Restart delta measurement, called on every scene change so the first
    /// frame of a stage doesn't see the dialogue time as one giant step.
    fn reset(&mut self);
}

pub struct SystemClock {
    origin: Instant,
    last_ms: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_ms: 0,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn delta(&mut self) -> f32 {
        let now = self.now_ms();
        let dt = now.saturating_sub(self.last_ms) as f32 / 1000.0;
        self.last_ms = now;
        dt
    }

    fn reset(&mut self) {
        self.last_ms = self.now_ms();
    }
}

/// Clock that only moves when told to. Used for scripted frame sequences.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    pub now_ms: u64,
    last_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn delta(&mut self) -> f32 {
        let dt = self.now_ms.saturating_sub(self.last_ms) as f32 / 1000.0;
        self.last_ms = self.now_ms;
        dt
    }

    fn reset(&mut self) {
        self.last_ms = self.now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_delta_and_reset() {
        let mut clock = ManualClock::new();
        clock.advance(250);
        assert!((clock.delta() - 0.25).abs() < 1e-6);
        clock.advance(4000);
        clock.reset();
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.now_ms(), 4250);
    }
}
