/// Fixed substep schedule: every rendered frame integrates `count` steps of `dt`.
/// Decoupling the step size from the frame rate keeps joints stable no matter
/// how fast the host renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Substeps {
    /// Duration of one substep in seconds.
    dt: f32,
    /// Substeps per rendered frame.
    count: u32,
}

impl Substeps {
    pub fn new(dt: f32, count: u32) -> Self {
        Self {
            dt,
            count: count.max(1),
        }
    }

    /// The fixed delta time of one substep.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Number of substeps per frame.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Simulated seconds covered by one frame.
    pub fn frame_time(&self) -> f32 {
        self.dt * self.count as f32
    }
}

impl Default for Substeps {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 10)
    }
}

/// Monotonic millisecond clock advanced by the host once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    millis: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by the wall time of one frame. Negative deltas are ignored.
    pub fn advance(&mut self, frame_ms: f64) {
        if frame_ms > 0.0 {
            self.millis += frame_ms;
        }
    }

    /// Milliseconds since start-up.
    pub fn now_millis(&self) -> u64 {
        self.millis as u64
    }
}
