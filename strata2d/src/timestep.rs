use std::time::Duration;

/// Fixed-step accumulator that turns variable host frame times into a whole
/// number of simulation steps.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    elapsed: Duration,
}

impl FixedTimestep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Step length expressed in milliseconds, as the scene update expects.
    pub fn from_millis_f64(ms: f64) -> Self {
        Self::new(Duration::from_secs_f64(ms / 1000.0))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_ms(&self) -> f64 {
        self.step.as_secs_f64() * 1000.0
    }

    /// Total host time fed in so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Adds a host frame's worth of time.
    pub fn accumulate(&mut self, delta: Duration) {
        self.accumulator += delta;
        self.elapsed += delta;
    }

    /// Check if a step should run and consume its time.
    ///
    /// Call this in a loop until it returns `false` to catch up on every
    /// step owed for the frame:
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use strata2d::FixedTimestep;
    /// let mut timestep = FixedTimestep::new(Duration::from_millis(10));
    /// timestep.accumulate(Duration::from_millis(25));
    /// let mut steps = 0;
    /// while timestep.should_update() {
    ///     steps += 1;
    /// }
    /// assert_eq!(steps, 2);
    /// ```
    pub fn should_update(&mut self) -> bool {
        if !self.step.is_zero() && self.accumulator >= self.step {
            self.accumulator -= self.step;
            true
        } else {
            false
        }
    }

    /// How far (0.0 to 1.0) the leftover time is through the next step.
    pub fn alpha(&self) -> f64 {
        if self.step.is_zero() {
            0.0
        } else {
            (self.accumulator.as_secs_f64() / self.step.as_secs_f64()).min(1.0)
        }
    }
}
