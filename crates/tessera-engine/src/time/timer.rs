use std::time::{Duration, Instant};

/// Wall-clock timer reading seconds since it was started or last [`set`](Self::set).
#[derive(Debug, Clone)]
pub struct Timer {
    origin: Instant,
    offset: f64,
}

impl Timer {
    /// Starts at zero.
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset: 0.0 }
    }

    /// Seconds elapsed, plus the last value passed to `set`.
    pub fn get(&self) -> f64 {
        self.get_at(Instant::now())
    }

    /// Makes `get` return `value` now and keep counting from there.
    pub fn set(&mut self, value: f64) {
        self.set_at(Instant::now(), value);
    }

    fn get_at(&self, now: Instant) -> f64 {
        self.offset + now.saturating_duration_since(self.origin).as_secs_f64()
    }

    fn set_at(&mut self, now: Instant, value: f64) {
        self.origin = now;
        self.offset = value;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer that advances by a constant step per [`tick`](Self::tick), independent
/// of wall-clock jitter. Used for deterministic animation.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimer {
    step: f64,
    value: f64,
}

impl FixedTimer {
    /// A timer advancing `step` seconds per tick.
    pub fn new(step: Duration) -> Self {
        Self { step: step.as_secs_f64(), value: 0.0 }
    }

    /// A timer advancing `1 / hz` seconds per tick. Non-positive rates never advance.
    pub fn from_hz(hz: f64) -> Self {
        let step = if hz > 0.0 && hz.is_finite() { 1.0 / hz } else { 0.0 };
        Self { step, value: 0.0 }
    }

    /// Advances one step and returns the new value.
    pub fn tick(&mut self) -> f64 {
        self.value += self.step;
        self.value
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn timer_counts_from_set_value() {
        let mut t = Timer::new();
        let now = Instant::now();
        t.set_at(now, 10.0);
        assert_abs_diff_eq!(t.get_at(now), 10.0);
        assert_abs_diff_eq!(t.get_at(now + Duration::from_millis(1500)), 11.5, epsilon = 1e-9);
    }

    #[test]
    fn timer_never_runs_backwards() {
        let mut t = Timer::new();
        let now = Instant::now() + Duration::from_secs(1);
        t.set_at(now, 2.0);
        assert_abs_diff_eq!(t.get_at(now - Duration::from_millis(500)), 2.0);
    }

    #[test]
    fn fixed_timer_advances_by_step() {
        let mut t = FixedTimer::from_hz(60.0);
        for _ in 0..60 {
            t.tick();
        }
        assert_abs_diff_eq!(t.get(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_timer_set_rebases() {
        let mut t = FixedTimer::new(Duration::from_millis(250));
        t.set(3.0);
        assert_abs_diff_eq!(t.tick(), 3.25);
        assert_abs_diff_eq!(t.get(), 3.25);
    }

    #[test]
    fn invalid_rate_does_not_advance() {
        let mut t = FixedTimer::from_hz(0.0);
        assert_eq!(t.tick(), 0.0);
        assert_eq!(FixedTimer::from_hz(f64::NAN).step(), 0.0);
    }
}
