use rand::Rng;
use std::time::Duration;

/// Randomized "bot is typing" delay, uniform over a closed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    min: Duration,
    max: Duration,
}

impl TypingDelay {
    /// Bounds are swapped if given in the wrong order
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            TypingDelay { min, max }
        } else {
            TypingDelay { min: max, max: min }
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        TypingDelay {
            min: delay,
            max: delay,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a delay in whole milliseconds from `[min, max]`
    pub fn sample(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms == max_ms {
            return Duration::from_millis(min_ms);
        }
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        TypingDelay::new(Duration::from_millis(700), Duration::from_millis(900))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_within_bounds() {
        let delay = TypingDelay::default();
        for _ in 0..500 {
            let sampled = delay.sample();
            assert!(sampled >= Duration::from_millis(700), "got {:?}", sampled);
            assert!(sampled <= Duration::from_millis(900), "got {:?}", sampled);
        }
    }

    #[test]
    fn test_fixed_delay() {
        let delay = TypingDelay::fixed(Duration::from_millis(250));
        assert_eq!(delay.sample(), Duration::from_millis(250));
        assert_eq!(delay.min(), delay.max());
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let delay = TypingDelay::new(Duration::from_millis(900), Duration::from_millis(700));
        assert_eq!(delay.min(), Duration::from_millis(700));
        assert_eq!(delay.max(), Duration::from_millis(900));
    }
}
