use std::collections::VecDeque;
use crate::core::Speed;

/// Trailing-window mean over the most recent speeds
///
/// Until the window holds `window_size` values the input is passed through
/// unchanged. After that every output is the mean of the full window.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window_size: usize,
    /// Oldest first
    history: VecDeque<Speed>,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            history: VecDeque::with_capacity(window_size + 1),
        }
    }

    pub fn smooth(&mut self, speed: Speed) -> Speed {
        self.history.push_back(speed);
        if self.history.len() > self.window_size {
            self.history.pop_front();
        }

        if self.is_warm() {
            self.history.iter().sum::<Speed>() / self.window_size as f64
        } else {
            speed
        }
    }

    /// Whether the window has filled up
    pub fn is_warm(&self) -> bool {
        self.history.len() == self.window_size
    }

    pub fn history(&self) -> impl Iterator<Item = &Speed> + '_ {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_then_mean() {
        let mut ma = MovingAverage::new(5);
        let outputs: Vec<f64> = [10.0, 20.0, 30.0, 40.0, 50.0]
            .into_iter()
            .map(|s| ma.smooth(s))
            .collect();

        assert_eq!(outputs, vec![10.0, 20.0, 30.0, 40.0, 30.0]);
        assert!(ma.is_warm());
    }

    #[test]
    fn test_evicts_oldest() {
        let mut ma = MovingAverage::new(5);
        for s in [10.0, 20.0, 30.0, 40.0, 50.0] {
            ma.smooth(s);
        }

        assert_eq!(ma.smooth(60.0), 40.0);
        assert_eq!(ma.len(), 5);
        let kept: Vec<f64> = ma.history().copied().collect();
        assert_eq!(kept, vec![20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn test_length_never_exceeds_window() {
        let mut ma = MovingAverage::new(3);
        for i in 0..50 {
            ma.smooth(i as f64);
            assert!(ma.len() <= 3);
        }
        // After 50 the window holds 48, 49, 50
        assert_eq!(ma.smooth(50.0), 49.0);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let mut ma = MovingAverage::new(1);
        assert_eq!(ma.smooth(7.5), 7.5);
        assert_eq!(ma.smooth(0.0), 0.0);
        assert_eq!(ma.smooth(12.0), 12.0);
    }

    #[test]
    fn test_reset_restarts_warm_up() {
        let mut ma = MovingAverage::new(2);
        ma.smooth(10.0);
        ma.smooth(20.0);
        ma.reset();

        assert!(ma.is_empty());
        assert_eq!(ma.smooth(40.0), 40.0);
        assert_eq!(ma.smooth(20.0), 30.0);
    }
}
