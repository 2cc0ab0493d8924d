// =============================================================================
// Rolling Window — fixed-capacity numeric window with summary statistics
// =============================================================================
//
// Backing store for every rolling computation in the engine (ATR, Bollinger
// stdev, highest-high / lowest-low, choppiness sums).  Pushing beyond the
// capacity evicts the oldest value.  Statistics are only meaningful once the
// window is full; callers gate on `is_full()` to honour the
// insufficient-history contract.
// =============================================================================

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a value, evicting the oldest once the window is at capacity.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum() / self.values.len() as f64
    }

    /// Population standard deviation over the current contents.
    pub fn std_dev(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| {
            Some(match acc {
                Some(m) if m >= v => m,
                _ => v,
            })
        })
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| {
            Some(match acc {
                Some(m) if m <= v => m,
                _ => v,
            })
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut w = RollingWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            w.push(v);
        }
        assert_eq!(w.len(), 3);
        assert!((w.sum() - 9.0).abs() < 1e-12);
        assert_eq!(w.min(), Some(2.0));
        assert_eq!(w.max(), Some(4.0));
    }

    #[test]
    fn full_only_at_capacity() {
        let mut w = RollingWindow::new(2);
        assert!(!w.is_full());
        w.push(1.0);
        assert!(!w.is_full());
        w.push(2.0);
        assert!(w.is_full());
    }

    #[test]
    fn mean_and_std() {
        let mut w = RollingWindow::new(4);
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            w.push(v);
        }
        // Window now holds [5, 5, 7, 9]: mean 6.5.
        assert!((w.mean() - 6.5).abs() < 1e-12);
        let var = ((5.0f64 - 6.5).powi(2) * 2.0 + (7.0f64 - 6.5).powi(2) + (9.0f64 - 6.5).powi(2))
            / 4.0;
        assert!((w.std_dev() - var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_window_statistics() {
        let w = RollingWindow::new(5);
        assert!(w.is_empty());
        assert_eq!(w.max(), None);
        assert_eq!(w.min(), None);
        assert_eq!(w.mean(), 0.0);
        assert_eq!(w.std_dev(), 0.0);
    }
}
