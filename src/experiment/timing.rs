//! Wall-clock aggregation across repeated experiment runs.

use std::fmt;
use std::time::Duration;

/// Collects one duration per run and reports summary statistics.
#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    durations: Vec<Duration>,
}

impl TimingStats {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one run's elapsed time.
    pub fn record(&mut self, elapsed: Duration) {
        self.durations.push(elapsed);
    }

    /// Returns the number of recorded runs.
    pub fn count(&self) -> usize {
        self.durations.len()
    }

    /// Returns the total time across all runs.
    pub fn sum(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Returns the mean run time, or zero when nothing was recorded.
    pub fn mean(&self) -> Duration {
        match self.count() {
            0 => Duration::ZERO,
            n => self.sum() / n as u32,
        }
    }

    /// Returns the population variance of the run times, in seconds squared.
    pub fn variance(&self) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        let n = self.durations.len() as f64;
        let mean = self.durations.iter().map(Duration::as_secs_f64).sum::<f64>() / n;
        let mean_sq = self
            .durations
            .iter()
            .map(|d| d.as_secs_f64() * d.as_secs_f64())
            .sum::<f64>()
            / n;
        (mean_sq - mean * mean).max(0.0)
    }

    /// Returns the population standard deviation of the run times, in seconds.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl fmt::Display for TimingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count:{} mean:{:.6}s stdev:{:.6}s sum:{:.6}s",
            self.count(),
            self.mean().as_secs_f64(),
            self.std_dev(),
            self.sum().as_secs_f64()
        )
    }
}
