//! Windowed aggregation of per-tick vitals.
//!
//! The window boundary is measured in sampling ticks, never wall-clock
//! time, so clock adjustments (NTP sync, manual set) cannot stretch or
//! shrink a window.
//!
//! `emit()` computes the averages and zeroes the sums in the same call;
//! there is no point at which a tick can land between the two.

use crate::score::Vitals;

/// Running sums for the window currently being accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregationWindow {
    soil_sum: f64,
    light_sum: f64,
    score_sum: u64,
    count: u32,
    start_tick: u64,
}

impl AggregationWindow {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }
}

/// Arithmetic means over one emitted window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverages {
    pub soil_pct: f32,
    pub light_pct: f32,
    pub score: f32,
    /// Samples that contributed to the means.
    pub samples: u32,
}

impl WindowAverages {
    /// Averaged score as the integer sent to the sinks.
    pub fn score_rounded(&self) -> u8 {
        self.score.round().clamp(0.0, 100.0) as u8
    }
}

/// Accumulator with a fixed window length in ticks.
pub struct Aggregator {
    window: AggregationWindow,
    window_ticks: u64,
}

impl Aggregator {
    /// `start_tick` is the tick at which the first window opens.
    pub fn new(window_ticks: u64, start_tick: u64) -> Self {
        Self {
            window: AggregationWindow {
                start_tick,
                ..AggregationWindow::default()
            },
            window_ticks: window_ticks.max(1),
        }
    }

    /// Add one tick's vitals. Called exactly once per sampling tick.
    pub fn accumulate(&mut self, vitals: &Vitals) {
        self.window.soil_sum += f64::from(vitals.soil_pct);
        self.window.light_sum += f64::from(vitals.light_pct);
        self.window.score_sum += u64::from(vitals.score);
        self.window.count = self.window.count.saturating_add(1);
    }

    /// True once `now_tick` is at least one window past the window start.
    pub fn is_due(&self, now_tick: u64) -> bool {
        now_tick.saturating_sub(self.window.start_tick) >= self.window_ticks
    }

    /// Reduce the window to averages and start a fresh one at `now_tick`.
    ///
    /// Returns `None` and leaves the window untouched if it has not elapsed
    /// yet or holds no samples.
    pub fn emit(&mut self, now_tick: u64) -> Option<WindowAverages> {
        if !self.is_due(now_tick) || self.window.count == 0 {
            return None;
        }

        let n = f64::from(self.window.count);
        let averages = WindowAverages {
            soil_pct: (self.window.soil_sum / n) as f32,
            light_pct: (self.window.light_sum / n) as f32,
            score: (self.window.score_sum as f64 / n) as f32,
            samples: self.window.count,
        };

        self.window = AggregationWindow {
            start_tick: now_tick,
            ..AggregationWindow::default()
        };

        Some(averages)
    }

    pub fn window(&self) -> &AggregationWindow {
        &self.window
    }

    pub fn window_ticks(&self) -> u64 {
        self.window_ticks
    }
}
