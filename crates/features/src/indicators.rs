//! Rolling technical indicator calculators.
//!
//! Every calculator is fed one candle's worth of data per call and
//! returns `None` until its trailing window is filled. The warm-up
//! boundary is explicit: the caller keeps the `None` sentinel in place
//! and filters complete rows afterwards, rather than imputing.

use std::collections::VecDeque;

use fx_core::Candle;

/// Simple moving average of the close price.
///
/// The first `window` observations are warm-up: the average becomes
/// defined once the window has rolled past the initial fill.
pub struct RollingSma {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingSma {
    /// Create a new SMA calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window + 1),
            sum: 0.0,
        }
    }

    /// Add a close price; returns the average once defined.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() <= self.window {
            return None;
        }
        if let Some(old) = self.values.pop_front() {
            self.sum -= old;
        }
        Some(self.sum / self.window as f64)
    }
}

/// RSI-style momentum oscillator.
///
/// Over the trailing `window` close-to-close deltas, `avg_gain` is the
/// mean positive delta and `avg_loss` the mean magnitude of negative
/// deltas; the value is `100 - 100 / (1 + avg_gain / avg_loss)`.
/// A window with no down-ticks saturates at exactly 100 (defined
/// boundary value, not a division error).
pub struct RollingRsi {
    window: usize,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    gain_sum: f64,
    loss_sum: f64,
    prev_close: Option<f64>,
}

impl RollingRsi {
    /// Create a new RSI calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            gains: VecDeque::with_capacity(window + 1),
            losses: VecDeque::with_capacity(window + 1),
            gain_sum: 0.0,
            loss_sum: 0.0,
            prev_close: None,
        }
    }

    /// Add a close price; returns the oscillator once `window` deltas
    /// are available.
    pub fn push(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(prev) => prev,
            None => return None,
        };

        let delta = close - prev;
        self.gains.push_back(delta.max(0.0));
        self.losses.push_back((-delta).max(0.0));
        self.gain_sum += delta.max(0.0);
        self.loss_sum += (-delta).max(0.0);

        if self.gains.len() > self.window {
            if let Some(g) = self.gains.pop_front() {
                self.gain_sum -= g;
            }
            if let Some(l) = self.losses.pop_front() {
                self.loss_sum -= l;
            }
        }
        if self.gains.len() < self.window {
            return None;
        }

        let avg_gain = self.gain_sum / self.window as f64;
        let avg_loss = self.loss_sum / self.window as f64;
        if avg_loss == 0.0 {
            // Zero-loss window: saturate at the upper bound.
            return Some(100.0);
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

/// Exponential moving average, seeded with the SMA of the first
/// `window` observations.
pub struct Ema {
    window: usize,
    alpha: f64,
    seed: Vec<f64>,
    current: Option<f64>,
}

impl Ema {
    /// Create a new EMA calculator with smoothing `2 / (window + 1)`.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            alpha: 2.0 / (window as f64 + 1.0),
            seed: Vec::with_capacity(window),
            current: None,
        }
    }

    /// Add an observation; returns the EMA once the seed window has
    /// filled and rolled.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(prev) => {
                let next = self.alpha * value + (1.0 - self.alpha) * prev;
                self.current = Some(next);
                Some(next)
            }
            None => {
                self.seed.push(value);
                if self.seed.len() == self.window {
                    let mean = self.seed.iter().sum::<f64>() / self.window as f64;
                    self.current = Some(mean);
                    self.seed.clear();
                }
                // The seed itself is still warm-up.
                None
            }
        }
    }
}

/// Moving-average-convergence-divergence triple.
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

/// One MACD observation: line, signal, histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    /// Create a new MACD calculator.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }

    /// Add a close price; returns the triple once the signal line is
    /// defined.
    pub fn push(&mut self, close: f64) -> Option<MacdValue> {
        let fast = self.fast.push(close);
        let slow = self.slow.push(close);
        let line = match (fast, slow) {
            (Some(f), Some(s)) => f - s,
            _ => return None,
        };
        let signal = self.signal.push(line)?;
        Some(MacdValue {
            macd: line,
            signal,
            histogram: line - signal,
        })
    }
}

/// Bollinger-style volatility bands: rolling mean of the close plus or
/// minus `mult` population standard deviations.
pub struct BollingerBands {
    window: usize,
    mult: f64,
    values: VecDeque<f64>,
    sum: f64,
    sum_sq: f64,
}

impl BollingerBands {
    /// Create a new band calculator.
    pub fn new(window: usize, mult: f64) -> Self {
        Self {
            window,
            mult,
            values: VecDeque::with_capacity(window + 1),
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Add a close price; returns `(upper, lower)` once defined.
    pub fn push(&mut self, value: f64) -> Option<(f64, f64)> {
        self.values.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;
        if self.values.len() <= self.window {
            return None;
        }
        if let Some(old) = self.values.pop_front() {
            self.sum -= old;
            self.sum_sq -= old * old;
        }

        let n = self.window as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n) - mean * mean;
        // Guard the subtraction against negative rounding residue.
        let std = variance.max(0.0).sqrt();
        Some((mean + self.mult * std, mean - self.mult * std))
    }
}

/// Average true range over a trailing window.
pub struct RollingAtr {
    window: usize,
    ranges: VecDeque<f64>,
    sum: f64,
    prev_close: Option<f64>,
}

impl RollingAtr {
    /// Create a new ATR calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ranges: VecDeque::with_capacity(window + 1),
            sum: 0.0,
            prev_close: None,
        }
    }

    /// Add a candle; returns the ATR once `window` true ranges are
    /// available.
    pub fn push(&mut self, candle: &Candle) -> Option<f64> {
        let prev = match self.prev_close.replace(candle.close_price) {
            Some(prev) => prev,
            None => return None,
        };

        let tr = candle.true_range(prev);
        self.ranges.push_back(tr);
        self.sum += tr;
        if self.ranges.len() > self.window {
            if let Some(old) = self.ranges.pop_front() {
                self.sum -= old;
            }
        }
        if self.ranges.len() < self.window {
            return None;
        }
        Some(self.sum / self.window as f64)
    }
}
