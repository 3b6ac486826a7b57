//! EMA crossover signal generation.

use std::fmt;

use crate::domain::window::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalType {
    Buy,
    Sell,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Buy => write!(f, "BUY"),
            SignalType::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub signal_type: SignalType,
    /// Close of the bar the crossover was observed on.
    pub price: f64,
}

/// Inspect the last two rows of the window for a fast/slow EMA crossover.
///
/// - BUY when `prev.fast <= prev.slow` and `cur.fast > cur.slow`
/// - SELL when `prev.fast >= prev.slow` and `cur.fast < cur.slow`
///
/// Only the step where the direction flips fires. Any undefined EMA value on
/// either row (warm-up region) yields no signal.
pub fn generate_signal(window: &Window) -> Option<Signal> {
    let (previous, current) = window.last_two()?;

    let prev_fast = previous.ema_fast?;
    let prev_slow = previous.ema_slow?;
    let cur_fast = current.ema_fast?;
    let cur_slow = current.ema_slow?;

    let signal_type = if prev_fast <= prev_slow && cur_fast > cur_slow {
        SignalType::Buy
    } else if prev_fast >= prev_slow && cur_fast < cur_slow {
        SignalType::Sell
    } else {
        return None;
    };

    Some(Signal {
        signal_type,
        price: current.close(),
    })
}
