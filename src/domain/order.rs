//! Simulated orders and their settlement records.

use std::fmt;

use crate::domain::signal::SignalType;

/// An open simulated order. Fields are fixed at creation; the order only
/// ever leaves the book by settlement or end-of-run liquidation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    pub signal_type: SignalType,
    /// Fee-adjusted entry price.
    pub entry_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

impl Order {
    pub fn is_buy(&self) -> bool {
        self.signal_type == SignalType::Buy
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        if self.is_buy() {
            price >= self.take_profit
        } else {
            price <= self.take_profit
        }
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        if self.is_buy() {
            price <= self.stop_loss
        } else {
            price >= self.stop_loss
        }
    }

    /// Take-profit wins the tie when both thresholds are hit on the same bar.
    pub fn trigger(&self, price: f64) -> Option<Outcome> {
        if self.should_take_profit(price) {
            Some(Outcome::Win)
        } else if self.should_stop_loss(price) {
            Some(Outcome::Loss)
        } else {
            None
        }
    }

    /// Pre-fee value returned to the deposit when closing at `price`.
    ///
    /// BUY: the price itself. SELL: `entry + (entry - price)`, the mirrored
    /// payoff of a short.
    pub fn exit_value(&self, price: f64) -> f64 {
        if self.is_buy() {
            price
        } else {
            self.entry_price + (self.entry_price - price)
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.4} (tp {:.4}, sl {:.4})",
            self.signal_type, self.entry_price, self.take_profit, self.stop_loss
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub order: Order,
    pub outcome: Outcome,
    pub exit_price: f64,
    /// Amount credited to the deposit, after fee.
    pub credit: f64,
}
