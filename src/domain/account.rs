//! Account state and the open-order book for a single backtest run.

use crate::domain::order::{Order, Outcome};

/// Starting value of both outcome counters.
///
/// The efficiency ratios divide by `profit_count + loss_count`; starting both
/// at one keeps the denominator positive on runs that never settle a trade and
/// makes an idle run report 50%.
pub const OUTCOME_COUNT_BIAS: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub deposit: f64,
    pub initial_deposit: f64,
    /// Wins, including [`OUTCOME_COUNT_BIAS`].
    pub profit_count: u32,
    /// Losses, including [`OUTCOME_COUNT_BIAS`].
    pub loss_count: u32,
    pub cooldown_remaining: u32,
}

impl AccountState {
    pub fn new(initial_deposit: f64) -> Self {
        AccountState {
            deposit: initial_deposit,
            initial_deposit,
            profit_count: OUTCOME_COUNT_BIAS,
            loss_count: OUTCOME_COUNT_BIAS,
            cooldown_remaining: 0,
        }
    }

    pub fn credit(&mut self, amount: f64) {
        self.deposit += amount;
    }

    pub fn debit(&mut self, amount: f64) {
        self.deposit -= amount;
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.profit_count += 1,
            Outcome::Loss => self.loss_count += 1,
        }
    }
}

/// Unordered collection of open orders. Overlapping positions, including
/// simultaneous BUY and SELL orders, are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Remove every order; the book is empty afterwards.
    pub fn take_all(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }
}
