//! Win/loss efficiency figures.

use super::account::AccountState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Efficiency {
    /// profit / (profit + loss)
    pub win_rate: f64,
    /// (profit * tp) / (profit * tp + loss * sl)
    pub weighted_win_rate: f64,
}

impl Efficiency {
    /// `take_profit_rate` and `stop_loss_rate` are fractions (0.05 == 5%).
    /// Counters are used as given, bias included.
    pub fn compute(
        profit_count: u32,
        loss_count: u32,
        take_profit_rate: f64,
        stop_loss_rate: f64,
    ) -> Self {
        let profit = profit_count as f64;
        let loss = loss_count as f64;

        let win_rate = ratio(profit, profit + loss);

        let weighted_profit = profit * take_profit_rate;
        let weighted_loss = loss * stop_loss_rate;
        let weighted_win_rate = ratio(weighted_profit, weighted_profit + weighted_loss);

        Efficiency {
            win_rate,
            weighted_win_rate,
        }
    }

    pub fn from_account(account: &AccountState, take_profit_rate: f64, stop_loss_rate: f64) -> Self {
        Self::compute(
            account.profit_count,
            account.loss_count,
            take_profit_rate,
            stop_loss_rate,
        )
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
