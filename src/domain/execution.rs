//! Order entry, take-profit/stop-loss settlement and end-of-run liquidation.
//!
//! All percentages are given in percent (5.0 == 5%) and converted to rates
//! at the point of use.

use tracing::debug;

use super::account::{AccountState, OrderBook};
use super::order::{Order, Settlement};
use super::signal::{Signal, SignalType};

/// Percent parameters that shape every order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionParams {
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub transaction_fee_pct: f64,
}

impl ExecutionParams {
    pub fn fee_rate(&self) -> f64 {
        self.transaction_fee_pct / 100.0
    }

    pub fn take_profit_rate(&self) -> f64 {
        self.take_profit_pct / 100.0
    }

    pub fn stop_loss_rate(&self) -> f64 {
        self.stop_loss_pct / 100.0
    }
}

/// price - price * fee_rate
pub fn apply_fee(price: f64, fee_rate: f64) -> f64 {
    price - price * fee_rate
}

/// Open an order for `signal` and reserve its entry price from the deposit.
///
/// BUY: tp above entry, sl below. SELL: tp below entry, sl above.
pub fn open_order(
    book: &mut OrderBook,
    account: &mut AccountState,
    signal: &Signal,
    params: &ExecutionParams,
) -> Order {
    let entry_price = apply_fee(signal.price, params.fee_rate());
    let tp_offset = entry_price * params.take_profit_rate();
    let sl_offset = entry_price * params.stop_loss_rate();

    let (take_profit, stop_loss) = match signal.signal_type {
        SignalType::Buy => (entry_price + tp_offset, entry_price - sl_offset),
        SignalType::Sell => (entry_price - tp_offset, entry_price + sl_offset),
    };

    let order = Order {
        signal_type: signal.signal_type,
        entry_price,
        take_profit,
        stop_loss,
    };

    account.debit(entry_price);
    book.push(order);
    debug!(%order, deposit = account.deposit, "order opened");
    order
}

/// Settle every order whose take-profit or stop-loss is hit at `price`.
///
/// Partitions the book: untouched orders stay, triggered ones are removed,
/// credited (fee applied to the exit value) and counted. Each order settles
/// at most once per call.
pub fn settle_orders(
    book: &mut OrderBook,
    account: &mut AccountState,
    price: f64,
    fee_rate: f64,
) -> Vec<Settlement> {
    let mut settlements = Vec::new();

    for order in book.take_all() {
        let Some(outcome) = order.trigger(price) else {
            book.push(order);
            continue;
        };

        let credit = apply_fee(order.exit_value(price), fee_rate);
        account.credit(credit);
        account.record(outcome);
        debug!(%order, ?outcome, price, credit, "order settled");

        settlements.push(Settlement {
            order,
            outcome,
            exit_price: price,
            credit,
        });
    }

    settlements
}

/// Unwind all remaining orders at their entry price. Not counted as wins or
/// losses. Returns the unwound orders.
pub fn liquidate(book: &mut OrderBook, account: &mut AccountState) -> Vec<Order> {
    let orders = book.take_all();
    for order in &orders {
        account.credit(order.entry_price);
        debug!(%order, "order liquidated at entry");
    }
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::OUTCOME_COUNT_BIAS;
    use crate::domain::order::Outcome;
    use approx::assert_relative_eq;

    fn params(tp: f64, sl: f64, fee: f64) -> ExecutionParams {
        ExecutionParams {
            take_profit_pct: tp,
            stop_loss_pct: sl,
            transaction_fee_pct: fee,
        }
    }

    fn buy_at(price: f64) -> Signal {
        Signal {
            signal_type: SignalType::Buy,
            price,
        }
    }

    fn sell_at(price: f64) -> Signal {
        Signal {
            signal_type: SignalType::Sell,
            price,
        }
    }

    fn open_one(signal: Signal, p: &ExecutionParams) -> (OrderBook, AccountState) {
        let mut book = OrderBook::new();
        let mut account = AccountState::new(0.0);
        open_order(&mut book, &mut account, &signal, p);
        (book, account)
    }

    #[test]
    fn apply_fee_basic() {
        assert_relative_eq!(apply_fee(200.0, 0.01), 198.0, epsilon = 1e-9);
        assert_eq!(apply_fee(200.0, 0.0), 200.0);
    }

    #[test]
    fn rates_from_percent() {
        let p = params(5.0, 3.0, 0.1);
        assert_relative_eq!(p.take_profit_rate(), 0.05, epsilon = 1e-9);
        assert_relative_eq!(p.stop_loss_rate(), 0.03, epsilon = 1e-9);
        assert_relative_eq!(p.fee_rate(), 0.001, epsilon = 1e-9);
    }

    #[test]
    fn open_buy_sets_thresholds_and_debits() {
        let (book, account) = open_one(buy_at(100.0), &params(5.0, 3.0, 0.0));

        assert_eq!(book.len(), 1);
        let order = book.orders()[0];
        assert_eq!(order.signal_type, SignalType::Buy);
        assert_relative_eq!(order.entry_price, 100.0);
        assert_relative_eq!(order.take_profit, 105.0);
        assert_relative_eq!(order.stop_loss, 97.0);
        assert_relative_eq!(account.deposit, -100.0);
    }

    #[test]
    fn open_sell_inverts_thresholds() {
        let (book, _) = open_one(sell_at(100.0), &params(5.0, 3.0, 0.0));
        let order = book.orders()[0];
        assert_relative_eq!(order.take_profit, 95.0);
        assert_relative_eq!(order.stop_loss, 103.0);
    }

    #[test]
    fn open_applies_fee_to_entry() {
        let (book, account) = open_one(buy_at(100.0), &params(10.0, 10.0, 1.0));
        let order = book.orders()[0];
        assert_relative_eq!(order.entry_price, 99.0);
        assert_relative_eq!(order.take_profit, 99.0 * 1.1, epsilon = 1e-9);
        assert_relative_eq!(account.deposit, -99.0);
    }

    #[test]
    fn buy_take_profit_credits_price() {
        let p = params(5.0, 3.0, 0.0);
        let (mut book, mut account) = open_one(buy_at(100.0), &p);

        let settled = settle_orders(&mut book, &mut account, 105.0, p.fee_rate());

        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].outcome, Outcome::Win);
        assert_relative_eq!(settled[0].credit, 105.0);
        assert!(book.is_empty());
        assert_eq!(account.profit_count, 2);
        assert_eq!(account.loss_count, 1);
        assert_relative_eq!(account.deposit, -100.0 + 105.0);
    }

    #[test]
    fn buy_stop_loss_credits_price() {
        let p = params(5.0, 3.0, 0.0);
        let (mut book, mut account) = open_one(buy_at(100.0), &p);

        let settled = settle_orders(&mut book, &mut account, 97.0, p.fee_rate());

        assert_eq!(settled[0].outcome, Outcome::Loss);
        assert_eq!(account.profit_count, 1);
        assert_eq!(account.loss_count, 2);
        assert_relative_eq!(account.deposit, -100.0 + 97.0);
    }

    #[test]
    fn sell_credits_mirrored_price() {
        let p = params(5.0, 3.0, 0.0);
        let (mut book, mut account) = open_one(sell_at(100.0), &p);

        let settled = settle_orders(&mut book, &mut account, 95.0, p.fee_rate());

        assert_eq!(settled[0].outcome, Outcome::Win);
        assert_relative_eq!(settled[0].credit, 105.0);
        assert_relative_eq!(account.deposit, 5.0);
    }

    #[test]
    fn sell_stop_loss_credits_mirrored_price() {
        let p = params(5.0, 3.0, 0.0);
        let (mut book, mut account) = open_one(sell_at(100.0), &p);

        settle_orders(&mut book, &mut account, 103.0, p.fee_rate());

        assert_eq!(account.loss_count, 2);
        assert_relative_eq!(account.deposit, -3.0);
    }

    #[test]
    fn fee_applies_to_exit_value() {
        let p = params(5.0, 3.0, 1.0);
        let (mut book, mut account) = open_one(sell_at(100.0), &p);
        // entry 99, tp 94.05
        let settled = settle_orders(&mut book, &mut account, 94.0, p.fee_rate());

        let mirrored = 99.0 + (99.0 - 94.0);
        assert_relative_eq!(settled[0].credit, mirrored * 0.99, epsilon = 1e-9);
        assert_relative_eq!(account.deposit, -99.0 + mirrored * 0.99, epsilon = 1e-9);
    }

    #[test]
    fn untouched_orders_stay_open() {
        let p = params(5.0, 3.0, 0.0);
        let mut book = OrderBook::new();
        let mut account = AccountState::new(1000.0);
        open_order(&mut book, &mut account, &buy_at(100.0), &p);
        open_order(&mut book, &mut account, &buy_at(200.0), &p);

        let settled = settle_orders(&mut book, &mut account, 105.0, 0.0);

        assert_eq!(settled.len(), 1);
        assert_eq!(book.len(), 1);
        assert_relative_eq!(book.orders()[0].entry_price, 200.0);
    }

    #[test]
    fn double_trigger_settles_once_as_win() {
        let p = params(0.0, 0.0, 0.0);
        let (mut book, mut account) = open_one(buy_at(100.0), &p);

        let settled = settle_orders(&mut book, &mut account, 100.0, 0.0);

        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].outcome, Outcome::Win);
        assert_eq!(account.profit_count, 2);
        assert_eq!(account.loss_count, 1);
        assert_relative_eq!(account.deposit, 0.0);
    }

    #[test]
    fn liquidate_credits_entry_without_counting() {
        let p = params(5.0, 3.0, 0.0);
        let mut book = OrderBook::new();
        let mut account = AccountState::new(500.0);
        open_order(&mut book, &mut account, &buy_at(100.0), &p);
        open_order(&mut book, &mut account, &sell_at(50.0), &p);
        assert_relative_eq!(account.deposit, 350.0);

        let unwound = liquidate(&mut book, &mut account);

        assert_eq!(unwound.len(), 2);
        assert!(book.is_empty());
        assert_relative_eq!(account.deposit, 500.0);
        assert_eq!(account.profit_count, OUTCOME_COUNT_BIAS);
        assert_eq!(account.loss_count, OUTCOME_COUNT_BIAS);
    }
}
