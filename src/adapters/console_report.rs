//! Plain-text progress and summary output.

use std::io::{self, Write};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktesterError;
use crate::domain::metrics::Efficiency;
use crate::ports::report_port::{ProgressSnapshot, ReportPort};

pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_outcomes(&mut self, profit: u32, loss: u32, efficiency: &Efficiency) -> io::Result<()> {
        writeln!(
            self.out,
            "The ratio of profitable/unprofitable transactions: {}/{}",
            profit, loss
        )?;
        writeln!(
            self.out,
            "Algorithm efficiency: {:.2}%",
            efficiency.win_rate * 100.0
        )?;
        writeln!(
            self.out,
            "Efficiency of the algorithm considering tp/sl: {:.2}%",
            efficiency.weighted_win_rate * 100.0
        )
    }
}

impl<W: Write> ReportPort for ConsoleReport<W> {
    fn progress(&mut self, snapshot: &ProgressSnapshot<'_>) -> Result<(), BacktesterError> {
        writeln!(self.out, "{}", "-".repeat(50))?;
        writeln!(self.out, "Backtested bars: {}", snapshot.bars_tested)?;
        let orders: Vec<String> = snapshot.open_orders.iter().map(|o| o.to_string()).collect();
        writeln!(self.out, "Orders: [{}]", orders.join(", "))?;
        writeln!(self.out, "Deposit: {}", snapshot.deposit)?;
        self.write_outcomes(snapshot.profit_count, snapshot.loss_count, &snapshot.efficiency)?;
        Ok(())
    }

    fn summary(&mut self, result: &BacktestResult) -> Result<(), BacktesterError> {
        writeln!(self.out, "{}", "=".repeat(50))?;
        writeln!(self.out, "Backtested bars: {}", result.bars_tested)?;
        writeln!(
            self.out,
            "Changing the deposit: {} -> {}",
            result.initial_deposit, result.final_deposit
        )?;
        self.write_outcomes(result.profit_count, result.loss_count, &result.efficiency)?;
        if !result.liquidated.is_empty() {
            writeln!(
                self.out,
                "Unwound at entry price: {} open order(s)",
                result.liquidated.len()
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
