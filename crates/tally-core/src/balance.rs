//! Period balance aggregation over transactions.

use serde::Serialize;

use crate::amount::Amount;
use crate::date_range::DateRange;
use crate::entities::Transaction;

/// Income, expenses, and running balance for a date range.
/// `total_expenses` keeps its sign: it is a sum of negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodBalance {
    pub range: DateRange,
    pub starting_balance: Amount,
    pub total_income: Amount,
    pub total_expenses: Amount,
}

impl PeriodBalance {
    pub fn new(range: DateRange, starting_balance: Amount) -> Self {
        Self {
            range,
            starting_balance,
            total_income: Amount::ZERO,
            total_expenses: Amount::ZERO,
        }
    }

    /// Fold a set of transactions into a balance. Negative amounts count as
    /// expenses, everything else as income.
    pub fn for_transactions<'a>(
        range: DateRange,
        starting_balance: Amount,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        let mut balance = Self::new(range, starting_balance);
        for transaction in transactions {
            balance.accumulate(transaction.amount);
        }
        balance
    }

    pub fn accumulate(&mut self, amount: Amount) {
        if amount.is_negative() {
            self.total_expenses += amount;
        } else {
            self.total_income += amount;
        }
    }

    /// Net movement over the period.
    pub fn net(&self) -> Amount {
        self.total_income + self.total_expenses
    }

    pub fn ending_balance(&self) -> Amount {
        self.starting_balance + self.net()
    }
}
