//! Transaction recording, querying, and period balances for one
//! authenticated user.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use tally_core::amount::Amount;
use tally_core::balance::PeriodBalance;
use tally_core::date_range::DateRange;
use tally_core::entities::Transaction;

use crate::errors::StoreResult;
use crate::gateway::StoreGateway;
use crate::queries;
use crate::queries::transactions::TransactionSearch;

/// Input for a new transaction; the service assigns the id and the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Amount,
    pub observations: String,
    pub date: NaiveDateTime,
    pub category_id: Option<i64>,
}

pub struct TransactionService<'g> {
    gateway: &'g StoreGateway,
    owner_user_id: i64,
}

impl<'g> TransactionService<'g> {
    pub fn new(gateway: &'g StoreGateway, owner_user_id: i64) -> Self {
        Self { gateway, owner_user_id }
    }

    pub fn add(&self, new: NewTransaction) -> StoreResult<Transaction> {
        let transaction = self.build(new);
        let conn = self.gateway.open()?;
        queries::transactions::insert(&conn, &transaction)?;
        Ok(transaction)
    }

    /// Insert several transactions in one store transaction.
    pub fn add_many(&self, new: Vec<NewTransaction>) -> StoreResult<Vec<Transaction>> {
        let transactions: Vec<Transaction> =
            new.into_iter().map(|n| self.build(n)).collect();

        let mut conn = self.gateway.open()?;
        let tx = conn.transaction()?;
        for transaction in &transactions {
            queries::transactions::insert(&tx, transaction)?;
        }
        tx.commit()?;
        Ok(transactions)
    }

    pub fn remove(&self, id: Uuid) -> StoreResult<bool> {
        let conn = self.gateway.open()?;
        queries::transactions::delete(&conn, self.owner_user_id, id)
    }

    /// All of the owner's transactions, newest first.
    pub fn all(&self) -> StoreResult<Vec<Transaction>> {
        let conn = self.gateway.open()?;
        queries::transactions::list_for_owner(&conn, self.owner_user_id)
    }

    pub fn for_date(&self, day: NaiveDate) -> StoreResult<Vec<Transaction>> {
        self.for_range(DateRange::single_day(day))
    }

    pub fn for_range(&self, range: DateRange) -> StoreResult<Vec<Transaction>> {
        let conn = self.gateway.open()?;
        queries::transactions::for_range(&conn, self.owner_user_id, range)
    }

    pub fn search(&self, input: &TransactionSearch) -> StoreResult<Vec<Transaction>> {
        let conn = self.gateway.open()?;
        queries::transactions::search(&conn, self.owner_user_id, input)
    }

    /// Income and expense totals for the range, on top of a starting balance.
    pub fn balance_for_range(
        &self,
        range: DateRange,
        starting_balance: Amount,
    ) -> StoreResult<PeriodBalance> {
        let transactions = self.for_range(range)?;
        Ok(PeriodBalance::for_transactions(
            range,
            starting_balance,
            transactions.iter(),
        ))
    }

    fn build(&self, new: NewTransaction) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            amount: new.amount,
            observations: new.observations,
            date: new.date,
            owner_user_id: self.owner_user_id,
            category_id: new.category_id,
        }
    }
}
