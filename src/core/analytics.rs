//! Derivations computed from the local record collections

use super::record::{Record, RecordKind, Transaction};

/// Number of entries returned by [`recent_history`].
pub const HISTORY_LEN: usize = 3;

pub fn total(records: &[Record]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

pub fn balance(incomes: &[Record], expenses: &[Record]) -> f64 {
    total(incomes) - total(expenses)
}

/// Most recent records across both collections, newest first.
///
/// The sort is stable, so records sharing a timestamp keep incomes-first
/// server order.
pub fn recent_history(incomes: &[Record], expenses: &[Record]) -> Vec<Transaction> {
    let mut history: Vec<Transaction> = incomes
        .iter()
        .map(|r| (RecordKind::Income, r))
        .chain(expenses.iter().map(|r| (RecordKind::Expense, r)))
        .map(|(kind, record)| Transaction {
            kind,
            record: record.clone(),
        })
        .collect();

    history.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
    history.truncate(HISTORY_LEN);
    history
}
