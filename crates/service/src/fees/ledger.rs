//! Account book: installments as debits, payments as credits, in date order.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Debit,
    Credit,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub description: String,
    pub debit: i64,
    pub credit: i64,
    /// Debits minus credits up to and including this entry.
    pub balance: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountBook {
    pub entries: Vec<LedgerEntry>,
    pub total_debit: i64,
    pub total_credit: i64,
    pub balance: i64,
}

/// Sort entries by date (debits before credits on the same day, then input
/// order) and fill in the running balance.
pub fn build(mut entries: Vec<LedgerEntry>) -> AccountBook {
    entries.sort_by_key(|e| (e.date, e.kind == EntryKind::Credit));
    let mut balance = 0i64;
    let (mut total_debit, mut total_credit) = (0i64, 0i64);
    for e in &mut entries {
        total_debit += e.debit;
        total_credit += e.credit;
        balance += e.debit - e.credit;
        e.balance = balance;
    }
    AccountBook { entries, total_debit, total_credit, balance }
}

pub fn debit(date: NaiveDate, description: String, amount: i64) -> LedgerEntry {
    LedgerEntry { date, kind: EntryKind::Debit, description, debit: amount, credit: 0, balance: 0 }
}

pub fn credit(date: NaiveDate, description: String, amount: i64) -> LedgerEntry {
    LedgerEntry { date, kind: EntryKind::Credit, description, debit: 0, credit: amount, balance: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn running_balance_in_date_order() {
        let book = build(vec![
            debit(d(2, 1), "Installment 2".into(), 1000),
            credit(d(1, 15), "Payment".into(), 600),
            debit(d(1, 1), "Installment 1".into(), 1000),
            credit(d(2, 1), "Payment".into(), 1400),
        ]);
        let balances: Vec<_> = book.entries.iter().map(|e| e.balance).collect();
        assert_eq!(balances, [1000, 400, 1400, 0]);
        assert_eq!(book.entries[2].kind, EntryKind::Debit);
        assert_eq!((book.total_debit, book.total_credit, book.balance), (2000, 2000, 0));
    }

    #[test]
    fn empty_book() {
        let book = build(Vec::new());
        assert!(book.entries.is_empty());
        assert_eq!(book.balance, 0);
    }
}
