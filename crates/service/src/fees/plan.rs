//! Installment arithmetic. Pure functions over whole currency units.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use models::PlanType;

use crate::errors::ServiceError;

pub const MAX_MONTHLY_INSTALLMENTS: i32 = 36;

/// Upper bound on one plan's total so sums across plans stay within `i64`.
pub const MAX_PLAN_TOTAL: i64 = 1_000_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedInstallment {
    pub seq: i32,
    pub amount: i64,
    pub due_date: NaiveDate,
}

/// `start` plus `months` calendar months, clamped to the last day of the
/// target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(start: NaiveDate, months: u32) -> Result<NaiveDate, ServiceError> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| ServiceError::validation("due date out of range"))
}

/// Split `total` into installments. Amounts always sum to `total`; the
/// division remainder goes to the last installment.
pub fn split_installments(
    total: i64,
    plan_type: PlanType,
    count: Option<i32>,
    start: NaiveDate,
) -> Result<Vec<PlannedInstallment>, ServiceError> {
    if total <= 0 {
        return Err(ServiceError::validation("total_amount must be > 0"));
    }
    if total > MAX_PLAN_TOTAL {
        return Err(ServiceError::validation(format!("total_amount must be <= {MAX_PLAN_TOTAL}")));
    }
    let n = match plan_type {
        PlanType::LumpSum => 1,
        PlanType::Monthly => {
            let n = count.ok_or_else(|| ServiceError::validation("installment_count required for monthly plans"))?;
            if !(1..=MAX_MONTHLY_INSTALLMENTS).contains(&n) {
                return Err(ServiceError::validation(format!(
                    "installment_count must be in 1..={MAX_MONTHLY_INSTALLMENTS}"
                )));
            }
            n
        }
    };
    let base = total / n as i64;
    let remainder = total % n as i64;
    (0..n)
        .map(|k| {
            let amount = if k == n - 1 { base + remainder } else { base };
            Ok(PlannedInstallment { seq: k + 1, amount, due_date: add_months(start, k as u32)? })
        })
        .collect()
}

/// Paid share of a total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeeProgress {
    pub total: i64,
    pub paid: i64,
    pub remaining: i64,
    /// `paid / total * 100`, clamped to `0..=100`, two decimals.
    pub percent: f64,
}

pub fn progress(total: i64, paid: i64) -> FeeProgress {
    let percent = if total <= 0 {
        0.0
    } else {
        let raw = paid as f64 / total as f64 * 100.0;
        (raw.clamp(0.0, 100.0) * 100.0).round() / 100.0
    };
    FeeProgress { total, paid, remaining: (total - paid).max(0), percent }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn amounts_sum_to_total() {
        for (total, n) in [(10_000, 3), (1, 1), (7, 5), (35_000, 36), (99_999, 7)] {
            let plan = split_installments(total, PlanType::Monthly, Some(n), d(2024, 1, 1)).unwrap();
            assert_eq!(plan.len(), n as usize);
            assert_eq!(plan.iter().map(|i| i.amount).sum::<i64>(), total);
        }
        let plan = split_installments(10_000, PlanType::Monthly, Some(3), d(2024, 1, 1)).unwrap();
        let amounts: Vec<_> = plan.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, [3333, 3333, 3334]);
    }

    #[test]
    fn due_dates_clamp_to_month_end() {
        let plan = split_installments(400, PlanType::Monthly, Some(4), d(2024, 1, 31)).unwrap();
        let dues: Vec<_> = plan.iter().map(|i| i.due_date).collect();
        assert_eq!(dues, [d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]);
        assert_eq!(add_months(d(2023, 12, 31), 2).unwrap(), d(2024, 2, 29));
        assert_eq!(add_months(d(2025, 1, 30), 1).unwrap(), d(2025, 2, 28));
    }

    #[test]
    fn lump_sum_is_single_installment() {
        let plan = split_installments(50_000, PlanType::LumpSum, Some(12), d(2024, 5, 10)).unwrap();
        assert_eq!(plan, vec![PlannedInstallment { seq: 1, amount: 50_000, due_date: d(2024, 5, 10) }]);
    }

    #[test]
    fn invalid_plans_rejected() {
        let start = d(2024, 1, 1);
        assert!(split_installments(0, PlanType::LumpSum, None, start).is_err());
        assert!(split_installments(MAX_PLAN_TOTAL, PlanType::LumpSum, None, start).is_ok());
        assert!(split_installments(MAX_PLAN_TOTAL + 1, PlanType::LumpSum, None, start).is_err());
        assert!(split_installments(i64::MAX, PlanType::Monthly, Some(2), start).is_err());
        assert!(split_installments(-5, PlanType::Monthly, Some(2), start).is_err());
        assert!(split_installments(100, PlanType::Monthly, None, start).is_err());
        assert!(split_installments(100, PlanType::Monthly, Some(0), start).is_err());
        assert!(split_installments(100, PlanType::Monthly, Some(37), start).is_err());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(0, 0).percent, 0.0);
        assert_eq!(progress(0, 500).percent, 0.0);
        assert_eq!(progress(3000, 3000).percent, 100.0);
        assert_eq!(progress(3000, 4000).percent, 100.0);
        assert_eq!(progress(3000, 4000).remaining, 0);
        assert_eq!(progress(3000, 1000).percent, 33.33);
        assert_eq!(progress(3000, 1000).remaining, 2000);
        assert_eq!(progress(3000, -10).percent, 0.0);
    }
}
