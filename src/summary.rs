use chrono::{Datelike, Local, NaiveDate};

use crate::models::expense::Expense;

/// Sum of amounts for records dated in the same calendar month and year as `today`.
/// Records whose date can't be parsed are skipped.
pub fn month_total(expenses: &[Expense], today: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| {
            NaiveDate::parse_from_str(e.date_part(), "%Y-%m-%d")
                .map(|date| date.year() == today.year() && date.month() == today.month())
                .unwrap_or(false)
        })
        .map(|e| e.amount)
        .sum()
}

pub fn current_month_total(expenses: &[Expense]) -> f64 {
    month_total(expenses, Local::now().date_naive())
}

pub fn format_total(total: f64) -> String {
    format!("{:.2}", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: i64, amount: f64, created_at: &str) -> Expense {
        Expense {
            id,
            category: "misc".into(),
            description: "test".into(),
            amount,
            created_at: created_at.into(),
        }
    }

    fn may_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn sums_current_month_records() {
        let expenses = vec![
            expense(1, 10.5, "2024-05-01T09:00:00"),
            expense(2, 20.0, "2024-05-31"),
        ];
        assert_eq!(format_total(month_total(&expenses, may_15())), "30.50");
    }

    #[test]
    fn empty_list_is_zero() {
        assert_eq!(format_total(month_total(&[], may_15())), "0.00");
        assert_eq!(format_total(current_month_total(&[])), "0.00");
    }

    #[test]
    fn other_months_and_years_are_excluded() {
        let expenses = vec![
            expense(1, 10.0, "2024-05-10"),
            expense(2, 99.0, "2024-04-30"),
            expense(3, 99.0, "2023-05-10"),
            expense(4, 99.0, "not a date"),
        ];
        assert_eq!(format_total(month_total(&expenses, may_15())), "10.00");
    }

    #[test]
    fn current_month_uses_the_local_clock() {
        let today = Local::now().date_naive();
        let expenses = vec![
            expense(1, 10.5, &today.format("%Y-%m-%d").to_string()),
            expense(2, 20.0, &today.format("%Y-%m-01").to_string()),
        ];
        assert_eq!(format_total(current_month_total(&expenses)), "30.50");
    }
}
