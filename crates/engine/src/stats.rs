//! Spending statistics over a group's expenses.
//!
//! The functions here are pure aggregations; the engine loads the expenses
//! and hands them over.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, Expense, ResultEngine, util::checked_sum};

/// A calendar month, written `yyyy-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidInput(format!(
                "invalid month: {year}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("invalid month: {s}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub total: i64,
}

/// Spending of one group in one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub total: i64,
    /// Sorted by total, largest first; equal totals by category name.
    pub categories: Vec<CategoryTotal>,
    pub top: Option<CategoryTotal>,
    pub bottom: Option<CategoryTotal>,
    /// Current pooled balance of the group.
    pub remaining: i64,
}

pub(crate) fn monthly_summary(
    month: YearMonth,
    expenses: &[Expense],
    remaining: i64,
) -> ResultEngine<MonthlySummary> {
    let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| month.contains(e.date)) {
        let total = by_category.entry(expense.category.as_str()).or_default();
        *total = checked_sum([*total, expense.amount])?;
    }

    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    // BTreeMap iteration is already ordered by name; a stable sort keeps it
    // for ties.
    categories.sort_by(|a, b| b.total.cmp(&a.total));

    Ok(MonthlySummary {
        month,
        total: checked_sum(categories.iter().map(|c| c.total))?,
        top: categories.first().cloned(),
        bottom: categories.last().cloned(),
        categories,
        remaining,
    })
}

pub(crate) fn daily_totals(
    month: YearMonth,
    expenses: &[Expense],
) -> ResultEngine<Vec<DailyTotal>> {
    let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| month.contains(e.date)) {
        let total = by_day.entry(expense.date).or_default();
        *total = checked_sum([*total, expense.amount])?;
    }
    Ok(by_day
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect())
}

pub(crate) fn monthly_trend(expenses: &[Expense]) -> ResultEngine<Vec<MonthlyTotal>> {
    let mut by_month: BTreeMap<YearMonth, i64> = BTreeMap::new();
    for expense in expenses {
        let total = by_month.entry(YearMonth::of(expense.date)).or_default();
        *total = checked_sum([*total, expense.amount])?;
    }
    Ok(by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn expense(date: &str, amount: i64, category: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            group_id: Uuid::nil(),
            date: date.parse().unwrap(),
            amount,
            category: category.to_string(),
            memo: None,
            author: "alice".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("2026-04-30", 9_000, "식비"),
            expense("2026-05-01", 12_000, "식비"),
            expense("2026-05-01", 30_000, "교통비"),
            expense("2026-05-02", 18_000, "식비"),
            expense("2026-05-03", 5_000, "관광"),
            expense("2026-05-03", 5_000, "기타"),
        ]
    }

    #[test]
    fn parse_year_month() {
        let month: YearMonth = "2026-05".parse().unwrap();
        assert_eq!((month.year(), month.month()), (2026, 5));
        assert_eq!(month.to_string(), "2026-05");

        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("2026-5".parse::<YearMonth>().is_err());
        assert!("202605".parse::<YearMonth>().is_err());
        assert!("abcd-ef".parse::<YearMonth>().is_err());
    }

    #[test]
    fn summary_orders_categories() {
        let month: YearMonth = "2026-05".parse().unwrap();
        let summary = monthly_summary(month, &sample(), 41_000).unwrap();

        assert_eq!(summary.total, 70_000);
        assert_eq!(summary.remaining, 41_000);
        let names: Vec<&str> = summary
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["교통비", "식비", "관광", "기타"]);
        assert_eq!(summary.categories[1].total, 30_000);
        assert_eq!(summary.top.unwrap().category, "교통비");
        assert_eq!(summary.bottom.unwrap().category, "기타");
    }

    #[test]
    fn empty_month_has_no_top() {
        let month: YearMonth = "2026-07".parse().unwrap();
        let summary = monthly_summary(month, &sample(), 0).unwrap();
        assert_eq!(summary.total, 0);
        assert!(summary.categories.is_empty());
        assert!(summary.top.is_none());
        assert!(summary.bottom.is_none());
    }

    #[test]
    fn daily_totals_skip_other_months() {
        let month: YearMonth = "2026-05".parse().unwrap();
        let days = daily_totals(month, &sample()).unwrap();
        assert_eq!(
            days.iter().map(|d| d.total).collect::<Vec<_>>(),
            vec![42_000, 18_000, 10_000]
        );
        assert_eq!(days[0].date, "2026-05-01".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn trend_is_ascending() {
        let trend = monthly_trend(&sample()).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month.to_string(), "2026-04");
        assert_eq!(trend[0].total, 9_000);
        assert_eq!(trend[1].month.to_string(), "2026-05");
        assert_eq!(trend[1].total, 70_000);
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let month: YearMonth = "2026-05".parse().unwrap();
        let huge = vec![
            expense("2026-05-01", i64::MAX, "식비"),
            expense("2026-05-01", 1, "식비"),
        ];
        assert!(matches!(
            monthly_summary(month, &huge, 0),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            daily_totals(month, &huge),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            monthly_trend(&huge),
            Err(EngineError::InvalidAmount(_))
        ));

        // Separate categories fit, their grand total does not.
        let split = vec![
            expense("2026-05-01", i64::MAX, "식비"),
            expense("2026-05-02", 1, "교통비"),
        ];
        assert!(monthly_summary(month, &split, 0).is_err());
    }
}
