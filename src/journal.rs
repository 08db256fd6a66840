use chrono::NaiveDate;

use crate::error::{PayrunError, Result};

/// Round to 2 decimal places, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One output ledger line. Field order here matches the import template
/// column order exactly; see `export::HEADERS`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalLine {
    pub donotimport: String,
    pub line_no: Option<u32>,
    pub document: String,
    pub journal: String,
    pub date: String,
    pub reverse_date: String,
    pub description: String,
    pub acct_no: String,
    pub location_id: String,
    pub dept_id: String,
    pub memo: String,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
    pub source_entity: String,
}

impl JournalLine {
    pub fn debit(amount: f64) -> Self {
        Self {
            debit: Some(amount),
            ..Self::default()
        }
    }

    pub fn credit(amount: f64) -> Self {
        Self {
            credit: Some(amount),
            ..Self::default()
        }
    }
}

/// Month name -> UK financial period, where the financial year starts in
/// April (April = 1 ... March = 12). Accepts full names or three-letter
/// abbreviations, case-insensitively.
pub fn financial_period(month: &str) -> Option<u32> {
    let calendar = calendar_month(month)?;
    Some((calendar + 8) % 12 + 1)
}

/// Month name -> calendar month number (January = 1).
pub fn calendar_month(month: &str) -> Option<u32> {
    const NAMES: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let key = month.trim().to_lowercase();
    if key.len() < 3 {
        return None;
    }
    NAMES
        .iter()
        .position(|n| key.starts_with(n))
        .map(|i| i as u32 + 1)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1).map(|d| d.pred_opt().unwrap_or(d))
}

/// Display metadata attached uniformly to every line of a run: the journal
/// date (last day of the target month), the document reference, a
/// human-readable description, and the period memo. Computed once per run.
#[derive(Debug, Clone)]
pub struct JournalMeta {
    pub journal: String,
    pub document: String,
    pub date: String,
    pub reverse_date: String,
    pub description: String,
    pub memo: String,
    pub source_entity: String,
    pub period: u32,
}

impl JournalMeta {
    /// `reverses` sets REVERSEDATE to the first day of the following month,
    /// used by accrual journals that unwind next period.
    pub fn new(
        journal_name: &str,
        document_code: &str,
        month: &str,
        year: i32,
        reverses: bool,
        source_entity: &str,
    ) -> Result<Self> {
        let calendar = calendar_month(month)
            .ok_or_else(|| PayrunError::UnknownMonth(month.to_string()))?;
        let period = financial_period(month)
            .ok_or_else(|| PayrunError::UnknownMonth(month.to_string()))?;
        let journal_date = last_day_of_month(year, calendar)
            .ok_or_else(|| PayrunError::UnknownMonth(month.to_string()))?;
        let next_month_start = journal_date
            .succ_opt()
            .ok_or_else(|| PayrunError::UnknownMonth(month.to_string()))?;

        let month_name = journal_date.format("%B").to_string();
        Ok(Self {
            journal: "PAY".to_string(),
            document: format!("{document_code}-P{period:02}-{:02}", year % 100),
            date: journal_date.format("%d/%m/%Y").to_string(),
            reverse_date: if reverses {
                next_month_start.format("%d/%m/%Y").to_string()
            } else {
                String::new()
            },
            description: format!("{journal_name} P{period:02} {year}"),
            memo: format!("P{period:02} {month_name} {year}"),
            source_entity: source_entity.to_string(),
            period,
        })
    }
}
