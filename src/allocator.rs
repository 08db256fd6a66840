use log::warn;

use crate::derive::parse_number;
use crate::error::{PayrunError, Result};
use crate::journal::{round2, JournalLine};
use crate::pipeline::RunContext;
use crate::resolver::resolve;
use crate::source::RawRow;

/// Apprenticeship levy control account (credited with the lump sum) and the
/// expense account each cost centre's share is debited to.
pub const LEVY_ACCRUAL_ACCT: &str = "2210";
pub const LEVY_EXPENSE_ACCT: &str = "7006";

const COST_CENTRE_COLS: &[&str] = &["Cost Centre", "Cost Center"];
const DRIVER_COLS: &[&str] = &["Employer NI", "Employers NI", "Employer NIC"];

/// One cost centre's weight in the levy apportionment: its employer-NI
/// contribution for the month. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct AllocationEntry {
    pub label: String,
    pub driver_value: f64,
}

impl AllocationEntry {
    /// Read entries from the extract. Rows with a non-numeric or
    /// non-positive driver value are excluded from the driver total and
    /// from output, logged as skipped.
    pub fn from_rows(rows: &[RawRow]) -> Vec<AllocationEntry> {
        let mut entries = Vec::new();
        for row in rows {
            let label = row.first(COST_CENTRE_COLS).unwrap_or("").to_string();
            let driver = row.first(DRIVER_COLS).and_then(parse_number);
            match driver {
                Some(v) if v > 0.0 => entries.push(AllocationEntry {
                    label,
                    driver_value: v,
                }),
                Some(v) => warn!("apLevy: skipped '{label}' with driver value {v:.2}"),
                None => warn!("apLevy: skipped '{label}' with non-numeric driver value"),
            }
        }
        entries
    }
}

/// Spread a lump-sum cost across cost centres in exact proportion to each
/// centre's share of the driver total. Output is one credit line for the
/// full total followed by one debit line per entry, each share rounded to 2
/// decimals independently; the balance validator reports the resulting
/// drift rather than this code silently redistributing it.
pub fn allocate(
    total: f64,
    entries: &[AllocationEntry],
    ctx: &RunContext,
) -> Result<Vec<JournalLine>> {
    let driver_total: f64 = entries.iter().map(|e| e.driver_value).sum();
    if driver_total <= 0.0 {
        return Err(PayrunError::ZeroDriverTotal(format!(
            "cannot apportion {total:.2} over {} entries with no employer-NI weight",
            entries.len()
        )));
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);

    let mut credit = JournalLine::credit(total);
    credit.acct_no = LEVY_ACCRUAL_ACCT.to_string();
    credit.location_id = crate::rules::LOC_CENTRAL.to_string();
    credit.dept_id = crate::rules::DEPT_ROUNDING.to_string();
    credit.memo = "Apprenticeship Levy".to_string();
    credit.description = ctx.meta.description.clone();
    lines.push(credit);

    for entry in entries {
        let share = round2(total * (entry.driver_value / driver_total));
        let mut debit = JournalLine::debit(share);
        debit.acct_no = LEVY_EXPENSE_ACCT.to_string();
        debit.location_id = resolve(&entry.label, &ctx.locations, "location", &ctx.match_config);
        debit.dept_id = resolve(
            &entry.label,
            &ctx.departments,
            "department",
            &ctx.match_config,
        );
        debit.memo = format!("Apprenticeship Levy - {}", entry.label);
        lines.push(debit);
    }

    Ok(lines)
}
