use log::warn;

use crate::journal::{round2, JournalLine};
use crate::pipeline::RunContext;
use crate::resolver::{resolve, UNKNOWN};
use crate::rules::{department_for_memo, location_override, memo_is_pt_classes};
use crate::source::RawRow;

// Synonym column sets. Payroll exports are assembled by hand and column
// headings drift between months; the loader trims trailing whitespace, the
// rest is handled here.
const HOURS_COLS: &[&str] = &["Hours Worked", "Hours"];
const RATE_COLS: &[&str] = &["Rate of Pay Per Hour", "Rate"];
const AMOUNT_COLS: &[&str] = &["Amount", "Salary Amount", "Monthly Salary"];
const MEMO_COLS: &[&str] = &["Memo", "Pay Element"];
const DESC_COLS: &[&str] = &["Description"];
const ACCT_COLS: &[&str] = &["Account", "Account No", "Acct No"];
const LOCATION_COLS: &[&str] = &["Location", "Site"];
const DEPT_COLS: &[&str] = &["Department", "Dept"];
const SIDE_COLS: &[&str] = &["Entry Type", "Type"];
const FROM_LOCATION_COLS: &[&str] = &["From Location"];
const TO_LOCATION_COLS: &[&str] = &["To Location"];
const FROM_DEPT_COLS: &[&str] = &["From Department", "From Dept"];
const TO_DEPT_COLS: &[&str] = &["To Department", "To Dept"];
const DEBIT_COLS: &[&str] = &["Debit", "DEBIT"];
const CREDIT_COLS: &[&str] = &["Credit", "CREDIT"];

/// Parse a monetary or driver value: thousands separators, currency symbols
/// and surrounding quotes are stripped, parenthesized values are negative.
/// Unlike a ledger-side parser this returns None for non-numeric input:
/// the row must be dropped, not zeroed.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw
        .replace(',', "")
        .replace('"', "")
        .replace('\u{a3}', "")
        .replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

fn hours_times_rate(row: &RawRow) -> Option<f64> {
    let hours = parse_number(row.first(HOURS_COLS)?)?;
    let rate = parse_number(row.first(RATE_COLS)?)?;
    Some(round2(hours * rate))
}

/// Source rows mark balancing entries (net wages control, PAYE, pension
/// contributions) with a Credit entry type; everything else is a cost and
/// books as a debit.
fn is_credit_row(row: &RawRow) -> bool {
    row.first(SIDE_COLS)
        .map(|v| v.to_uppercase().starts_with('C'))
        .unwrap_or(false)
}

/// Shared derivation for costed rows: resolve location and department from
/// their free-text labels, then apply the memo rule tables in order.
fn costed_line(ctx: &RunContext, row: &RawRow, memo: &str, amount: f64) -> JournalLine {
    let mut line = if is_credit_row(row) {
        JournalLine::credit(amount)
    } else {
        JournalLine::debit(amount)
    };
    line.memo = memo.to_string();
    line.description = row.first(DESC_COLS).unwrap_or("").to_string();
    line.acct_no = row.first(ACCT_COLS).unwrap_or("").to_string();
    line.location_id = resolve(
        row.first(LOCATION_COLS).unwrap_or(""),
        &ctx.locations,
        "location",
        &ctx.match_config,
    );
    line.dept_id = resolve(
        row.first(DEPT_COLS).unwrap_or(""),
        &ctx.departments,
        "department",
        &ctx.match_config,
    );
    if let Some(dept) = department_for_memo(memo) {
        line.dept_id = dept.to_string();
    }
    if let Some(loc) = location_override(memo, &line.acct_no) {
        line.location_id = loc.to_string();
    }
    line
}

/// Hourly payroll: amount = hours x rate. Rows with non-numeric hours or
/// rate, or a non-positive computed amount, are dropped.
pub fn hourly(ctx: &RunContext, row: &RawRow) -> Vec<JournalLine> {
    let memo = row.first(MEMO_COLS).unwrap_or("").to_string();
    let Some(amount) = hours_times_rate(row) else {
        warn!("hourly: dropped row with non-numeric hours/rate (memo '{memo}')");
        return Vec::new();
    };
    if amount <= 0.0 {
        warn!("hourly: dropped row with amount {amount:.2} (memo '{memo}')");
        return Vec::new();
    }
    vec![costed_line(ctx, row, &memo, amount)]
}

/// Salaried payroll: the extract carries a monthly amount directly.
pub fn salaried(ctx: &RunContext, row: &RawRow) -> Vec<JournalLine> {
    let memo = row.first(MEMO_COLS).unwrap_or("").to_string();
    let amount = row.first(AMOUNT_COLS).and_then(parse_number);
    let Some(amount) = amount.map(round2) else {
        warn!("salaried: dropped row with non-numeric amount (memo '{memo}')");
        return Vec::new();
    };
    if amount <= 0.0 {
        warn!("salaried: dropped row with amount {amount:.2} (memo '{memo}')");
        return Vec::new();
    }
    vec![costed_line(ctx, row, &memo, amount)]
}

/// PT / classes journal: hourly-shaped rows filtered to memos carrying a
/// leading "P T", "Pt", or "Classes" token. Rows for other pay elements are
/// not an error, just not this journal's business.
pub fn pt_classes(ctx: &RunContext, row: &RawRow) -> Vec<JournalLine> {
    let memo = row.first(MEMO_COLS).unwrap_or("");
    if !memo_is_pt_classes(memo) {
        return Vec::new();
    }
    hourly(ctx, row)
}

/// Cross-location recharge: one input row becomes exactly two lines, a
/// credit at the "from" cost centre and a debit of the same amount at the
/// "to" cost centre. All four codes resolve independently; an UNKNOWN is
/// logged as a mapping failure but the lines are still emitted so the
/// failure is visible in the output for manual correction.
pub fn cross_charge(ctx: &RunContext, row: &RawRow) -> Vec<JournalLine> {
    let memo = row.first(MEMO_COLS).unwrap_or("").to_string();
    let Some(amount) = hours_times_rate(row) else {
        warn!("crossCharge: dropped row with non-numeric hours/rate (memo '{memo}')");
        return Vec::new();
    };
    if amount <= 0.0 {
        warn!("crossCharge: dropped row with amount {amount:.2} (memo '{memo}')");
        return Vec::new();
    }

    let from_loc = resolve(
        row.first(FROM_LOCATION_COLS).unwrap_or(""),
        &ctx.locations,
        "from-location",
        &ctx.match_config,
    );
    let to_loc = resolve(
        row.first(TO_LOCATION_COLS).unwrap_or(""),
        &ctx.locations,
        "to-location",
        &ctx.match_config,
    );
    let from_dept = resolve(
        row.first(FROM_DEPT_COLS).unwrap_or(""),
        &ctx.departments,
        "from-department",
        &ctx.match_config,
    );
    let to_dept = resolve(
        row.first(TO_DEPT_COLS).unwrap_or(""),
        &ctx.departments,
        "to-department",
        &ctx.match_config,
    );
    for (label, code) in [
        ("from-location", &from_loc),
        ("to-location", &to_loc),
        ("from-department", &from_dept),
        ("to-department", &to_dept),
    ] {
        if code == UNKNOWN {
            warn!("crossCharge: {label} unresolved (memo '{memo}'), emitting UNKNOWN");
        }
    }

    let acct = row.first(ACCT_COLS).unwrap_or("").to_string();
    let description = row.first(DESC_COLS).unwrap_or("").to_string();

    let mut credit = JournalLine::credit(amount);
    credit.memo = memo.clone();
    credit.description = description.clone();
    credit.acct_no = acct.clone();
    credit.location_id = from_loc;
    credit.dept_id = from_dept;

    let mut debit = JournalLine::debit(amount);
    debit.memo = memo;
    debit.description = description;
    debit.acct_no = acct;
    debit.location_id = to_loc;
    debit.dept_id = to_dept;

    vec![credit, debit]
}

/// Investment journal: rows arrive already journal-shaped with explicit
/// Debit/Credit columns and canonical codes; copied through without
/// resolution. Sequencing and the balance check still apply at assembly.
pub fn investment(row: &RawRow) -> Vec<JournalLine> {
    let debit = row.first(DEBIT_COLS).and_then(parse_number);
    let credit = row.first(CREDIT_COLS).and_then(parse_number);
    let memo = row.first(MEMO_COLS).unwrap_or("").to_string();
    let mut line = match (debit, credit) {
        (Some(d), None) if d > 0.0 => JournalLine::debit(round2(d)),
        (None, Some(c)) if c > 0.0 => JournalLine::credit(round2(c)),
        _ => {
            warn!("investment: dropped row without exactly one positive side (memo '{memo}')");
            return Vec::new();
        }
    };
    line.memo = memo;
    line.description = row.first(DESC_COLS).unwrap_or("").to_string();
    line.acct_no = row.first(ACCT_COLS).unwrap_or("").to_string();
    line.location_id = row.first(LOCATION_COLS).unwrap_or("").to_string();
    line.dept_id = row.first(DEPT_COLS).unwrap_or("").to_string();
    vec![line]
}
