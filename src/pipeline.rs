use log::{info, warn};

use crate::allocator::{allocate, AllocationEntry};
use crate::assembler::{assemble, AssembledJournal};
use crate::codemap::CodeMap;
use crate::derive;
use crate::error::{PayrunError, Result};
use crate::journal::{JournalLine, JournalMeta};
use crate::resolver::{MatchConfig, UNKNOWN};
use crate::source::RawRow;

// ---------------------------------------------------------------------------
// Journal kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JournalKind {
    Investment,
    Hourly,
    Salaried,
    HourlyAccrual,
    CrossCharge,
    ApLevy,
    PtClasses,
}

pub const ALL_KINDS: &[JournalKind] = &[
    JournalKind::Investment,
    JournalKind::Hourly,
    JournalKind::Salaried,
    JournalKind::HourlyAccrual,
    JournalKind::CrossCharge,
    JournalKind::ApLevy,
    JournalKind::PtClasses,
];

impl JournalKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::Hourly => "hourly",
            Self::Salaried => "salaried",
            Self::HourlyAccrual => "hourlyAccrual",
            Self::CrossCharge => "crossCharge",
            Self::ApLevy => "apLevy",
            Self::PtClasses => "ptClasses",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Investment => "Investment journal (pass-through)",
            Self::Hourly => "Hourly payroll",
            Self::Salaried => "Salaried payroll",
            Self::HourlyAccrual => "Hourly accrual",
            Self::CrossCharge => "Cross-location recharge",
            Self::ApLevy => "Apprenticeship levy allocation",
            Self::PtClasses => "PT and classes payroll",
        }
    }

    pub fn document_code(&self) -> &'static str {
        match self {
            Self::Investment => "INVJ",
            Self::Hourly => "HRLY",
            Self::Salaried => "SLRY",
            Self::HourlyAccrual => "HRAC",
            Self::CrossCharge => "XCHG",
            Self::ApLevy => "APLV",
            Self::PtClasses => "PTCL",
        }
    }

    /// Accrual journals unwind on the first of the following month.
    pub fn reverses(&self) -> bool {
        matches!(self, Self::HourlyAccrual)
    }

    pub fn from_key(key: &str) -> Result<JournalKind> {
        ALL_KINDS
            .iter()
            .find(|k| k.key() == key)
            .copied()
            .ok_or_else(|| PayrunError::UnsupportedJournalType(key.to_string()))
    }

    /// Row-wise derivation for the standard path. The levy and pass-through
    /// kinds deviate from this contract and are special-cased in `execute`,
    /// not hidden here.
    fn derive(&self, ctx: &RunContext, row: &RawRow) -> Vec<JournalLine> {
        match self {
            Self::Hourly | Self::HourlyAccrual => derive::hourly(ctx, row),
            Self::Salaried => derive::salaried(ctx, row),
            Self::CrossCharge => derive::cross_charge(ctx, row),
            Self::PtClasses => derive::pt_classes(ctx, row),
            Self::Investment | Self::ApLevy => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run context and report
// ---------------------------------------------------------------------------

/// Everything one run owns: display metadata and the code maps rebuilt for
/// this run. Maps are never cached across runs: a stale cost-centre mapping
/// is a financial-accuracy risk, so each invocation rebuilds from the
/// reference table it was given.
#[derive(Debug)]
pub struct RunContext {
    pub meta: JournalMeta,
    pub locations: CodeMap,
    pub departments: CodeMap,
    pub match_config: MatchConfig,
}

/// Per-run counts for the operator deciding whether to import the output.
#[derive(Debug, Default)]
pub struct RunReport {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub lookup_misses: usize,
    pub lines_written: usize,
}

fn count_unknown_codes(lines: &[JournalLine]) -> usize {
    lines
        .iter()
        .map(|l| {
            usize::from(l.location_id == UNKNOWN) + usize::from(l.dept_id == UNKNOWN)
        })
        .sum()
}

/// Drive one run: derive journal lines from the loaded rows, then assemble.
/// `total` is the lump sum to apportion and is required by the levy kind
/// only. Loading and writing stay with the caller; this function owns the
/// transformation in between.
pub fn execute(
    kind: JournalKind,
    ctx: &RunContext,
    rows: &[RawRow],
    total: Option<f64>,
    tolerance: f64,
) -> Result<(AssembledJournal, RunReport)> {
    let mut report = RunReport {
        rows_loaded: rows.len(),
        ..RunReport::default()
    };

    let lines: Vec<JournalLine> = match kind {
        JournalKind::ApLevy => {
            let total =
                total.ok_or_else(|| PayrunError::MissingTotal(kind.key().to_string()))?;
            let entries = AllocationEntry::from_rows(rows);
            report.rows_dropped = rows.len() - entries.len();
            allocate(total, &entries, ctx)?
        }
        JournalKind::Investment => {
            let mut lines = Vec::new();
            for row in rows {
                let derived = derive::investment(row);
                if derived.is_empty() {
                    report.rows_dropped += 1;
                }
                lines.extend(derived);
            }
            lines
        }
        _ => {
            let mut lines = Vec::new();
            for row in rows {
                let derived = kind.derive(ctx, row);
                if derived.is_empty() {
                    report.rows_dropped += 1;
                }
                lines.extend(derived);
            }
            lines
        }
    };

    report.lookup_misses = count_unknown_codes(&lines);
    if report.lookup_misses > 0 {
        warn!(
            "{}: {} unresolved code(s) emitted as {UNKNOWN}",
            kind.key(),
            report.lookup_misses
        );
    }

    let journal = assemble(lines, &ctx.meta, tolerance);
    report.lines_written = journal.lines.len();
    info!(
        "{}: {} rows in, {} dropped, {} lines out",
        kind.key(),
        report.rows_loaded,
        report.rows_dropped,
        report.lines_written
    );
    Ok((journal, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(kind: JournalKind) -> RunContext {
        let mut locations = CodeMap::new();
        locations.insert("Riverside", "110");
        locations.insert("Hill Street", "120");
        let mut departments = CodeMap::new();
        departments.insert("Leisure Ops", "501");
        departments.insert("Catering", "620");
        RunContext {
            meta: JournalMeta::new(
                kind.name(),
                kind.document_code(),
                "June",
                2025,
                kind.reverses(),
                "100",
            )
            .unwrap(),
            locations,
            departments,
            match_config: MatchConfig::default(),
        }
    }

    fn hourly_row(hours: &str, rate: &str, memo: &str, side: &str) -> RawRow {
        RawRow::from_pairs(&[
            ("Hours Worked", hours),
            ("Rate of Pay Per Hour", rate),
            ("Memo", memo),
            ("Account", "4100"),
            ("Location", "Riverside"),
            ("Department", "Catering"),
            ("Description", "P03 2025"),
            ("Entry Type", side),
        ])
    }

    #[test]
    fn test_every_kind_round_trips_its_key() {
        for kind in ALL_KINDS {
            assert_eq!(JournalKind::from_key(kind.key()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unsupported_type_is_rejected_by_name() {
        let err = JournalKind::from_key("bonusRun").unwrap_err();
        assert!(err.to_string().contains("bonusRun"));
    }

    #[test]
    fn test_hourly_run_end_to_end_balances() {
        let rows = vec![
            hourly_row("10", "12.50", "Bar staff", "Debit"),
            hourly_row("8", "11.00", "Kitchen", "Debit"),
            hourly_row("17.04", "12.50", "Net Wages", "Credit"),
        ];
        let (journal, report) =
            execute(JournalKind::Hourly, &ctx(JournalKind::Hourly), &rows, None, 0.02).unwrap();
        assert_eq!(report.rows_loaded, 3);
        assert_eq!(report.rows_dropped, 0);
        assert_eq!(report.lines_written, 3);
        assert!(journal.balanced);
        assert_eq!(journal.debit_total, 213.0);
        assert_eq!(journal.credit_total, 213.0);
        assert_eq!(journal.lines[0].line_no, Some(1));
        assert_eq!(journal.lines[2].line_no, Some(3));
    }

    #[test]
    fn test_dropped_rows_counted() {
        let rows = vec![
            hourly_row("10", "12.50", "Bar staff", "Debit"),
            hourly_row("ten", "12.50", "Bad row", "Debit"),
        ];
        let (_, report) =
            execute(JournalKind::Hourly, &ctx(JournalKind::Hourly), &rows, None, 0.02).unwrap();
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(report.lines_written, 1);
    }

    #[test]
    fn test_lookup_misses_counted_not_fatal() {
        let rows = vec![RawRow::from_pairs(&[
            ("Hours Worked", "2"),
            ("Rate of Pay Per Hour", "10"),
            ("Memo", "Bar staff"),
            ("Account", "4100"),
            ("Location", "Atlantis"),
            ("Department", "Catering"),
        ])];
        let (journal, report) =
            execute(JournalKind::Hourly, &ctx(JournalKind::Hourly), &rows, None, 0.02).unwrap();
        assert_eq!(report.lookup_misses, 1);
        assert_eq!(journal.lines[0].location_id, UNKNOWN);
    }

    #[test]
    fn test_cross_charge_run_always_balances() {
        let rows = vec![RawRow::from_pairs(&[
            ("Hours Worked", "10"),
            ("Rate of Pay Per Hour", "12.5"),
            ("Memo", "Cover shift"),
            ("Account", "4100"),
            ("From Location", "Riverside"),
            ("To Location", "Hill Street"),
            ("From Department", "Catering"),
            ("To Department", "Leisure Ops"),
        ])];
        let (journal, _) = execute(
            JournalKind::CrossCharge,
            &ctx(JournalKind::CrossCharge),
            &rows,
            None,
            0.02,
        )
        .unwrap();
        assert_eq!(journal.lines.len(), 2);
        assert!(journal.balanced);
    }

    #[test]
    fn test_levy_requires_total() {
        let rows = vec![RawRow::from_pairs(&[
            ("Cost Centre", "Riverside"),
            ("Employer NI", "100"),
        ])];
        let err = execute(
            JournalKind::ApLevy,
            &ctx(JournalKind::ApLevy),
            &rows,
            None,
            0.02,
        )
        .unwrap_err();
        assert!(matches!(err, PayrunError::MissingTotal(_)));
    }

    #[test]
    fn test_levy_run_balances_within_tolerance() {
        let rows = vec![
            RawRow::from_pairs(&[("Cost Centre", "Riverside"), ("Employer NI", "301.17")]),
            RawRow::from_pairs(&[("Cost Centre", "Hill Street"), ("Employer NI", "98.83")]),
            RawRow::from_pairs(&[("Cost Centre", "Closed Site"), ("Employer NI", "abc")]),
        ];
        let (journal, report) = execute(
            JournalKind::ApLevy,
            &ctx(JournalKind::ApLevy),
            &rows,
            Some(800.0),
            0.02,
        )
        .unwrap();
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(journal.lines.len(), 3);
        assert!(journal.balanced);
    }

    #[test]
    fn test_accrual_kind_sets_reverse_date() {
        let rows = vec![hourly_row("10", "12.50", "Bar staff", "Debit")];
        let (journal, _) = execute(
            JournalKind::HourlyAccrual,
            &ctx(JournalKind::HourlyAccrual),
            &rows,
            None,
            0.02,
        )
        .unwrap();
        assert_eq!(journal.lines[0].reverse_date, "01/07/2025");
        assert_eq!(journal.lines[0].document, "HRAC-P03-25");
    }
}
