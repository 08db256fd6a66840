use log::{info, warn};

use crate::journal::{round2, JournalLine, JournalMeta};

/// Memos dropped at assembly: entries the source duplicates from journals
/// already posted elsewhere. Prefix match, case-sensitive.
pub const NOISE_MEMO_PREFIXES: &[&str] = &["Tips already distributed", "DO NOT IMPORT"];

/// One run's finished journal plus the balance verdict.
#[derive(Debug)]
pub struct AssembledJournal {
    pub lines: Vec<JournalLine>,
    pub debit_total: f64,
    pub credit_total: f64,
    pub difference: f64,
    pub balanced: bool,
    pub dropped_noise: usize,
}

fn is_noise(line: &JournalLine) -> bool {
    NOISE_MEMO_PREFIXES
        .iter()
        .any(|p| line.memo.starts_with(p))
}

/// Sum a journal's debit and credit columns. Also used by `payrun check` on
/// files read back from disk.
pub fn balance_totals(lines: &[JournalLine]) -> (f64, f64, f64) {
    let debit_total = round2(lines.iter().filter_map(|l| l.debit).sum());
    let credit_total = round2(lines.iter().filter_map(|l| l.credit).sum());
    let difference = round2(debit_total - credit_total);
    (debit_total, credit_total, difference)
}

/// Final assembly, applied in order: attach the run metadata to every line,
/// drop noise memos, assign a dense 1-based LINE_NO independent of any
/// upstream numbering, fill DESCRIPTION forward from the most recent
/// non-empty value, then compare debit and credit totals. A difference over
/// the tolerance is a warning, never fatal: upstream data errors must not
/// block a time-sensitive payroll run, but they must be visible.
pub fn assemble(
    lines: Vec<JournalLine>,
    meta: &JournalMeta,
    tolerance: f64,
) -> AssembledJournal {
    let before = lines.len();
    let mut kept: Vec<JournalLine> = lines.into_iter().filter(|l| !is_noise(l)).collect();
    let dropped_noise = before - kept.len();
    if dropped_noise > 0 {
        info!("assembly: dropped {dropped_noise} noise line(s)");
    }

    let mut last_description = String::new();
    for (i, line) in kept.iter_mut().enumerate() {
        line.line_no = Some(i as u32 + 1);
        line.document = meta.document.clone();
        line.journal = meta.journal.clone();
        line.date = meta.date.clone();
        line.reverse_date = meta.reverse_date.clone();
        line.source_entity = meta.source_entity.clone();
        if line.description.is_empty() {
            line.description = last_description.clone();
        } else {
            last_description = line.description.clone();
        }
    }

    let (debit_total, credit_total, difference) = balance_totals(&kept);
    let balanced = difference.abs() <= tolerance;
    if balanced {
        info!(
            "journal balanced: debits {debit_total:.2}, credits {credit_total:.2}, \
             difference {difference:.2}"
        );
    } else {
        warn!(
            "journal out of balance by {difference:.2} (debits {debit_total:.2}, \
             credits {credit_total:.2}); emitting anyway for review"
        );
    }

    AssembledJournal {
        lines: kept,
        debit_total,
        credit_total,
        difference,
        balanced,
        dropped_noise,
    }
}
