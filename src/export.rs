use std::path::Path;

use crate::derive::parse_number;
use crate::error::{PayrunError, Result};
use crate::journal::JournalLine;

/// Import-template column order. The ledger import rejects files whose
/// header row deviates, so this array is the single source of truth for
/// both writing and reading journals back.
pub const HEADERS: [&str; 14] = [
    "DONOTIMPORT",
    "LINE_NO",
    "DOCUMENT",
    "JOURNAL",
    "DATE",
    "REVERSEDATE",
    "DESCRIPTION",
    "ACCT_NO",
    "LOCATION_ID",
    "DEPT_ID",
    "MEMO",
    "DEBIT",
    "CREDIT",
    "SOURCEENTITY",
];

fn format_amount(v: Option<f64>) -> String {
    v.map(|a| format!("{a:.2}")).unwrap_or_default()
}

fn to_record(line: &JournalLine) -> [String; 14] {
    [
        line.donotimport.clone(),
        line.line_no.map(|n| n.to_string()).unwrap_or_default(),
        line.document.clone(),
        line.journal.clone(),
        line.date.clone(),
        line.reverse_date.clone(),
        line.description.clone(),
        line.acct_no.clone(),
        line.location_id.clone(),
        line.dept_id.clone(),
        line.memo.clone(),
        format_amount(line.debit),
        format_amount(line.credit),
        line.source_entity.clone(),
    ]
}

pub fn write_journal(path: &Path, lines: &[JournalLine]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADERS)?;
    for line in lines {
        wtr.write_record(to_record(line))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a journal file back, for re-checking its balance. Unknown columns
/// are ignored; DEBIT/CREDIT cells that fail to parse are treated as empty.
/// A file without both amount columns is not a journal and is rejected with
/// the headers actually observed.
pub fn read_journal(path: &Path) -> Result<Vec<JournalLine>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let idx = |name: &str| headers.iter().position(|h| h == name);
    for required in ["DEBIT", "CREDIT"] {
        if idx(required).is_none() {
            return Err(PayrunError::MissingColumn {
                file: path.display().to_string(),
                column: required.to_string(),
                found: headers.join(", "),
            });
        }
    }
    let field = |record: &csv::StringRecord, i: Option<usize>| -> String {
        i.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let (i_line, i_doc, i_journal, i_date, i_rev, i_desc) = (
        idx("LINE_NO"),
        idx("DOCUMENT"),
        idx("JOURNAL"),
        idx("DATE"),
        idx("REVERSEDATE"),
        idx("DESCRIPTION"),
    );
    let (i_acct, i_loc, i_dept, i_memo, i_debit, i_credit, i_entity) = (
        idx("ACCT_NO"),
        idx("LOCATION_ID"),
        idx("DEPT_ID"),
        idx("MEMO"),
        idx("DEBIT"),
        idx("CREDIT"),
        idx("SOURCEENTITY"),
    );

    let mut lines = Vec::new();
    for result in rdr.records() {
        let record = result?;
        lines.push(JournalLine {
            donotimport: String::new(),
            line_no: field(&record, i_line).parse().ok(),
            document: field(&record, i_doc),
            journal: field(&record, i_journal),
            date: field(&record, i_date),
            reverse_date: field(&record, i_rev),
            description: field(&record, i_desc),
            acct_no: field(&record, i_acct),
            location_id: field(&record, i_loc),
            dept_id: field(&record, i_dept),
            memo: field(&record, i_memo),
            debit: parse_number(&field(&record, i_debit)),
            credit: parse_number(&field(&record, i_credit)),
            source_entity: field(&record, i_entity),
        });
    }
    Ok(lines)
}
