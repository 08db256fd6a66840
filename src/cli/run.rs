use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::Table;
use log::{info, warn};

use crate::assembler::AssembledJournal;
use crate::codemap::CodeMap;
use crate::error::Result;
use crate::export::write_journal;
use crate::fmt::money;
use crate::journal::JournalMeta;
use crate::pipeline::{execute, JournalKind, RunContext, RunReport};
use crate::settings::{load_overrides, load_settings};
use crate::source::load_rows;

// Reference-table columns for the cost-centre lookup maps.
const REF_LOCATION_NAME: &str = "Location";
const REF_LOCATION_CODE: &str = "Location Code";
const REF_DEPT_NAME: &str = "Department";
const REF_DEPT_CODE: &str = "Department Code";

pub struct RunArgs<'a> {
    pub journal_type: &'a str,
    pub input: &'a str,
    pub month: &'a str,
    pub year: i32,
    pub cost_centres: Option<&'a str>,
    pub total: Option<f64>,
    pub output: &'a str,
}

fn build_code_maps(cost_centres: Option<&str>) -> Result<(CodeMap, CodeMap)> {
    let Some(path) = cost_centres else {
        warn!("no cost-centre reference supplied; every lookup will resolve to UNKNOWN");
        return Ok((CodeMap::new(), CodeMap::new()));
    };
    let rows = load_rows(Path::new(path))?;
    let locations = CodeMap::build(&rows, REF_LOCATION_NAME, REF_LOCATION_CODE);
    let departments = CodeMap::build(&rows, REF_DEPT_NAME, REF_DEPT_CODE);
    if locations.is_empty() && departments.is_empty() {
        warn!("cost-centre reference {path} yielded no mappings");
    } else {
        info!(
            "loaded {} location and {} department mapping(s) from {path}",
            locations.len(),
            departments.len()
        );
    }
    Ok((locations, departments))
}

fn print_summary(kind: JournalKind, journal: &AssembledJournal, report: &RunReport, output: &str) {
    let mut table = Table::new();
    table.set_header(vec!["", kind.name()]);
    table.add_row(vec!["Rows loaded".to_string(), report.rows_loaded.to_string()]);
    table.add_row(vec!["Rows dropped".to_string(), report.rows_dropped.to_string()]);
    table.add_row(vec![
        "Lookup misses".to_string(),
        report.lookup_misses.to_string(),
    ]);
    table.add_row(vec![
        "Lines written".to_string(),
        report.lines_written.to_string(),
    ]);
    table.add_row(vec!["Debits".to_string(), money(journal.debit_total)]);
    table.add_row(vec!["Credits".to_string(), money(journal.credit_total)]);
    table.add_row(vec!["Difference".to_string(), money(journal.difference)]);
    println!("{table}");

    if journal.balanced {
        println!("{} journal balanced, written to {output}", "OK".green());
    } else {
        println!(
            "{} journal out of balance by {}; written to {output} for review",
            "WARNING".yellow(),
            money(journal.difference)
        );
    }
    if report.lookup_misses > 0 {
        println!(
            "{} {} UNKNOWN code(s) in the output need manual correction",
            "WARNING".yellow(),
            report.lookup_misses
        );
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let settings = load_settings();
    let kind = JournalKind::from_key(args.journal_type)?;

    let meta = JournalMeta::new(
        kind.name(),
        kind.document_code(),
        args.month,
        args.year,
        kind.reverses(),
        &settings.source_entity,
    )?;

    let (mut locations, mut departments) = build_code_maps(args.cost_centres)?;
    if let Some(path) = &settings.overrides_path {
        let overrides = load_overrides(Path::new(path))?;
        locations.apply_overrides(&overrides.locations);
        departments.apply_overrides(&overrides.departments);
    }

    let ctx = RunContext {
        meta,
        locations,
        departments,
        match_config: settings.match_config(),
    };

    let rows = load_rows(&PathBuf::from(args.input))?;
    let (journal, report) = execute(kind, &ctx, &rows, args.total, settings.balance_tolerance)?;

    write_journal(Path::new(args.output), &journal.lines)?;
    print_summary(kind, &journal, &report, args.output);
    Ok(())
}
