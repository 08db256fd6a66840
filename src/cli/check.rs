use std::path::Path;

use colored::Colorize;

use crate::assembler::balance_totals;
use crate::error::Result;
use crate::export::read_journal;
use crate::fmt::money;
use crate::settings::load_settings;

pub fn run(file: &str) -> Result<()> {
    let settings = load_settings();
    let lines = read_journal(Path::new(file))?;
    let (debits, credits, difference) = balance_totals(&lines);

    println!(
        "{} line(s), debits {}, credits {}",
        lines.len(),
        money(debits),
        money(credits)
    );
    if difference.abs() <= settings.balance_tolerance {
        println!("{} balanced (difference {})", "OK".green(), money(difference));
    } else {
        println!(
            "{} out of balance by {}",
            "WARNING".yellow(),
            money(difference)
        );
    }
    Ok(())
}
