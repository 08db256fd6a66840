use comfy_table::Table;

use crate::error::Result;
use crate::pipeline::ALL_KINDS;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Journal", "Document"]);
    for kind in ALL_KINDS {
        table.add_row(vec![kind.key(), kind.name(), kind.document_code()]);
    }
    println!("{table}");
    Ok(())
}
