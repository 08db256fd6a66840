use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// One parsed source row: column name -> raw text value. Source extracts
/// have no fixed schema; fields are accessed by name with synonym fallbacks
/// because column headings drift between payroll exports ("Hours Worked "
/// with a trailing space, "Hours", ...). Headers are trimmed at load time so
/// the engine only ever sees clean names.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    #[allow(dead_code)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut fields = HashMap::new();
        for (name, value) in pairs {
            fields.insert(name.trim().to_string(), value.to_string());
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim())
    }

    /// First non-empty value among synonym column names.
    pub fn first(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|n| self.get(n))
            .find(|v| !v.is_empty())
    }

    pub fn columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        cols.sort_unstable();
        cols
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

/// Load a delimited extract into rows. Flexible parsing: ragged records are
/// tolerated, fully empty rows are skipped, headers are trimmed. A record
/// that fails to parse aborts the whole load; a journal built from a
/// partial extract would balance while missing pay.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut fields = HashMap::new();
        for (i, value) in record.iter().enumerate() {
            let Some(name) = headers.get(i) else { break };
            if name.is_empty() {
                continue;
            }
            fields.insert(name.clone(), value.to_string());
        }
        let row = RawRow { fields };
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}
