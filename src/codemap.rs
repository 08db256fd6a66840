use std::collections::HashMap;

use log::warn;

use crate::normalize::normalize;
use crate::source::RawRow;

/// Lookup table from canonical lowercase names (and codes) to canonical
/// codes, built fresh per run from a reference table. Duplicate names with a
/// different code are logged, not rejected; last writer wins. Flagged for
/// product-owner confirmation; do not switch to first-write-wins silently.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
    entries: HashMap<String, String>,
}

impl CodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key after normalization. Empty keys are skipped.
    pub fn insert(&mut self, key: &str, code: &str) {
        let key = normalize(key);
        if key.is_empty() {
            return;
        }
        if let Some(existing) = self.entries.get(&key) {
            if existing != code {
                warn!("duplicate code-map entry '{key}': {existing} replaced by {code}");
            }
        }
        self.entries.insert(key, code.to_string());
    }

    /// Lookup by already-normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a map from reference rows. Both the name and the code are
    /// inserted as keys mapping to the code, so a lookup that already holds
    /// a valid code passes through unchanged. Rows missing either field are
    /// skipped. If neither expected column appears anywhere in the table the
    /// condition is reported with the columns actually observed, and the
    /// (empty) map is still returned, and every later lookup then degrades to
    /// "UNKNOWN" through the resolver instead of aborting the run.
    pub fn build(rows: &[RawRow], name_col: &str, code_col: &str) -> CodeMap {
        let mut map = CodeMap::new();
        let mut saw_columns = false;
        for row in rows {
            let name = row.get(name_col);
            let code = row.get(code_col);
            if name.is_some() || code.is_some() {
                saw_columns = true;
            }
            let (Some(name), Some(code)) = (name, code) else {
                continue;
            };
            if name.is_empty() || code.is_empty() {
                continue;
            }
            map.insert(name, code);
            map.insert(code, code);
        }
        if !rows.is_empty() && !saw_columns {
            let observed = rows[0].columns().join(", ");
            warn!(
                "reference table has neither '{name_col}' nor '{code_col}' \
                 (observed columns: {observed}); lookups will resolve to UNKNOWN"
            );
        }
        map
    }

    /// Merge manual overrides, the explicit corrections for known-bad source
    /// data. Overrides always win, regardless of load order.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (key, code) in overrides {
            let key = normalize(key);
            if key.is_empty() {
                continue;
            }
            self.entries.insert(key, code.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_rows(pairs: &[(&str, &str)]) -> Vec<RawRow> {
        pairs
            .iter()
            .map(|(name, code)| {
                RawRow::from_pairs(&[("Location", name), ("Location Code", code)])
            })
            .collect()
    }

    #[test]
    fn test_build_inserts_name_and_code_keys() {
        let rows = reference_rows(&[("Leisure Ops", "501")]);
        let map = CodeMap::build(&rows, "Location", "Location Code");
        assert_eq!(map.get("leisure ops"), Some("501"));
        assert_eq!(map.get("501"), Some("501"));
    }

    #[test]
    fn test_build_skips_incomplete_rows() {
        let rows = vec![
            RawRow::from_pairs(&[("Location", "Leisure Ops"), ("Location Code", "501")]),
            RawRow::from_pairs(&[("Location", "No Code"), ("Location Code", "")]),
            RawRow::from_pairs(&[("Location", ""), ("Location Code", "502")]),
        ];
        let map = CodeMap::build(&rows, "Location", "Location Code");
        assert_eq!(map.len(), 2); // name + code for the one complete row
    }

    #[test]
    fn test_duplicate_entry_last_write_wins() {
        let rows = reference_rows(&[("Leisure Ops", "501"), ("Leisure Ops", "502")]);
        let map = CodeMap::build(&rows, "Location", "Location Code");
        assert_eq!(map.get("leisure ops"), Some("502"));
    }

    #[test]
    fn test_missing_columns_returns_empty_map() {
        let rows = vec![RawRow::from_pairs(&[("Site", "Leisure Ops"), ("Ref", "501")])];
        let map = CodeMap::build(&rows, "Location", "Location Code");
        assert!(map.is_empty());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let rows = reference_rows(&[("Leisure Ops", "501")]);
        let mut map = CodeMap::build(&rows, "Location", "Location Code");
        let mut overrides = HashMap::new();
        overrides.insert("Leisure Ops".to_string(), "777".to_string());
        map.apply_overrides(&overrides);
        assert_eq!(map.get("leisure ops"), Some("777"));
    }

    #[test]
    fn test_keys_are_normalized_on_insert_and_lookup() {
        let mut map = CodeMap::new();
        map.insert("  Leisure\u{a0}Ops ", "501");
        assert_eq!(map.get("leisure ops"), Some("501"));
    }
}
