use log::{debug, warn};
use regex::Regex;

use crate::codemap::CodeMap;
use crate::normalize::normalize;

/// Sentinel code for labels that fail every matching stage. Emitted into the
/// journal as a visible marker for manual correction rather than blocking
/// the run.
pub const UNKNOWN: &str = "UNKNOWN";

/// Minimum map-key lengths for the substring stages. The 3/5 thresholds come
/// straight from the production system; they are configurable via settings
/// rather than second-guessed here.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub word_match_min_len: usize,
    pub loose_match_min_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            word_match_min_len: 3,
            loose_match_min_len: 5,
        }
    }
}

/// Resolve a free-text label to a canonical code through ordered matching
/// stages, stopping at the first hit. Never fails: a miss returns
/// `default`. Source labels are typed by hand into forms ("Leisure Ops" vs
/// "leisure-ops"), so a single exact match would silently misroute costs;
/// stages 1-2 stay fully deterministic while 3-4 trade precision for match
/// rate. Every stage hit and every miss is logged; misrouted costs are a
/// financial-reporting risk.
pub fn resolve_or(
    raw_key: &str,
    map: &CodeMap,
    category: &str,
    default: &str,
    config: &MatchConfig,
) -> String {
    let key = normalize(raw_key);
    if key.is_empty() {
        warn!("{category}: empty key, using {default}");
        return default.to_string();
    }

    // Stage 1: exact match on the normalized key.
    if let Some(code) = map.get(&key) {
        debug!("{category}: exact match '{key}' -> {code}");
        return code.to_string();
    }

    // Map keys longest-first so the most specific candidate wins; tie-break
    // alphabetically to keep resolution deterministic.
    let mut candidates: Vec<&str> = map.keys().collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    // Stage 2: whole-string case-insensitive pattern match. Map keys that
    // fail to compile as a regex (stray metacharacters) are skipped. The
    // key is wrapped in a non-capturing group so alternation inside it
    // cannot escape the anchors.
    for cand in &candidates {
        let Ok(re) = Regex::new(&format!("(?i)^(?:{cand})$")) else {
            continue;
        };
        if re.is_match(&key) {
            let code = map.get(cand).unwrap_or(default);
            debug!("{category}: phrase match '{key}' ~ '{cand}' -> {code}");
            return code.to_string();
        }
    }

    // Stage 3: whole-word substring match.
    for cand in &candidates {
        if cand.len() < config.word_match_min_len {
            continue;
        }
        let pattern = format!(r"\b{}\b", regex::escape(cand));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if re.is_match(&key) {
            let code = map.get(cand).unwrap_or(default);
            debug!("{category}: word match '{key}' contains '{cand}' -> {code}");
            return code.to_string();
        }
    }

    // Stage 4: loose substring containment, longer minimum length to limit
    // false positives.
    for cand in &candidates {
        if cand.len() < config.loose_match_min_len {
            continue;
        }
        if key.contains(*cand) {
            let code = map.get(cand).unwrap_or(default);
            debug!("{category}: loose match '{key}' contains '{cand}' -> {code}");
            return code.to_string();
        }
    }

    warn!("{category}: no match for '{key}', using {default}");
    default.to_string()
}

/// `resolve_or` with the standard UNKNOWN default.
pub fn resolve(raw_key: &str, map: &CodeMap, category: &str, config: &MatchConfig) -> String {
    resolve_or(raw_key, map, category, UNKNOWN, config)
}
