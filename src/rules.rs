//! Memo-driven derivation rules. The production behavior was driven by
//! memo-prefix checks scattered through the transform code; here the
//! precedence contract is an explicit ordered table evaluated first match
//! wins, so it can be tested directly.

use log::debug;

pub const DEPT_ROUNDING: &str = "900";
pub const DEPT_PT_CLASSES: &str = "501";
pub const LOC_CENTRAL: &str = "500";
pub const LOC_CLASSES: &str = "125";

fn memo_is_rounding(memo: &str) -> bool {
    memo.starts_with("Rounding")
}

fn memo_is_advance(memo: &str) -> bool {
    memo.starts_with("Advance")
}

/// Leading "P T", "Pt", or "Classes" token. Case-sensitive, like every memo
/// check here: the source system emits these labels verbatim. The two-token
/// form requires exactly "P" then "T"; "P Training" is not a class memo.
pub fn memo_is_pt_classes(memo: &str) -> bool {
    let mut tokens = memo.split_whitespace();
    let first = tokens.next().unwrap_or("");
    if first == "Pt" || first == "Classes" {
        return true;
    }
    first == "P" && tokens.next() == Some("T")
}

pub struct DeptRule {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
    pub dept: &'static str,
}

/// Department overrides in fixed precedence. Mutually exclusive by
/// construction: the first matching rule wins and the rest are not tested.
pub const DEPT_RULES: &[DeptRule] = &[
    DeptRule {
        name: "rounding",
        applies: memo_is_rounding,
        dept: DEPT_ROUNDING,
    },
    DeptRule {
        name: "advance",
        applies: memo_is_advance,
        dept: "",
    },
    DeptRule {
        name: "pt-classes",
        applies: memo_is_pt_classes,
        dept: DEPT_PT_CLASSES,
    },
];

/// Forced department for a memo, if any rule fires.
pub fn department_for_memo(memo: &str) -> Option<&'static str> {
    let rule = DEPT_RULES.iter().find(|rule| (rule.applies)(memo))?;
    debug!("memo rule '{}' forces department '{}'", rule.name, rule.dept);
    Some(rule.dept)
}

/// Location override for non-Tips memos: accounts in the 9xxx range and
/// rounding memos book centrally (500), except class activity which books to
/// the classes site (125). Tips keep the location resolved from the source
/// label; tips are distributed where they were earned.
pub fn location_override(memo: &str, acct_no: &str) -> Option<&'static str> {
    if memo.starts_with("Tips") {
        return None;
    }
    if acct_no.starts_with('9') || memo_is_rounding(memo) {
        if memo.starts_with("Classe") {
            return Some(LOC_CLASSES);
        }
        return Some(LOC_CENTRAL);
    }
    None
}
