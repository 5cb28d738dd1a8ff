//! The region record and the pure functions over 법정동 codes.
//!
//! A code is a fixed 10-digit string. Its hierarchy level and parent code
//! are determined entirely by its zero suffix:
//!
//! | level | unit      | shape                   | example      |
//! |-------|-----------|-------------------------|--------------|
//! | 1     | 시/도     | `XX00000000`            | `1100000000` |
//! | 2     | 시/군/구  | `XXXXX00000`, not L1    | `1111000000` |
//! | 3     | 읍/면/동  | `XXXXXXX000`, not L1/L2 | `1111010100` |
//! | 4     | 리        | anything else           | `4513533021` |

use serde::Serialize;

pub const CODE_LEN: usize = 10;

/// One accepted administrative region, ready for SQL emission. `name` is
/// stored already escaped for a single-quoted MySQL literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub parent_code: Option<String>,
    pub level: u8,
}

/// Hierarchy level of a code, or `None` when the code is not a 10-digit
/// string. Checked in strict precedence order; the first match wins.
pub fn level_of(code: &str) -> Option<u8> {
    let bytes = code.as_bytes();
    if bytes.len() != CODE_LEN || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let all_zero = |range: std::ops::Range<usize>| bytes[range].iter().all(|&b| b == b'0');
    if all_zero(2..10) {
        Some(1)
    } else if all_zero(5..10) {
        Some(2)
    } else if all_zero(7..10) {
        Some(3)
    } else {
        Some(4)
    }
}

/// The immediate ancestor's code: the leading prefix for the coarser level,
/// zero-padded back to 10 digits. Level 1 has no parent.
///
/// Caller guarantees `level == level_of(code)`.
pub fn parent_code_of(code: &str, level: u8) -> Option<String> {
    match level {
        2 => Some(format!("{}00000000", &code[..2])),
        3 => Some(format!("{}00000", &code[..5])),
        4 => Some(format!("{}000", &code[..7])),
        _ => None,
    }
}

pub fn level_name(level: u8) -> &'static str {
    match level {
        1 => "시/도",
        2 => "시/군/구",
        3 => "읍/면/동",
        4 => "리",
        _ => "기타",
    }
}

/// Escapes a display name for embedding in a single-quoted MySQL literal.
/// One character-level pass, so the output of one rule can never feed the
/// other: `'` becomes `''` and `\` becomes `\\`.
pub fn escape_sql_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}
