//! Row classification: one source row in, one accepted [`Region`] or a skip
//! reason out. Row-level problems never abort the run; they are counted and
//! surfaced in the final summary.

use crate::region::{self, Region};

/// Status labels the registry uses for a live code. An empty status field
/// also counts as active, matching registry exports that omit the column
/// value for current codes.
const ACTIVE_MARKERS: &[&str] = &["존재", "存在"];

pub fn is_active(status: &str) -> bool {
    let trimmed = status.trim();
    trimmed.is_empty() || ACTIVE_MARKERS.contains(&trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Status marked the code as retired (폐지).
    Retired,
    /// Level beyond the configured maximum depth.
    DepthLimit,
    /// Empty code or name, or a code that is not a 10-digit string.
    Malformed,
}

impl SkipReason {
    /// Report label, matching the registry's own terminology.
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::Retired => "폐지",
            SkipReason::DepthLimit => "레벨제한",
            SkipReason::Malformed => "기타",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipCounts {
    pub retired: usize,
    pub depth_limit: usize,
    pub malformed: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Retired => self.retired += 1,
            SkipReason::DepthLimit => self.depth_limit += 1,
            SkipReason::Malformed => self.malformed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.retired + self.depth_limit + self.malformed
    }
}

/// Classifies one row. Checks run in a fixed order: malformed fields first,
/// then retirement status, then level determination, then the depth filter.
pub fn classify_row(
    code: &str,
    name: &str,
    status: &str,
    max_level: u8,
) -> Result<Region, SkipReason> {
    let code = code.trim();
    let name = name.trim();
    if code.is_empty() || name.is_empty() {
        return Err(SkipReason::Malformed);
    }
    if !is_active(status) {
        return Err(SkipReason::Retired);
    }
    let level = region::level_of(code).ok_or(SkipReason::Malformed)?;
    if level > max_level {
        return Err(SkipReason::DepthLimit);
    }
    Ok(Region {
        code: code.to_string(),
        name: region::escape_sql_string(name),
        parent_code: region::parent_code_of(code, level),
        level,
    })
}
