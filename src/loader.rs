//! Header-to-role resolution for registry exports.
//!
//! Source files name their columns inconsistently across publications, so
//! roles are resolved by keyword matching over the header row rather than by
//! position. The rules live in an ordered table; adding a new header variant
//! means adding a keyword, not touching control flow.

use serde::Serialize;
use thiserror::Error;

/// Semantic roles a header cell can resolve to, checked in this order. A
/// cell claims at most one role, and a role binds to the first cell that
/// matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Code,
    Name,
    Status,
}

/// Keywords are matched as substrings of the trimmed, lowercased header
/// cell, so the English synonyms are case-insensitive and the Korean forms
/// match compound headers such as `법정동코드(10자리)` or `폐지일자`.
const ROLE_RULES: &[(Role, &[&str])] = &[
    (Role::Code, &["법정동코드", "code"]),
    (Role::Name, &["법정동명", "name"]),
    (Role::Status, &["폐지", "status"]),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("no header cell matched the required '{0}' role")]
    MissingRole(&'static str),
    #[error("input has no header row")]
    EmptyHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub header: String,
}

/// Resolved column positions for the three semantic roles. Code and name
/// are mandatory; a missing status column means every row counts as active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMap {
    pub code: ColumnRef,
    pub name: ColumnRef,
    pub status: Option<ColumnRef>,
}

pub fn map_roles(headers: &[String]) -> Result<RoleMap, HeaderError> {
    if headers.is_empty() {
        return Err(HeaderError::EmptyHeader);
    }
    let mut code = None;
    let mut name = None;
    let mut status = None;
    for (index, header) in headers.iter().enumerate() {
        let cell = header.trim().to_lowercase();
        let matched = ROLE_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| cell.contains(kw)))
            .map(|(role, _)| *role);
        let slot = match matched {
            Some(Role::Code) => &mut code,
            Some(Role::Name) => &mut name,
            Some(Role::Status) => &mut status,
            None => continue,
        };
        if slot.is_none() {
            *slot = Some(ColumnRef {
                index,
                header: header.trim().to_string(),
            });
        }
    }
    Ok(RoleMap {
        code: code.ok_or(HeaderError::MissingRole("code"))?,
        name: name.ok_or(HeaderError::MissingRole("name"))?,
        status,
    })
}
