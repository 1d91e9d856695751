// src/utils/id.rs

//! Synthetic identifiers for relation resources.
//!
//! Relations without a remote identity of their own are addressed by their
//! key parts joined with `/`, e.g. `<team-uuid>/<project-uuid>`.

use crate::error::{AppError, Result};

const SEPARATOR: char = '/';

/// Join identifier parts into a synthetic id.
pub fn encode(parts: &[&str]) -> String {
    parts.join("/")
}

/// Split a synthetic id into exactly `N` parts.
///
/// `format` is echoed in the error, e.g. `"team_id/project_id"`.
pub fn decode<'a, const N: usize>(id: &'a str, format: &str) -> Result<[&'a str; N]> {
    let parts: Vec<&str> = id.split(SEPARATOR).collect();
    <[&str; N]>::try_from(parts).map_err(|_| AppError::invalid_import_id(format, id))
}
