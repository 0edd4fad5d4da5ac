//! Row decoding and query-building helpers shared by the query modules.

use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use rusqlite::{types::Type, Row, ToSql};

use crate::{
    error::{Result, WorkflowError},
    models::Pagination,
};

/// Boxed positional parameters for dynamically built queries.
pub(crate) type SqlParams = Vec<Box<dyn ToSql>>;

/// Reads an INTEGER id column.
pub(crate) fn get_id(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}

/// Reads a nullable INTEGER id column.
pub(crate) fn get_optional_id(row: &Row, idx: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(|v| v as u64))
}

/// Reads an RFC 3339 TEXT column into a [`Timestamp`].
pub(crate) fn get_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads a nullable `YYYY-MM-DD` TEXT column into a civil [`Date`].
pub(crate) fn get_optional_date(row: &Row, idx: usize) -> rusqlite::Result<Option<Date>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| {
            raw.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Reads a TEXT column holding a status enum.
pub(crate) fn get_status<S>(row: &Row, idx: usize) -> rusqlite::Result<S>
where
    S: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<S>().map_err(|message| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    })
}

/// Reads a nullable INTEGER duration column.
pub(crate) fn get_optional_days(row: &Row, idx: usize) -> rusqlite::Result<Option<u32>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|days| {
            u32::try_from(days).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
            })
        })
        .transpose()
}

/// Converts a missing row into the given not-found error, other failures
/// into a database error.
pub(crate) fn not_found_or(
    error: rusqlite::Error,
    not_found: WorkflowError,
    message: &str,
) -> WorkflowError {
    if matches!(error, rusqlite::Error::QueryReturnedNoRows) {
        not_found
    } else {
        WorkflowError::database(message).with_source(error)
    }
}

/// Appends `WHERE` conditions joined with `AND`, if any.
pub(crate) fn push_conditions(query: &mut String, conditions: &[&str]) {
    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }
}

/// Appends a `LIMIT`/`OFFSET` clause for the pagination window.
pub(crate) fn push_pagination(
    query: &mut String,
    params: &mut SqlParams,
    pagination: Option<Pagination>,
) {
    if let Some(page) = pagination {
        query.push_str(" LIMIT ? OFFSET ?");
        params.push(Box::new(i64::from(page.limit)));
        params.push(Box::new(i64::from(page.offset)));
    }
}

/// `%value%` pattern for case-insensitive `LIKE` matching.
pub(crate) fn like_pattern(value: &str) -> String {
    format!("%{}%", value.to_lowercase())
}

/// Borrows boxed parameters for a query call.
pub(crate) fn param_refs(params: &SqlParams) -> Vec<&dyn ToSql> {
    params.iter().map(|b| &**b).collect()
}

/// Fails with `not_found` unless `exists` is true.
pub(crate) fn ensure_exists(exists: bool, not_found: WorkflowError) -> Result<()> {
    if exists {
        Ok(())
    } else {
        Err(not_found)
    }
}
