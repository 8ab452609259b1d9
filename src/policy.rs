//! Read-only query policy
//!
//! Classifies raw SQL text with a real SQL grammar and enforces the
//! "single SELECT, bounded" policy for the ad-hoc query endpoint.

use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::GatewayError;

/// Row ceiling appended when the caller supplies no LIMIT of their own.
pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// Top-level statement kind, as far as the policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

/// Classify a parsed statement by its top-level node.
pub fn classify(stmt: &Statement) -> StatementKind {
    match stmt {
        Statement::Query(_) => StatementKind::Select,
        Statement::Insert(_) => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete(_) => StatementKind::Delete,
        _ => StatementKind::Other,
    }
}

/// Validate user-supplied SQL and return the text to execute.
///
/// The input must parse as exactly one SELECT statement. If the
/// case-insensitive text carries no `LIMIT` of its own, a default ceiling
/// of [`DEFAULT_ROW_LIMIT`] rows is appended. The LIMIT check is textual,
/// matching anywhere in the statement (subqueries and string literals
/// included); the observable behavior is kept as-is.
pub fn authorize(raw: &str) -> Result<String, GatewayError> {
    let sql = raw.trim();
    if sql.is_empty() {
        return Err(GatewayError::Validation("SQL cannot be empty".to_string()));
    }

    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql)
        .map_err(|e| GatewayError::Syntax(e.to_string()))?;

    if statements.is_empty() {
        return Err(GatewayError::Syntax("empty statement".to_string()));
    }

    if statements.len() > 1 || classify(&statements[0]) != StatementKind::Select {
        return Err(GatewayError::Policy(
            "only SELECT statements are allowed".to_string(),
        ));
    }

    if sql.to_uppercase().contains("LIMIT") {
        Ok(sql.to_string())
    } else {
        Ok(format!("{} LIMIT {}", sql, DEFAULT_ROW_LIMIT))
    }
}
