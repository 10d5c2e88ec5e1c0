//! Literal quoting.
//!
//! The host's generic SQL layer is modelled as [`HostQuoting`]: it knows how
//! to quote values the ANSI way and how to look up cast types.
//! [`TsqlQuoting`] wraps a host and applies SQL Server rules first, calling
//! the host only when no dialect rule matches.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_mssql::quoting::TsqlQuoting;
//! use oxide_sql_mssql::SqlValue;
//!
//! let quoting = TsqlQuoting::new();
//! assert_eq!(quoting.quote(&SqlValue::Text(String::from("hello"))), "N'hello'");
//! assert_eq!(quoting.quote(&SqlValue::Binary(vec![0xDE, 0xAD])), "0xdead");
//! ```

mod tsql;

pub use tsql::TsqlQuoting;

use crate::cast::{CastType, lookup_cast_type};
use crate::value::SqlValue;

/// Escapes a string for use between single quotes, without adding them.
#[must_use]
pub fn quote_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Quotes a non-Unicode string literal: `'it''s'`.
#[must_use]
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", quote_string(s))
}

/// Quotes a Unicode (national) string literal: `N'it''s'`.
#[must_use]
pub fn quote_string_single_national(s: &str) -> String {
    format!("N'{}'", quote_string(s))
}

/// The column a default value is being rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared type, e.g. `uniqueidentifier` or `nvarchar(50)`.
    pub sql_type: String,
}

impl Column {
    /// Creates a column description.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

/// Generic quoting supplied by the host SQL layer.
///
/// Every method has an ANSI default, so a host only overrides what it
/// renders differently.
pub trait HostQuoting {
    /// Escapes a string body.
    fn quote_string(&self, s: &str) -> String {
        quote_string(s)
    }

    /// Renders any value as an inline literal.
    fn quote(&self, value: &SqlValue) -> String {
        value.to_sql_inline()
    }

    /// Converts a value to the form bound as a statement parameter.
    fn type_cast(&self, value: &SqlValue) -> SqlValue {
        value.clone()
    }

    /// Looks up the cast type of a declared column type.
    fn lookup_cast_type(&self, sql_type: &str) -> CastType {
        lookup_cast_type(sql_type)
    }
}

/// The host rules with nothing overridden.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericQuoting;

impl GenericQuoting {
    /// Creates the generic host rules.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HostQuoting for GenericQuoting {}
