//! SQL Server literal rules.

use tracing::trace;

use super::{
    Column, GenericQuoting, HostQuoting, quote_string, quote_string_single,
    quote_string_single_national,
};
use crate::cast::{CastKind, TypeMetadata, TypeMetadataOptions};
use crate::value::SqlValue;

/// Date-time serialization: ISO 8601 is read the same way whatever the
/// session's `DATEFORMAT` and `LANGUAGE` are.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQL Server quoting on top of a host's generic rules.
#[derive(Debug, Clone)]
pub struct TsqlQuoting<H = GenericQuoting> {
    host: H,
}

impl TsqlQuoting {
    /// Creates SQL Server quoting over the generic host rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            host: GenericQuoting::new(),
        }
    }
}

impl Default for TsqlQuoting {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unused_self)]
impl<H: HostQuoting> TsqlQuoting<H> {
    /// Wraps a host.
    #[must_use]
    pub const fn with_host(host: H) -> Self {
        Self { host }
    }

    /// The wrapped host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Literal for `true`. SQL Server has no boolean literal; `bit` takes 1.
    #[must_use]
    pub const fn quoted_true(&self) -> &'static str {
        "1"
    }

    /// Literal for `false`.
    #[must_use]
    pub const fn quoted_false(&self) -> &'static str {
        "0"
    }

    /// Bound value for `true`.
    #[must_use]
    pub const fn unquoted_true(&self) -> i64 {
        1
    }

    /// Bound value for `false`.
    #[must_use]
    pub const fn unquoted_false(&self) -> i64 {
        0
    }

    /// Escapes a string body without adding quotes.
    #[must_use]
    pub fn quote_string(&self, s: &str) -> String {
        quote_string(s)
    }

    /// Quotes a non-Unicode literal.
    #[must_use]
    pub fn quote_string_single(&self, s: &str) -> String {
        quote_string_single(s)
    }

    /// Quotes a Unicode literal.
    #[must_use]
    pub fn quote_string_single_national(&self, s: &str) -> String {
        quote_string_single_national(s)
    }

    /// Serializes temporal values; anything else passes through unchanged.
    #[must_use]
    pub fn quoted_date(&self, value: &SqlValue) -> SqlValue {
        match value {
            SqlValue::DateTime(dt) => SqlValue::Text(dt.format(DATETIME_FORMAT).to_string()),
            SqlValue::Date(d) => SqlValue::Text(d.format(DATE_FORMAT).to_string()),
            other => other.clone(),
        }
    }

    /// Renders a value as an inline literal.
    ///
    /// | value | literal |
    /// |---|---|
    /// | binary | `0x` and lowercase hex digits |
    /// | native | its own quoted form |
    /// | text | `N'...'` |
    /// | boolean | `1` / `0` |
    /// | date, date-time | `'...'` from [`Self::quoted_date`] |
    /// | anything else | the host's rendering |
    #[must_use]
    pub fn quote(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Binary(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("0x{hex}")
            }
            SqlValue::Native(native) => native.quoted(),
            SqlValue::Text(_) => format!("N{}", self.host.quote(value)),
            SqlValue::Bool(true) => String::from(self.quoted_true()),
            SqlValue::Bool(false) => String::from(self.quoted_false()),
            SqlValue::Date(_) | SqlValue::DateTime(_) => match self.quoted_date(value) {
                SqlValue::Text(serialized) => quote_string_single(&serialized),
                _ => self.host.quote(value),
            },
            _ => self.host.quote(value),
        }
    }

    /// Renders a schema-level column default.
    ///
    /// For `uniqueidentifier` columns a textual default containing `()` is
    /// a generator call such as `newid()` or `newsequentialid()` and is
    /// emitted as is. Everything else is rendered by [`Self::quote`].
    #[must_use]
    pub fn quote_default_expression(&self, value: &SqlValue, column: &Column) -> String {
        let cast_type = self.host.lookup_cast_type(&column.sql_type);
        if cast_type.kind == CastKind::Uuid {
            if let Some(expression) = value.as_text().filter(|text| text.contains("()")) {
                trace!(column = %column.name, expression, "Using raw default expression");
                return String::from(expression);
            }
        }
        self.quote(value)
    }

    /// Converts a value to its bound-parameter form.
    ///
    /// Native values bind as their plain text, booleans as 1/0.
    #[must_use]
    pub fn type_cast(&self, value: &SqlValue) -> SqlValue {
        match value {
            SqlValue::Native(native) => SqlValue::Text(native.to_string()),
            SqlValue::Bool(true) => SqlValue::Int(self.unquoted_true()),
            SqlValue::Bool(false) => SqlValue::Int(self.unquoted_false()),
            _ => self.host.type_cast(value),
        }
    }

    /// Builds the type metadata of a column.
    #[must_use]
    pub fn fetch_type_metadata(
        &self,
        sql_type: &str,
        options: TypeMetadataOptions,
    ) -> TypeMetadata {
        let cast_type = self.host.lookup_cast_type(sql_type);
        TypeMetadata::new(sql_type, cast_type, options)
    }
}
