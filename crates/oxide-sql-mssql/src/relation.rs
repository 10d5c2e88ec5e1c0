//! The slice of a query-builder relation the exists rewrite works on.
//!
//! A [`Relation`] records what a SELECT will contain (projection, DISTINCT,
//! filters, ordering, paging) and renders it as T-SQL for inspection.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_mssql::identifier::IdentifierQuoter;
//! use oxide_sql_mssql::quoting::TsqlQuoting;
//! use oxide_sql_mssql::relation::Relation;
//!
//! let sql = Relation::new("users")
//!     .select(["name"])
//!     .where_eq("active", true)
//!     .limit(10)
//!     .to_sql(&IdentifierQuoter::new(), &TsqlQuoting::new());
//!
//! assert_eq!(
//!     sql,
//!     "SELECT name FROM [users] WHERE [active] = 1 \
//!      ORDER BY [users].[id] ASC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
//! );
//! ```

use core::fmt;

use crate::identifier::IdentifierQuoter;
use crate::quoting::{HostQuoting, TsqlQuoting};
use crate::value::{SqlValue, ToSqlValue};

/// Primary key used when none is configured.
const DEFAULT_PRIMARY_KEY: &str = "id";

/// A raw SQL snippet used in a projection or an ORDER BY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral {
    sql: String,
    retryable: bool,
}

impl SqlLiteral {
    /// Wraps raw SQL.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            retryable: false,
        }
    }

    /// Wraps raw SQL that is safe to re-execute, letting the compiler reuse
    /// cached statements that contain it.
    #[must_use]
    pub fn retryable(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            retryable: true,
        }
    }

    /// The SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Whether the snippet is marked retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl From<&str> for SqlLiteral {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for SqlLiteral {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// A SQL template with positional `?` placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    template: String,
    binds: Vec<SqlValue>,
}

impl SqlFragment {
    /// Creates a fragment without binds.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            binds: Vec::new(),
        }
    }

    /// Appends a bind value for the next placeholder.
    #[must_use]
    pub fn bind<T: ToSqlValue>(mut self, value: T) -> Self {
        self.binds.push(value.to_sql_value());
        self
    }

    /// The template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The bind values, in placeholder order.
    #[must_use]
    pub fn binds(&self) -> &[SqlValue] {
        &self.binds
    }

    /// True if the fragment carries no SQL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.template.trim().is_empty()
    }

    /// Substitutes each `?` outside string literals with its quoted bind.
    ///
    /// Placeholders without a matching bind are left in place.
    #[must_use]
    pub fn render<H: HostQuoting>(&self, quoting: &TsqlQuoting<H>) -> String {
        let mut sql = String::with_capacity(self.template.len());
        let mut binds = self.binds.iter();
        let mut in_string = false;

        for c in self.template.chars() {
            match c {
                '\'' => {
                    in_string = !in_string;
                    sql.push(c);
                }
                '?' if !in_string => match binds.next() {
                    Some(value) => sql.push_str(&quoting.quote(value)),
                    None => sql.push(c),
                },
                _ => sql.push(c),
            }
        }
        sql
    }
}

/// A WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`, or `column IS NULL` for NULL.
    Eq {
        /// Column name, quoted when rendered.
        column: String,
        /// Compared value.
        value: SqlValue,
    },
    /// A raw template with binds.
    Fragment(SqlFragment),
}

impl Predicate {
    fn to_sql<H: HostQuoting>(
        &self,
        names: &IdentifierQuoter,
        values: &TsqlQuoting<H>,
    ) -> String {
        match self {
            Self::Eq { column, value } if value.is_null() => {
                format!("{} IS NULL", names.quote_column_name(column))
            }
            Self::Eq { column, value } => {
                format!("{} = {}", names.quote_column_name(column), values.quote(value))
            }
            Self::Fragment(fragment) => format!("({})", fragment.render(values)),
        }
    }
}

/// A part of a relation that [`Relation::except`] can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// The projection.
    Select,
    /// The DISTINCT flag.
    Distinct,
    /// WHERE predicates.
    Where,
    /// ORDER BY entries.
    Order,
    /// The row limit.
    Limit,
    /// The row offset.
    Offset,
}

/// A relation under construction.
///
/// Mutators take and return `self` so calls chain; every clause can be
/// read back through an accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    table: String,
    primary_key: String,
    distinct: bool,
    select_values: Vec<SqlLiteral>,
    where_clauses: Vec<Predicate>,
    order_values: Vec<SqlLiteral>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Relation {
    /// Creates a relation over `table` with primary key `id`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: String::from(DEFAULT_PRIMARY_KEY),
            distinct: false,
            select_values: vec![],
            where_clauses: vec![],
            order_values: vec![],
            limit: None,
            offset: None,
        }
    }

    /// Sets the primary key column.
    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Sets or clears DISTINCT.
    #[must_use]
    pub const fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Appends projection entries.
    #[must_use]
    pub fn select<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SqlLiteral>,
    {
        self.select_values.extend(items.into_iter().map(Into::into));
        self
    }

    /// Adds a predicate; predicates are joined with AND.
    #[must_use]
    pub fn where_predicate(mut self, predicate: Predicate) -> Self {
        self.where_clauses.push(predicate);
        self
    }

    /// Adds `column = value`.
    #[must_use]
    pub fn where_eq<T: ToSqlValue>(self, column: impl Into<String>, value: T) -> Self {
        self.where_predicate(Predicate::Eq {
            column: column.into(),
            value: value.to_sql_value(),
        })
    }

    /// Adds a raw fragment.
    #[must_use]
    pub fn where_fragment(self, fragment: SqlFragment) -> Self {
        self.where_predicate(Predicate::Fragment(fragment))
    }

    /// Appends ORDER BY entries.
    #[must_use]
    pub fn order<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SqlLiteral>,
    {
        self.order_values.extend(items.into_iter().map(Into::into));
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the row offset.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Removes the given clauses.
    #[must_use]
    pub fn except(mut self, clauses: &[Clause]) -> Self {
        for clause in clauses {
            match clause {
                Clause::Select => self.select_values.clear(),
                Clause::Distinct => self.distinct = false,
                Clause::Where => self.where_clauses.clear(),
                Clause::Order => self.order_values.clear(),
                Clause::Limit => self.limit = None,
                Clause::Offset => self.offset = None,
            }
        }
        self
    }

    /// The table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The primary key column.
    #[must_use]
    pub fn primary_key_name(&self) -> &str {
        &self.primary_key
    }

    /// Whether DISTINCT is set.
    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// The projection, empty for `*`.
    #[must_use]
    pub fn select_values(&self) -> &[SqlLiteral] {
        &self.select_values
    }

    /// The WHERE predicates.
    #[must_use]
    pub fn where_clauses(&self) -> &[Predicate] {
        &self.where_clauses
    }

    /// The ORDER BY entries.
    #[must_use]
    pub fn order_values(&self) -> &[SqlLiteral] {
        &self.order_values
    }

    /// The row limit.
    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// The row offset.
    #[must_use]
    pub const fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Renders the relation as T-SQL with inline literals.
    ///
    /// Paging uses `OFFSET ... FETCH`, which SQL Server only accepts after an
    /// ORDER BY; without one the primary key is used. Under DISTINCT that key
    /// must also be in the projection, which is what the exists rewrite
    /// works around.
    #[must_use]
    pub fn to_sql<H: HostQuoting>(
        &self,
        names: &IdentifierQuoter,
        values: &TsqlQuoting<H>,
    ) -> String {
        let table = names.quote_table_name(&self.table);
        let mut sql = String::from("SELECT ");

        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.select_values.is_empty() {
            sql.push_str(&format!("{table}.*"));
        } else {
            sql.push_str(&join(&self.select_values));
        }

        sql.push_str(" FROM ");
        sql.push_str(&table);

        if !self.where_clauses.is_empty() {
            let predicates: Vec<String> = self
                .where_clauses
                .iter()
                .map(|p| p.to_sql(names, values))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        let paged = self.limit.is_some() || self.offset.is_some();
        if !self.order_values.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&join(&self.order_values));
        } else if paged {
            let key = names.quote_column_name(&self.primary_key);
            sql.push_str(&format!(" ORDER BY {table}.{key} ASC"));
        }

        if paged {
            sql.push_str(&format!(" OFFSET {} ROWS", self.offset.unwrap_or(0)));
            if let Some(n) = self.limit {
                sql.push_str(&format!(" FETCH NEXT {n} ROWS ONLY"));
            }
        }

        sql
    }
}

fn join(items: &[SqlLiteral]) -> String {
    items
        .iter()
        .map(SqlLiteral::sql)
        .collect::<Vec<_>>()
        .join(", ")
}
