//! # oxide-sql-mssql
//!
//! The SQL Server dialect layer of a query builder.
//!
//! This crate provides:
//! - Bracket quoting of multi-part identifiers, memoized per name
//! - Matchers recognizing plain and ordered column references
//! - T-SQL literal rendering: national strings, hex binaries, `1`/`0` booleans
//! - The exists-probe rewrite that keeps DISTINCT with OFFSET valid
//!
//! ## Quoting
//!
//! ```rust
//! use oxide_sql_mssql::{IdentifierQuoter, SqlValue, TsqlQuoting};
//!
//! let names = IdentifierQuoter::new();
//! let values = TsqlQuoting::new();
//!
//! assert_eq!(names.quote_table_name("dbo.Orders"), "[dbo].[Orders]");
//! assert_eq!(values.quote(&SqlValue::Text(String::from("O'Brien"))), "N'O''Brien'");
//! assert_eq!(values.quote(&SqlValue::Bool(true)), "1");
//! ```
//!
//! ## Exists probes
//!
//! ```rust
//! use oxide_sql_mssql::exists::PermitAll;
//! use oxide_sql_mssql::{
//!     Conditions, IdentifierQuoter, Relation, TsqlQuoting, build_exists_relation,
//! };
//!
//! let base = Relation::new("users").select(["name"]).distinct(true).offset(10);
//! let probe = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();
//!
//! assert_eq!(
//!     probe.to_sql(&IdentifierQuoter::new(), &TsqlQuoting::new()),
//!     "SELECT DISTINCT name FROM [users] ORDER BY name \
//!      OFFSET 10 ROWS FETCH NEXT 1 ROWS ONLY"
//! );
//! ```

pub mod cast;
pub mod error;
pub mod exists;
pub mod identifier;
pub mod quoting;
pub mod relation;
pub mod value;

pub use cast::{CastKind, CastType, TypeMetadata, TypeMetadataOptions};
pub use error::{Error, Result};
pub use exists::{AttributePolicy, Conditions, build_exists_relation};
pub use identifier::IdentifierQuoter;
pub use quoting::{Column, GenericQuoting, HostQuoting, TsqlQuoting};
pub use relation::{Relation, SqlFragment, SqlLiteral};
pub use value::{NativeValue, SqlValue, ToSqlValue};
