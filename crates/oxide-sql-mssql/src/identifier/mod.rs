//! Identifier quoting.
//!
//! SQL Server delimits identifiers with brackets: `[dbo].[Users].[Name]`.
//! [`IdentifierQuoter`] turns raw, possibly multi-part and possibly
//! pre-quoted names into that form and memoizes the result.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_mssql::identifier::IdentifierQuoter;
//!
//! let quoter = IdentifierQuoter::new();
//! assert_eq!(quoter.quote_table_name("dbo.Users"), "[dbo].[Users]");
//! assert_eq!(quoter.quote_column_name("[Users].[Name]"), "[Users].[Name]");
//! ```

mod cache;
mod matcher;
mod name;

use std::sync::OnceLock;

use tracing::{debug, trace};

pub use cache::{CacheStats, NameCache};
pub use matcher::{ColumnNameMatcher, is_column_name, is_column_name_with_order};
pub use name::{Identifier, IdentifierPart, extract_identifiers};

/// Quotes column and table names, caching each rendering.
///
/// Column and table names are cached separately even though both currently
/// quote the same way.
#[derive(Debug, Default)]
pub struct IdentifierQuoter {
    columns: NameCache,
    tables: NameCache,
}

impl IdentifierQuoter {
    /// Creates a quoter with empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a quoter over the given caches.
    #[must_use]
    pub fn with_caches(columns: NameCache, tables: NameCache) -> Self {
        Self { columns, tables }
    }

    /// Returns the process-wide quoter.
    ///
    /// It is created on first use and lives until the process exits; its
    /// caches only ever grow.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<IdentifierQuoter> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Quotes a column name, e.g. `users.name` becomes `[users].[name]`.
    #[must_use]
    pub fn quote_column_name(&self, name: &str) -> String {
        quote_cached(&self.columns, "column", name)
    }

    /// Quotes a table name, e.g. `dbo.Users` becomes `[dbo].[Users]`.
    #[must_use]
    pub fn quote_table_name(&self, name: &str) -> String {
        quote_cached(&self.tables, "table", name)
    }

    /// The cache backing [`Self::quote_column_name`].
    #[must_use]
    pub const fn column_cache(&self) -> &NameCache {
        &self.columns
    }

    /// The cache backing [`Self::quote_table_name`].
    #[must_use]
    pub const fn table_cache(&self) -> &NameCache {
        &self.tables
    }
}

fn quote_cached(cache: &NameCache, kind: &'static str, name: &str) -> String {
    if let Some(quoted) = cache.get(name) {
        trace!(cache = kind, raw = name, "Quoted name cache hit");
        return quoted;
    }
    let quoted = extract_identifiers(name).quoted();
    debug!(cache = kind, raw = name, quoted = %quoted, "Quoted name cache miss");
    cache.insert(name, quoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_table_name() {
        let quoter = IdentifierQuoter::new();
        assert_eq!(quoter.quote_table_name("dbo.Users"), "[dbo].[Users]");
        assert_eq!(quoter.quote_table_name("Users"), "[Users]");
    }

    #[test]
    fn test_quote_column_name_already_quoted() {
        let quoter = IdentifierQuoter::new();
        assert_eq!(quoter.quote_column_name("[Users].[Name]"), "[Users].[Name]");
    }

    #[test]
    fn test_second_lookup_hits_cache() {
        let quoter = IdentifierQuoter::new();
        let first = quoter.quote_column_name("users.name");
        let second = quoter.quote_column_name("users.name");
        assert_eq!(first, second);

        let stats = quoter.column_cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_caches_are_separate() {
        let quoter = IdentifierQuoter::new();
        let _ = quoter.quote_column_name("users");
        let _ = quoter.quote_table_name("users");
        assert_eq!(quoter.column_cache().stats().misses, 1);
        assert_eq!(quoter.table_cache().stats().misses, 1);
        assert_eq!(quoter.table_cache().stats().hits, 0);
    }

    #[test]
    fn test_seeded_cache_is_used_verbatim() {
        let quoter = IdentifierQuoter::with_caches(
            NameCache::seeded([("legacy", "[dbo].[LegacyColumn]")]),
            NameCache::new(),
        );
        assert_eq!(quoter.quote_column_name("legacy"), "[dbo].[LegacyColumn]");
        assert_eq!(quoter.column_cache().stats().misses, 0);
    }

    #[test]
    fn test_global_quoter_is_shared() {
        let a = IdentifierQuoter::global();
        let b = IdentifierQuoter::global();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.quote_table_name("dbo.global_probe"), "[dbo].[global_probe]");
    }
}
