//! Relations for row-existence probes.
//!
//! An exists probe normally replaces the projection with a constant and
//! fetches one row. On SQL Server that breaks when the relation is both
//! DISTINCT and OFFSET: OFFSET needs an ORDER BY, and under DISTINCT every
//! ORDER BY item must appear in the projection, which the default
//! primary-key ordering does not. [`build_exists_relation`] keeps the
//! DISTINCT projection in that case and orders by it instead.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::relation::{Clause, Relation, SqlFragment, SqlLiteral};
use crate::value::{SqlValue, ToSqlValue};

/// Constant projection of an exists probe.
pub const ONE_AS_ONE: &str = "1 AS one";

/// What an exists probe filters by.
#[derive(Debug, Clone, PartialEq)]
pub enum Conditions {
    /// No filter at all.
    None,
    /// A SQL template with positional binds.
    List(SqlFragment),
    /// Column equality filters, applied in insertion order.
    Map(IndexMap<String, SqlValue>),
    /// A primary key value.
    Scalar(SqlValue),
}

impl Conditions {
    /// Builds a primary key filter.
    #[must_use]
    pub fn scalar<T: ToSqlValue>(value: T) -> Self {
        Self::Scalar(value.to_sql_value())
    }

    /// Builds column equality filters from `(column, value)` pairs.
    #[must_use]
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToSqlValue,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_sql_value()))
                .collect(),
        )
    }
}

impl From<SqlFragment> for Conditions {
    fn from(fragment: SqlFragment) -> Self {
        Self::List(fragment)
    }
}

impl From<IndexMap<String, SqlValue>> for Conditions {
    fn from(map: IndexMap<String, SqlValue>) -> Self {
        Self::Map(map)
    }
}

/// Screens conditions before they reach a query.
pub trait AttributePolicy {
    /// Returns the conditions to use, or an error if they reference
    /// attributes that may not be filtered on.
    fn sanitize(&self, conditions: Conditions) -> Result<Conditions>;
}

/// Accepts every condition unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAll;

impl AttributePolicy for PermitAll {
    fn sanitize(&self, conditions: Conditions) -> Result<Conditions> {
        Ok(conditions)
    }
}

/// Rejects column filters on a fixed set of attributes.
#[derive(Debug, Default, Clone)]
pub struct ForbidAttributes {
    forbidden: HashSet<String>,
}

impl ForbidAttributes {
    /// Creates a policy forbidding the given attribute names.
    #[must_use]
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forbidden: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

impl AttributePolicy for ForbidAttributes {
    fn sanitize(&self, conditions: Conditions) -> Result<Conditions> {
        if let Conditions::Map(map) = &conditions {
            let attributes: Vec<String> = map
                .keys()
                .filter(|key| self.forbidden.contains(key.as_str()))
                .cloned()
                .collect();
            if !attributes.is_empty() {
                warn!(?attributes, "Rejected forbidden attributes in exists conditions");
                return Err(Error::ForbiddenAttributes { attributes });
            }
        }
        Ok(conditions)
    }
}

/// Builds the relation that tests whether `base` has a row matching
/// `conditions`.
///
/// The result fetches at most one row. Sanitization runs first; its error
/// is returned unchanged.
///
/// # Errors
///
/// Returns the policy's error when it rejects the conditions.
pub fn build_exists_relation<P>(
    base: Relation,
    conditions: Conditions,
    policy: &P,
) -> Result<Relation>
where
    P: AttributePolicy + ?Sized,
{
    let conditions = policy.sanitize(conditions)?;

    let distinct = base.is_distinct();
    let offset = base.offset_value();
    let projection = base.select_values().to_vec();

    let relation = if distinct && offset.is_some() {
        debug!(
            distinct,
            ?offset,
            projection = projection.len(),
            "Ordering exists probe by its DISTINCT projection"
        );
        // Order by the projection itself so the ORDER BY that OFFSET needs
        // is valid under DISTINCT.
        let relation = base.except(&[Clause::Order]);
        if projection.is_empty() {
            relation.limit(1)
        } else {
            relation.order(projection).limit(1)
        }
    } else {
        debug!(distinct, ?offset, "Projecting constant for exists probe");
        base.except(&[Clause::Select, Clause::Distinct, Clause::Order])
            .select([SqlLiteral::retryable(ONE_AS_ONE)])
            .limit(1)
    };

    Ok(apply_conditions(relation, conditions))
}

fn apply_conditions(relation: Relation, conditions: Conditions) -> Relation {
    match conditions {
        Conditions::None => relation,
        Conditions::List(fragment) if fragment.is_empty() => relation,
        Conditions::List(fragment) => relation.where_fragment(fragment),
        Conditions::Map(map) => map
            .into_iter()
            .fold(relation, |relation, (column, value)| relation.where_eq(column, value)),
        Conditions::Scalar(value) => {
            let primary_key = String::from(relation.primary_key_name());
            relation.where_eq(primary_key, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Predicate;

    fn sqls(literals: &[SqlLiteral]) -> Vec<&str> {
        literals.iter().map(SqlLiteral::sql).collect()
    }

    #[test]
    fn test_distinct_offset_orders_by_projection() {
        let base = Relation::new("users")
            .select(["name", "id"])
            .distinct(true)
            .order(["created_at"])
            .offset(5);
        let relation = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();

        assert!(relation.is_distinct());
        assert_eq!(sqls(relation.select_values()), vec!["name", "id"]);
        assert_eq!(sqls(relation.order_values()), vec!["name", "id"]);
        assert_eq!(relation.limit_value(), Some(1));
        assert_eq!(relation.offset_value(), Some(5));
    }

    #[test]
    fn test_distinct_offset_without_projection_drops_order() {
        let base = Relation::new("users")
            .distinct(true)
            .order(["created_at DESC"])
            .offset(5);
        let relation = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();

        assert!(relation.order_values().is_empty());
        assert!(relation.select_values().is_empty());
        assert_eq!(relation.limit_value(), Some(1));
    }

    #[test]
    fn test_normal_probe_projects_constant() {
        let base = Relation::new("users")
            .select(["name"])
            .order(["name"])
            .limit(50);
        let relation = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();

        assert!(!relation.is_distinct());
        assert_eq!(sqls(relation.select_values()), vec![ONE_AS_ONE]);
        assert!(relation.select_values()[0].is_retryable());
        assert!(relation.order_values().is_empty());
        assert_eq!(relation.limit_value(), Some(1));
    }

    #[test]
    fn test_distinct_without_offset_is_normal_probe() {
        let base = Relation::new("users").select(["name"]).distinct(true);
        let relation = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();
        assert!(!relation.is_distinct());
        assert_eq!(sqls(relation.select_values()), vec![ONE_AS_ONE]);
    }

    #[test]
    fn test_offset_without_distinct_is_normal_probe() {
        let base = Relation::new("users").select(["name"]).offset(3);
        let relation = build_exists_relation(base, Conditions::None, &PermitAll).unwrap();
        assert_eq!(sqls(relation.select_values()), vec![ONE_AS_ONE]);
        assert_eq!(relation.offset_value(), Some(3));
    }

    #[test]
    fn test_scalar_filters_on_primary_key() {
        let base = Relation::new("users").primary_key("user_id");
        let relation = build_exists_relation(base, Conditions::scalar(42), &PermitAll).unwrap();
        assert_eq!(
            relation.where_clauses(),
            &[Predicate::Eq {
                column: String::from("user_id"),
                value: SqlValue::Int(42),
            }]
        );
    }

    #[test]
    fn test_empty_conditions_add_no_filter() {
        let empties = [
            Conditions::None,
            Conditions::Map(IndexMap::new()),
            Conditions::List(SqlFragment::default()),
        ];
        for conditions in empties {
            let relation =
                build_exists_relation(Relation::new("users"), conditions, &PermitAll).unwrap();
            assert!(relation.where_clauses().is_empty());
        }
    }

    #[test]
    fn test_map_conditions_keep_order() {
        let conditions = Conditions::map([("name", "a"), ("email", "b")]);
        let relation =
            build_exists_relation(Relation::new("users"), conditions, &PermitAll).unwrap();
        let columns: Vec<&str> = relation
            .where_clauses()
            .iter()
            .filter_map(|p| match p {
                Predicate::Eq { column, .. } => Some(column.as_str()),
                Predicate::Fragment(_) => None,
            })
            .collect();
        assert_eq!(columns, vec!["name", "email"]);
    }

    #[test]
    fn test_forbidden_attributes_propagate() {
        let policy = ForbidAttributes::new(["admin"]);
        let conditions =
            Conditions::map([("name", SqlValue::Null), ("admin", SqlValue::Bool(true))]);
        let err = build_exists_relation(Relation::new("users"), conditions, &policy).unwrap_err();
        assert_eq!(
            err,
            Error::ForbiddenAttributes {
                attributes: vec![String::from("admin")]
            }
        );
    }

    #[test]
    fn test_policy_sees_conditions_before_interpretation() {
        struct AlwaysById;

        impl AttributePolicy for AlwaysById {
            fn sanitize(&self, _conditions: Conditions) -> Result<Conditions> {
                Ok(Conditions::scalar(7))
            }
        }

        let relation =
            build_exists_relation(Relation::new("users"), Conditions::None, &AlwaysById).unwrap();
        assert_eq!(relation.where_clauses().len(), 1);
    }
}
