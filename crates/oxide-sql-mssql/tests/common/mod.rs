#![allow(dead_code)]

use oxide_sql_mssql::exists::PermitAll;
use oxide_sql_mssql::{
    Conditions, IdentifierQuoter, Relation, SqlValue, TsqlQuoting, build_exists_relation,
};

pub fn quoting() -> TsqlQuoting {
    TsqlQuoting::new()
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}

/// Renders a relation with a fresh quoter.
pub fn render(relation: &Relation) -> String {
    relation.to_sql(&IdentifierQuoter::new(), &quoting())
}

/// Builds the exists probe for `base` with no attribute screening.
pub fn probe(base: Relation, conditions: Conditions) -> Relation {
    build_exists_relation(base, conditions, &PermitAll)
        .unwrap_or_else(|e| panic!("Failed to build exists probe: {e}"))
}

/// Renders the exists probe for `base`.
pub fn probe_sql(base: Relation, conditions: Conditions) -> String {
    render(&probe(base, conditions))
}
