//! Error types for the SQL Server adapter layer.

/// Errors surfaced by the adapter layer.
///
/// Quoting never fails; the only fallible operation is building an exists
/// probe, whose conditions go through an attribute policy first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The conditions referenced attributes the policy does not permit.
    #[error("Forbidden attributes in conditions: {}", .attributes.join(", "))]
    ForbiddenAttributes {
        /// The offending attribute names, in the order they were found.
        attributes: Vec<String>,
    },
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_attributes_message() {
        let err = Error::ForbiddenAttributes {
            attributes: vec![String::from("admin"), String::from("role")],
        };
        assert_eq!(
            err.to_string(),
            "Forbidden attributes in conditions: admin, role"
        );
    }
}
