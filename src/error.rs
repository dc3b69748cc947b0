//! Error types for relational translation.

use thiserror::Error;

use crate::query::ProjectionMember;
use crate::storage::HostType;

/// The main error type for relational translation.
#[derive(Debug, Error)]
pub enum RelationalError {
    /// A node the translator cannot bind and no registered translator accepts.
    #[error("Expression not supported for this provider: {0}")]
    Unsupported(String),

    /// Member or property access naming a property the entity does not have.
    #[error("Property '{property}' is not defined on entity '{entity}'")]
    UnresolvableProperty { entity: String, property: String },

    /// The type mapping source has no store type for a host type.
    #[error("No store type mapping for host type '{0}'")]
    UnmappedType(HostType),

    /// A projection binding names a member the select does not project.
    #[error("Unknown projection member: {0}")]
    UnknownProjectionMember(ProjectionMember),

    /// A property was bound through a member that projects a scalar.
    #[error("Projection member '{0}' is not an entity projection")]
    NotEntityProjection(ProjectionMember),

    /// The projection mapping was already flattened into the projection list.
    #[error("Projection has already been applied to this select")]
    ProjectionAlreadyApplied,

    /// Entity metadata that cannot be mapped to a table.
    #[error("Invalid metadata: {0}")]
    Metadata(String),

    /// Invalid configuration, including a type mapping source without `bool`.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelationalError {
    /// Create an unsupported-expression error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create an unresolvable-property error.
    pub fn unresolvable(entity: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnresolvableProperty {
            entity: entity.into(),
            property: property.into(),
        }
    }
}

/// Result type alias for relational translation.
pub type RelationalResult<T> = Result<T, RelationalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelationalError::unresolvable("Customer", "Nmae");
        assert_eq!(
            err.to_string(),
            "Property 'Nmae' is not defined on entity 'Customer'"
        );

        let err = RelationalError::UnmappedType(HostType::Named("Point".to_string()));
        assert_eq!(err.to_string(), "No store type mapping for host type 'Point'");
    }

    #[test]
    fn test_projection_member_in_message() {
        let err = RelationalError::UnknownProjectionMember(ProjectionMember::root().append("Orders"));
        assert_eq!(err.to_string(), "Unknown projection member: Orders");
    }
}
