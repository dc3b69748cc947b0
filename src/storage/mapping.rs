use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::HostType;
use crate::error::{RelationalError, RelationalResult};

/// Correspondence between a host type and the store's native type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMapping {
    pub store_type: String,
    pub host_type: HostType,
}

impl TypeMapping {
    pub fn new(store_type: impl Into<String>, host_type: HostType) -> Self {
        Self {
            store_type: store_type.into(),
            host_type,
        }
    }
}

impl fmt::Display for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.host_type, self.store_type)
    }
}

/// Resolves host types to store-type mappings.
///
/// Implementations must be deterministic for a given host type. The mapping
/// returned for [`HostType::Bool`] is used to recognise conditions, so a
/// source that cannot map `bool` is a configuration error.
pub trait TypeMappingSource: Send + Sync {
    fn find_mapping(&self, host_type: &HostType) -> Option<TypeMapping>;

    /// Like [`find_mapping`](Self::find_mapping), failing with
    /// [`RelationalError::UnmappedType`] when there is no mapping.
    fn mapping(&self, host_type: &HostType) -> RelationalResult<TypeMapping> {
        self.find_mapping(host_type)
            .ok_or_else(|| RelationalError::UnmappedType(host_type.clone()))
    }

    /// The boolean sentinel mapping.
    fn bool_mapping(&self) -> RelationalResult<TypeMapping> {
        self.find_mapping(&HostType::Bool).ok_or_else(|| {
            RelationalError::Config("type mapping source cannot map the boolean type".to_string())
        })
    }
}

/// Table-driven [`TypeMappingSource`].
///
/// `DefaultTypeMappingSource::default()` carries generic store type names;
/// dialects override individual entries with [`with_mapping`](Self::with_mapping).
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTypeMappingSource {
    mappings: IndexMap<HostType, TypeMapping>,
}

impl Default for DefaultTypeMappingSource {
    fn default() -> Self {
        Self::empty()
            .with_mapping(HostType::Bool, "boolean")
            .with_mapping(HostType::Int16, "smallint")
            .with_mapping(HostType::Int32, "integer")
            .with_mapping(HostType::Int64, "bigint")
            .with_mapping(HostType::Float32, "real")
            .with_mapping(HostType::Float64, "double precision")
            .with_mapping(HostType::Decimal, "decimal(18, 2)")
            .with_mapping(HostType::String, "text")
            .with_mapping(HostType::DateTime, "timestamp")
            .with_mapping(HostType::Uuid, "uuid")
            .with_mapping(HostType::Bytes, "bytea")
    }
}

impl DefaultTypeMappingSource {
    /// A source with no mappings at all.
    pub fn empty() -> Self {
        Self {
            mappings: IndexMap::new(),
        }
    }

    /// Add or replace the store type for a host type.
    pub fn with_mapping(mut self, host_type: HostType, store_type: impl Into<String>) -> Self {
        self.insert(host_type, store_type);
        self
    }

    pub fn insert(&mut self, host_type: HostType, store_type: impl Into<String>) {
        let mapping = TypeMapping::new(store_type, host_type.clone());
        self.mappings.insert(host_type, mapping);
    }

    pub fn remove(&mut self, host_type: &HostType) -> Option<TypeMapping> {
        self.mappings.shift_remove(host_type)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl TypeMappingSource for DefaultTypeMappingSource {
    fn find_mapping(&self, host_type: &HostType) -> Option<TypeMapping> {
        self.mappings.get(host_type).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mappings() {
        let source = DefaultTypeMappingSource::default();
        assert_eq!(
            source.find_mapping(&HostType::Int32),
            Some(TypeMapping::new("integer", HostType::Int32))
        );
        assert!(source.find_mapping(&HostType::Object).is_none());
    }

    #[test]
    fn test_override_mapping() {
        let source = DefaultTypeMappingSource::default().with_mapping(HostType::Bool, "bit");
        assert_eq!(source.bool_mapping().unwrap().store_type, "bit");
    }

    #[test]
    fn test_unmapped_type_is_error() {
        let source = DefaultTypeMappingSource::empty();
        let err = source.mapping(&HostType::String).unwrap_err();
        assert!(matches!(err, RelationalError::UnmappedType(HostType::String)));
        assert!(matches!(source.bool_mapping(), Err(RelationalError::Config(_))));
    }
}
