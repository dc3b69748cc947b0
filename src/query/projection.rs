//! Projection shapes of a select: members, entity projections and the mapping between them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ast::{ColumnExpression, Expr, SqlExpression, TableExpression};
use crate::error::{RelationalError, RelationalResult};
use crate::metadata::{EntityType, Property};
use crate::storage::{HostType, TypeMappingSource};

/// Path to a position in a (possibly nested) projection shape.
///
/// Compared structurally: two members built from the same path are the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectionMember(Vec<String>);

impl ProjectionMember {
    /// The empty path: the whole result.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Child member `name` under this one.
    pub fn append(&self, name: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(name.into());
        Self(path)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn path(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ProjectionMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// Placeholder for the value found at a projection member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionBinding {
    pub member: ProjectionMember,
    pub ty: HostType,
}

impl ProjectionBinding {
    pub fn new(member: ProjectionMember, ty: HostType) -> Self {
        Self { member, ty }
    }
}

/// The columns of one entity read from one table source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProjection {
    entity_type: Arc<EntityType>,
    table_alias: String,
    columns: IndexMap<String, SqlExpression>,
}

impl EntityProjection {
    /// Resolve every property of `entity_type` to a column of `table`.
    ///
    /// Fails for entities that do not [validate](EntityType::validate), so an
    /// entity projection always contributes at least one column.
    pub fn new(
        entity_type: Arc<EntityType>,
        table: &TableExpression,
        type_mappings: &dyn TypeMappingSource,
    ) -> RelationalResult<Self> {
        entity_type.validate()?;
        let mut columns = IndexMap::with_capacity(entity_type.properties().len());
        for property in entity_type.properties() {
            let column = ColumnExpression {
                name: property.column_name().to_string(),
                table_alias: table.alias.clone(),
                ty: property.host_type.clone(),
                nullable: property.nullable,
            };
            let mapping = property.type_mapping(type_mappings)?;
            columns.insert(
                property.name.clone(),
                SqlExpression::new(Expr::Column(column), Some(mapping)),
            );
        }

        Ok(Self {
            entity_type,
            table_alias: table.alias.clone(),
            columns,
        })
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    /// Column of `property`, failing if the property is not part of this entity.
    pub fn get_property(&self, property: &Property) -> RelationalResult<&SqlExpression> {
        self.columns
            .get(&property.name)
            .ok_or_else(|| RelationalError::unresolvable(&self.entity_type.name, &property.name))
    }

    /// Columns in declared property order.
    pub fn columns(&self) -> impl Iterator<Item = &SqlExpression> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// What a projection member produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectionValue {
    Entity(EntityProjection),
    Scalar(SqlExpression),
}

impl From<EntityProjection> for ProjectionValue {
    fn from(projection: EntityProjection) -> Self {
        ProjectionValue::Entity(projection)
    }
}

impl From<SqlExpression> for ProjectionValue {
    fn from(sql: SqlExpression) -> Self {
        ProjectionValue::Scalar(sql)
    }
}

/// Projection members in insertion order; the order becomes column order
/// once the projection is applied.
pub type ProjectionMapping = IndexMap<ProjectionMember, ProjectionValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_equality_is_structural() {
        let a = ProjectionMember::root().append("Customer").append("Name");
        let b = ProjectionMember::root().append("Customer").append("Name");
        assert_eq!(a, b);
        assert_ne!(a, ProjectionMember::root().append("Customer"));
        assert_eq!(a.to_string(), "Customer.Name");
        assert_eq!(a.path(), ["Customer", "Name"]);
        assert!(ProjectionMember::root().path().is_empty());
        assert_eq!(ProjectionMember::root().to_string(), "<root>");
    }
}
