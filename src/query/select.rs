//! The mutable select model a query is compiled into.
//!
//! A [`SelectExpression`] starts out bound to one root entity and is shaped
//! through its `apply_*` operations. The projection goes through one
//! irreversible step: until [`apply_projection`](SelectExpression::apply_projection)
//! it is a mapping from projection members to entity projections or scalars;
//! afterwards it is a flat, index-addressed list of scalars.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::ast::{Expr, OrderingExpression, SqlExpression, TableExpression};
use crate::error::{RelationalError, RelationalResult};
use crate::metadata::{EntityType, Property};
use crate::query::projection::{
    EntityProjection, ProjectionMapping, ProjectionMember, ProjectionValue,
};
use crate::storage::TypeMappingSource;

/// Where the projection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionPhase {
    /// Projection is a member mapping and may still be replaced.
    Mapping,
    /// Projection has been flattened into the projection list.
    Applied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpression {
    tables: Vec<TableExpression>,
    projection_mapping: ProjectionMapping,
    projection: Vec<SqlExpression>,
    phase: ProjectionPhase,
    predicate: Option<SqlExpression>,
    orderings: Vec<OrderingExpression>,
    limit: Option<SqlExpression>,
    offset: Option<SqlExpression>,
}

impl SelectExpression {
    /// Select every mapped property of `entity_type` from its table.
    ///
    /// The table alias is the first letter of the lower-cased table name, so
    /// two tables starting with the same letter get the same alias. Callers
    /// adding further sources must pick distinct aliases themselves.
    pub fn new(
        entity_type: Arc<EntityType>,
        type_mappings: &dyn TypeMappingSource,
    ) -> RelationalResult<Self> {
        entity_type.validate()?;

        let alias = entity_type
            .table_name()
            .to_lowercase()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();
        let table = TableExpression {
            name: entity_type.table_name().to_string(),
            schema: entity_type.schema_name().map(str::to_string),
            alias,
        };

        let entity_projection = EntityProjection::new(Arc::clone(&entity_type), &table, type_mappings)?;
        let mut projection_mapping = ProjectionMapping::new();
        projection_mapping.insert(ProjectionMember::root(), entity_projection.into());

        tracing::debug!("Created select over {} for entity {}", table, entity_type.name);

        Ok(Self {
            tables: vec![table],
            projection_mapping,
            projection: Vec::new(),
            phase: ProjectionPhase::Mapping,
            predicate: None,
            orderings: Vec::new(),
            limit: None,
            offset: None,
        })
    }

    pub fn tables(&self) -> &[TableExpression] {
        &self.tables
    }

    /// The flat projection list; empty until the projection is applied.
    pub fn projection(&self) -> &[SqlExpression] {
        &self.projection
    }

    pub fn projection_mapping(&self) -> &ProjectionMapping {
        &self.projection_mapping
    }

    pub fn phase(&self) -> ProjectionPhase {
        self.phase
    }

    pub fn is_projection_applied(&self) -> bool {
        self.phase == ProjectionPhase::Applied
    }

    pub fn predicate(&self) -> Option<&SqlExpression> {
        self.predicate.as_ref()
    }

    pub fn orderings(&self) -> &[OrderingExpression] {
        &self.orderings
    }

    pub fn limit(&self) -> Option<&SqlExpression> {
        self.limit.as_ref()
    }

    pub fn offset(&self) -> Option<&SqlExpression> {
        self.offset.as_ref()
    }

    /// What `member` currently projects.
    pub fn projection_expression(&self, member: &ProjectionMember) -> Option<&ProjectionValue> {
        self.projection_mapping.get(member)
    }

    /// Resolve `property` of the entity projected at `placeholder` to its column.
    ///
    /// `placeholder` must be a [`ProjectionBinding`](crate::query::ProjectionBinding)
    /// naming an entity projection of this select.
    pub fn bind_property(&self, placeholder: &Expr, property: &Property) -> RelationalResult<Expr> {
        let Expr::ProjectionBinding(binding) = placeholder else {
            return Err(RelationalError::unsupported(format!(
                "'{}' is not a projection binding",
                placeholder
            )));
        };

        match self.projection_mapping.get(&binding.member) {
            Some(ProjectionValue::Entity(entity)) => {
                let column = entity.get_property(property)?;
                Ok(Expr::Sql(column.clone()))
            }
            Some(ProjectionValue::Scalar(_)) => {
                Err(RelationalError::NotEntityProjection(binding.member.clone()))
            }
            None => Err(RelationalError::UnknownProjectionMember(binding.member.clone())),
        }
    }

    /// Flatten the projection mapping into the projection list.
    ///
    /// Entity projections expand to one column per property in declared
    /// order; the returned index of such a member is the position of its
    /// first column. Can only be called once.
    pub fn apply_projection(&mut self) -> RelationalResult<IndexMap<ProjectionMember, usize>> {
        self.ensure_mapping_phase()?;

        let mut index = 0;
        let mut result = IndexMap::with_capacity(self.projection_mapping.len());
        for (member, value) in &self.projection_mapping {
            result.insert(member.clone(), index);
            match value {
                ProjectionValue::Entity(entity) => {
                    for column in entity.columns() {
                        self.projection.push(column.clone());
                        index += 1;
                    }
                }
                ProjectionValue::Scalar(sql) => {
                    self.projection.push(sql.clone());
                    index += 1;
                }
            }
        }

        self.phase = ProjectionPhase::Applied;
        tracing::debug!(
            "Applied projection: {} members -> {} columns",
            result.len(),
            self.projection.len()
        );
        Ok(result)
    }

    /// Replace the projection mapping wholesale.
    pub fn set_projection_mapping(&mut self, mapping: ProjectionMapping) -> RelationalResult<()> {
        self.ensure_mapping_phase()?;
        self.projection_mapping = mapping;
        Ok(())
    }

    /// Replace the predicate. Combining predicates is up to the caller.
    pub fn apply_predicate(&mut self, predicate: SqlExpression) {
        if !predicate.is_condition() {
            tracing::warn!("Predicate {} is not flagged as a condition", predicate);
        }
        self.predicate = Some(predicate);
    }

    /// Reset the ordering list to a single primary key.
    pub fn apply_order_by(&mut self, ordering: OrderingExpression) {
        self.orderings.clear();
        self.orderings.push(ordering);
    }

    /// Append a secondary ordering key.
    pub fn apply_then_by(&mut self, ordering: OrderingExpression) {
        if self.orderings.is_empty() {
            tracing::warn!("then-by {} applied without a primary ordering", ordering);
        }
        self.orderings.push(ordering);
    }

    pub fn apply_limit(&mut self, limit: SqlExpression) {
        self.limit = Some(limit);
    }

    pub fn apply_offset(&mut self, offset: SqlExpression) {
        self.offset = Some(offset);
    }

    fn ensure_mapping_phase(&self) -> RelationalResult<()> {
        match self.phase {
            ProjectionPhase::Mapping => Ok(()),
            ProjectionPhase::Applied => Err(RelationalError::ProjectionAlreadyApplied),
        }
    }
}
