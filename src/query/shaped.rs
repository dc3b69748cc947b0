use std::sync::Arc;

use crate::ast::{EntityShaper, Expr};
use crate::error::RelationalResult;
use crate::metadata::EntityType;
use crate::query::projection::{ProjectionBinding, ProjectionMember};
use crate::query::select::SelectExpression;
use crate::storage::{HostType, TypeMappingSource};

/// A select paired with the shaper describing how its rows become results.
///
/// The shaper is an [`EntityShaper`] over the root projection member. Host
/// expressions about "the current row" reference it, and translation binds
/// their member accesses to the select's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedQuery {
    query: SelectExpression,
    shaper: Expr,
}

impl ShapedQuery {
    pub fn new(
        entity_type: Arc<EntityType>,
        type_mappings: &dyn TypeMappingSource,
    ) -> RelationalResult<Self> {
        let query = SelectExpression::new(Arc::clone(&entity_type), type_mappings)?;
        let value_buffer = ProjectionBinding::new(ProjectionMember::root(), HostType::Object);
        let shaper = Expr::EntityShaper(EntityShaper {
            entity_type,
            value_buffer: Box::new(Expr::ProjectionBinding(value_buffer)),
        });
        Ok(Self { query, shaper })
    }

    pub fn query(&self) -> &SelectExpression {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut SelectExpression {
        &mut self.query
    }

    pub fn shaper(&self) -> &Expr {
        &self.shaper
    }

    /// Host type of each result row.
    pub fn result_type(&self) -> HostType {
        self.shaper.ty()
    }

    pub fn into_parts(self) -> (SelectExpression, Expr) {
        (self.query, self.shaper)
    }
}
