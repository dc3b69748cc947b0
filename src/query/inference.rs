//! Store-type inference across the operands of a rebuilt binary node.

use crate::ast::{Expr, SqlExpression};
use crate::storage::TypeMapping;

/// Reconciles missing type mappings between the two operands of a binary node.
///
/// When exactly one operand carries a mapping it is given to the other:
/// a SQL scalar without a mapping adopts it, and a bare constant or
/// parameter is wrapped into a scalar with it, whatever its host type
/// (integer literals are `i64` even when compared to an `i32` column). When
/// both operands are mapped nothing changes, conflicts are left for rendering.
///
/// Only the node passed in is inspected; operands are never descended into,
/// they were already translated bottom-up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMappingInferrer;

impl TypeMappingInferrer {
    pub fn new() -> Self {
        Self
    }

    pub fn infer(&self, expression: Expr) -> Expr {
        let Expr::Binary {
            op,
            left,
            right,
            ty,
        } = expression
        else {
            return expression;
        };

        let left_mapping = mapping_of(&left).cloned();
        let right_mapping = mapping_of(&right).cloned();

        let (left, right) = match (left_mapping, right_mapping) {
            (Some(mapping), None) => (*left, adopt_mapping(*right, mapping)),
            (None, Some(mapping)) => (adopt_mapping(*left, mapping), *right),
            _ => (*left, *right),
        };

        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }
}

fn mapping_of(expression: &Expr) -> Option<&TypeMapping> {
    expression.as_sql().and_then(SqlExpression::type_mapping)
}

fn adopt_mapping(expression: Expr, mapping: TypeMapping) -> Expr {
    match expression {
        Expr::Sql(sql) if sql.type_mapping().is_none() && !sql.is_condition() => {
            tracing::trace!("Inferred {} for {}", mapping, sql);
            Expr::Sql(sql.with_type_mapping(mapping))
        }
        value @ (Expr::Constant { .. } | Expr::Parameter { .. }) => {
            tracing::trace!("Inferred {} for {}", mapping, value);
            Expr::Sql(SqlExpression::new(value, Some(mapping)))
        }
        other => other,
    }
}
