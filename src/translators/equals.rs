//! `Equals` calls as SQL equality.

use crate::ast::{BinaryOp, Expr, MethodCall, SqlExpression};
use crate::storage::HostType;

use super::traits::MethodCallTranslator;

/// Translates `a.Equals(b)` and `Equals(a, b)` into an equality condition.
///
/// Both operands must have the same host type, otherwise the call is left to
/// the caller. When only one side is already a SQL scalar, the other side is
/// wrapped with that side's type mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualsTranslator;

impl EqualsTranslator {
    const METHOD: &'static str = "Equals";

    fn operands(call: &MethodCall) -> Option<(&Expr, &Expr)> {
        if call.method.name != Self::METHOD {
            return None;
        }
        match (call.receiver.as_deref(), call.args.as_slice()) {
            (Some(receiver), [other]) => Some((receiver, other)),
            (None, [left, right]) if left.ty() == right.ty() => Some((left, right)),
            _ => None,
        }
    }
}

impl MethodCallTranslator for EqualsTranslator {
    fn id(&self) -> &'static str {
        "equals"
    }

    fn translate(&self, call: &MethodCall) -> Option<Expr> {
        let (left, right) = Self::operands(call)?;
        if left.ty() != right.ty() {
            return None;
        }

        let (left, right) = match (left.as_sql(), right.as_sql()) {
            (Some(sql), None) => (
                left.clone(),
                Expr::Sql(SqlExpression::new(right.clone(), sql.type_mapping().cloned())),
            ),
            (None, Some(sql)) => (
                Expr::Sql(SqlExpression::new(left.clone(), sql.type_mapping().cloned())),
                right.clone(),
            ),
            _ => (left.clone(), right.clone()),
        };

        let equality = Expr::Binary {
            op: BinaryOp::Equal,
            left: Box::new(left),
            right: Box::new(right),
            ty: HostType::Bool,
        };
        Some(Expr::Sql(SqlExpression::condition(equality)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{call, constant, equals, param, static_equals};
    use crate::ast::{ColumnExpression, MethodRef};
    use crate::storage::TypeMapping;

    fn id_column() -> Expr {
        let column = ColumnExpression {
            name: "Id".to_string(),
            table_alias: "o".to_string(),
            ty: HostType::Int64,
            nullable: false,
        };
        Expr::Sql(SqlExpression::new(
            Expr::Column(column),
            Some(TypeMapping::new("bigint", HostType::Int64)),
        ))
    }

    fn translate(expression: Expr) -> Option<Expr> {
        match expression {
            Expr::MethodCall(c) => EqualsTranslator.translate(&c),
            other => panic!("expected method call, got {}", other),
        }
    }

    fn equality_operands(expression: &Expr) -> (&Expr, &Expr) {
        let sql = expression.as_sql().expect("sql scalar");
        assert!(sql.is_condition());
        match sql.expression() {
            Expr::Binary {
                op: BinaryOp::Equal,
                left,
                right,
                ..
            } => (left, right),
            other => panic!("expected equality, got {}", other),
        }
    }

    #[test]
    fn test_instance_equals() {
        let translated = translate(equals(id_column(), param("id", HostType::Int64))).unwrap();
        let (left, right) = equality_operands(&translated);
        assert_eq!(left, &id_column());
        // Mapping flows from the resolved column to the parameter.
        assert_eq!(
            right.as_sql().unwrap().type_mapping().unwrap().store_type,
            "bigint"
        );
    }

    #[test]
    fn test_static_equals() {
        let translated = translate(static_equals(param("id", HostType::Int64), id_column())).unwrap();
        let (left, right) = equality_operands(&translated);
        assert!(left.is_sql());
        assert_eq!(right, &id_column());
    }

    #[test]
    fn test_neither_side_sql() {
        let translated = translate(static_equals(constant(1), constant(2))).unwrap();
        let (left, right) = equality_operands(&translated);
        assert_eq!(left, &constant(1));
        assert_eq!(right, &constant(2));
    }

    #[test]
    fn test_type_mismatch_declines() {
        assert_eq!(translate(equals(id_column(), constant("1"))), None);
        assert_eq!(translate(static_equals(constant(1), constant(1.0))), None);
    }

    #[test]
    fn test_other_shapes_decline() {
        let wrong_name = call(
            constant(1),
            MethodRef::new("i64", "CompareTo"),
            vec![constant(2)],
            HostType::Int32,
        );
        assert_eq!(translate(wrong_name), None);

        let too_many = call(
            constant(1),
            MethodRef::new("i64", "Equals"),
            vec![constant(2), constant(3)],
            HostType::Bool,
        );
        assert_eq!(translate(too_many), None);
    }
}
