//! Host expression builders.
//!
//! ```ignore
//! use qail_relational::ast::builders::*;
//!
//! // c => c.Name == "Alfki"
//! let predicate = eq(member(customer, "Name", HostType::String), constant("Alfki"));
//! ```

use crate::ast::{BinaryOp, Expr, MemberAccess, MethodCall, MethodRef, UnaryOp, Value};
use crate::ast::sql::SqlFragment;
use crate::storage::HostType;

/// Create a constant with the value's natural host type
pub fn constant(value: impl Into<Value>) -> Expr {
    let value = value.into();
    let ty = value.host_type();
    Expr::Constant { value, ty }
}

/// Create a constant with an explicit host type (e.g. a typed NULL)
pub fn typed_constant(value: impl Into<Value>, ty: HostType) -> Expr {
    Expr::Constant {
        value: value.into(),
        ty,
    }
}

/// Create a named query parameter
pub fn param(name: &str, ty: HostType) -> Expr {
    Expr::Parameter {
        name: name.to_string(),
        ty,
    }
}

/// Access `name` on `receiver`
pub fn member(receiver: Expr, name: &str, ty: HostType) -> Expr {
    Expr::Member(MemberAccess {
        receiver: Some(Box::new(receiver)),
        member: name.to_string(),
        ty,
    })
}

/// Call an instance method
pub fn call(receiver: Expr, method: MethodRef, args: Vec<Expr>, ty: HostType) -> Expr {
    Expr::MethodCall(MethodCall {
        receiver: Some(Box::new(receiver)),
        method,
        args,
        ty,
    })
}

/// Call a static method
pub fn static_call(method: MethodRef, args: Vec<Expr>, ty: HostType) -> Expr {
    Expr::MethodCall(MethodCall {
        receiver: None,
        method,
        args,
        ty,
    })
}

/// Dynamic property access by name: `Relational.Property(entity, "name")`
pub fn property(entity: Expr, name: &str, ty: HostType) -> Expr {
    static_call(MethodRef::property_accessor(), vec![entity, constant(name)], ty)
}

/// Create a binary expression. Comparisons and logical operators are
/// boolean; arithmetic takes the left operand's type.
pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let ty = if op.yields_bool() { HostType::Bool } else { left.ty() };
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    }
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Equal, right)
}

pub fn and(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::AndAlso, right)
}

pub fn or(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::OrElse, right)
}

/// Convert `operand` to `ty`
pub fn convert(operand: Expr, ty: HostType) -> Expr {
    Expr::Unary {
        op: UnaryOp::Convert,
        operand: Box::new(operand),
        ty,
    }
}

pub fn not(operand: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        operand: Box::new(operand),
        ty: HostType::Bool,
    }
}

/// Raw SQL escape hatch
pub fn fragment(sql: &str, ty: HostType) -> Expr {
    Expr::Fragment(SqlFragment::new(sql, ty))
}

/// `Object.Equals(left, right)`
pub fn static_equals(left: Expr, right: Expr) -> Expr {
    static_call(MethodRef::new("Object", "Equals"), vec![left, right], HostType::Bool)
}

/// `receiver.Equals(other)`
pub fn equals(receiver: Expr, other: Expr) -> Expr {
    let declaring = receiver.ty().to_string();
    call(receiver, MethodRef::new(declaring, "Equals"), vec![other], HostType::Bool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_types() {
        let sum = binary(constant(1), BinaryOp::Add, constant(2));
        assert_eq!(sum.ty(), HostType::Int64);

        let cmp = eq(constant(1), constant(2));
        assert_eq!(cmp.ty(), HostType::Bool);
        assert_eq!(cmp.to_string(), "(1 = 2)");
    }

    #[test]
    fn test_property_accessor_shape() {
        let Expr::MethodCall(call) = property(param("c", HostType::Object), "Name", HostType::String)
        else {
            panic!("expected method call");
        };
        assert!(call.method.is_property_accessor());
        assert!(call.receiver.is_none());
        assert_eq!(call.args[1], constant("Name"));
    }
}
