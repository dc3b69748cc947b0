//! Core traits for the translator system

use crate::ast::{Expr, MemberAccess, MethodCall};

/// Rewrites a method call into a SQL-level expression.
pub trait MethodCallTranslator: Send + Sync {
    fn id(&self) -> &'static str;

    /// The replacement for `call`, or `None` when this rule does not apply.
    ///
    /// `call` has already been translated bottom-up: its receiver and
    /// arguments may be SQL scalars.
    fn translate(&self, call: &MethodCall) -> Option<Expr>;
}

/// Rewrites a member access into a SQL-level expression.
pub trait MemberTranslator: Send + Sync {
    fn id(&self) -> &'static str;

    /// The replacement for `member`, or `None` when this rule does not apply.
    fn translate(&self, member: &MemberAccess) -> Option<Expr>;
}
