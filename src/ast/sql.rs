//! SQL-bound expression nodes.
//!
//! These are the output of translation. Nothing here transforms anything;
//! the nodes are constructed by the translator and compared structurally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::Expr;
use crate::storage::{HostType, TypeMapping};

/// A translated scalar: an inner node, its store-type mapping and whether it
/// is a condition (usable directly as a predicate) rather than a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlExpression {
    expression: Box<Expr>,
    type_mapping: Option<TypeMapping>,
    is_condition: bool,
}

impl SqlExpression {
    /// A value-typed scalar.
    pub fn new(expression: Expr, type_mapping: Option<TypeMapping>) -> Self {
        Self {
            expression: Box::new(expression),
            type_mapping,
            is_condition: false,
        }
    }

    /// A condition over a boolean-typed expression, e.g. a translated equality.
    ///
    /// `expression` must evaluate to `bool`; the flag is not checked here.
    pub fn condition(expression: Expr) -> Self {
        Self {
            expression: Box::new(expression),
            type_mapping: None,
            is_condition: true,
        }
    }

    /// Flag this value as a condition, keeping its mapping.
    ///
    /// Only meaningful for `bool` values. The translator applies it to
    /// scalars carrying the boolean store mapping.
    pub fn into_condition(self) -> Self {
        Self {
            is_condition: true,
            ..self
        }
    }

    /// Same node under a different mapping.
    pub fn with_type_mapping(self, type_mapping: TypeMapping) -> Self {
        Self {
            type_mapping: Some(type_mapping),
            ..self
        }
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn into_expression(self) -> Expr {
        *self.expression
    }

    pub fn type_mapping(&self) -> Option<&TypeMapping> {
        self.type_mapping.as_ref()
    }

    pub fn is_condition(&self) -> bool {
        self.is_condition
    }

    pub fn ty(&self) -> HostType {
        self.expression.ty()
    }
}

impl fmt::Display for SqlExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// `CAST(operand AS store_type)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlCast {
    pub operand: Box<Expr>,
    pub ty: HostType,
    pub store_type: String,
}

/// A SQL function call, optionally on an instance (`geom.STIsClosed()`) or
/// qualified by a schema (`dbo.fn(...)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlFunction {
    pub instance: Option<Box<Expr>>,
    pub name: String,
    pub schema: Option<String>,
    pub args: Vec<Expr>,
    pub ty: HostType,
}

impl SqlFunction {
    pub fn new(name: impl Into<String>, args: Vec<Expr>, ty: HostType) -> Self {
        Self {
            instance: None,
            name: name.into(),
            schema: None,
            args,
            ty,
        }
    }

    pub fn on_instance(instance: Expr, name: impl Into<String>, args: Vec<Expr>, ty: HostType) -> Self {
        Self {
            instance: Some(Box::new(instance)),
            ..Self::new(name, args, ty)
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Raw SQL text for constructs that have no node of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlFragment {
    pub sql: String,
    pub ty: HostType,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>, ty: HostType) -> Self {
        Self { sql: sql.into(), ty }
    }
}

/// A column of a table source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnExpression {
    pub name: String,
    pub table_alias: String,
    pub ty: HostType,
    pub nullable: bool,
}

/// A named table source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableExpression {
    pub name: String,
    pub schema: Option<String>,
    pub alias: String,
}

impl fmt::Display for TableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{} AS {}", self.name, self.alias)
    }
}

/// One key of an ORDER BY list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingExpression {
    pub expression: SqlExpression,
    pub ascending: bool,
}

impl OrderingExpression {
    pub fn new(expression: SqlExpression, ascending: bool) -> Self {
        Self {
            expression,
            ascending,
        }
    }

    pub fn asc(expression: SqlExpression) -> Self {
        Self::new(expression, true)
    }

    pub fn desc(expression: SqlExpression) -> Self {
        Self::new(expression, false)
    }
}

impl fmt::Display for OrderingExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.ascending { "ASC" } else { "DESC" };
        write!(f, "{} {}", self.expression, dir)
    }
}
