use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ast::sql::{ColumnExpression, SqlCast, SqlExpression, SqlFragment, SqlFunction};
use crate::ast::Value;
use crate::metadata::EntityType;
use crate::query::ProjectionBinding;
use crate::storage::HostType;

/// Binary operators of the host expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Modulo (%)
    Modulo,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }

    /// Whether the result is boolean regardless of the operand types.
    pub fn yields_bool(&self) -> bool {
        self.is_comparison() || self.is_logical()
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Equal => write!(f, "="),
            BinaryOp::NotEqual => write!(f, "<>"),
            BinaryOp::LessThan => write!(f, "<"),
            BinaryOp::LessThanOrEqual => write!(f, "<="),
            BinaryOp::GreaterThan => write!(f, ">"),
            BinaryOp::GreaterThanOrEqual => write!(f, ">="),
            BinaryOp::AndAlso => write!(f, "AND"),
            BinaryOp::OrElse => write!(f, "OR"),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Type conversion to the node's type.
    Convert,
    Not,
    Negate,
}

/// Identifies a host method: its declaring type and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub declaring_type: String,
    pub name: String,
}

impl MethodRef {
    const PROPERTY_ACCESSOR_TYPE: &'static str = "Relational";
    const PROPERTY_ACCESSOR_NAME: &'static str = "Property";

    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }

    /// `Relational.Property(entity, "Name")`: access a property by name.
    pub fn property_accessor() -> Self {
        Self::new(Self::PROPERTY_ACCESSOR_TYPE, Self::PROPERTY_ACCESSOR_NAME)
    }

    pub fn is_property_accessor(&self) -> bool {
        self.declaring_type == Self::PROPERTY_ACCESSOR_TYPE
            && self.name == Self::PROPERTY_ACCESSOR_NAME
    }
}

/// A method invocation, static when `receiver` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub receiver: Option<Box<Expr>>,
    pub method: MethodRef,
    pub args: Vec<Expr>,
    pub ty: HostType,
}

impl MethodCall {
    /// Same method over new receiver and arguments.
    pub fn update(&self, receiver: Option<Expr>, args: Vec<Expr>) -> Self {
        Self {
            receiver: receiver.map(Box::new),
            method: self.method.clone(),
            args,
            ty: self.ty.clone(),
        }
    }
}

/// Field or property access, static when `receiver` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub receiver: Option<Box<Expr>>,
    pub member: String,
    pub ty: HostType,
}

impl MemberAccess {
    pub fn update(&self, receiver: Option<Expr>) -> Self {
        Self {
            receiver: receiver.map(Box::new),
            member: self.member.clone(),
            ty: self.ty.clone(),
        }
    }
}

/// Stand-in for "the rows of entity E currently in scope".
///
/// `value_buffer` is the [`ProjectionBinding`] naming the projection member
/// the rows come from; binding a property resolves through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityShaper {
    pub entity_type: Arc<EntityType>,
    pub value_buffer: Box<Expr>,
}

/// A host expression, possibly partially bound to SQL.
///
/// The first group of variants is the host language; `Sql`, `Column`,
/// `Cast`, `Function` and `Fragment` are the SQL-bound nodes produced by
/// translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Constant { value: Value, ty: HostType },
    Parameter { name: String, ty: HostType },
    Member(MemberAccess),
    MethodCall(MethodCall),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: HostType,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        ty: HostType,
    },
    EntityShaper(EntityShaper),
    ProjectionBinding(ProjectionBinding),
    Sql(SqlExpression),
    Column(ColumnExpression),
    Cast(SqlCast),
    Function(SqlFunction),
    Fragment(SqlFragment),
}

impl Expr {
    /// The host type this node evaluates to.
    pub fn ty(&self) -> HostType {
        match self {
            Expr::Constant { ty, .. } | Expr::Parameter { ty, .. } => ty.clone(),
            Expr::Member(m) => m.ty.clone(),
            Expr::MethodCall(c) => c.ty.clone(),
            Expr::Binary { ty, .. } | Expr::Unary { ty, .. } => ty.clone(),
            Expr::EntityShaper(s) => s.entity_type.host_type(),
            Expr::ProjectionBinding(b) => b.ty.clone(),
            Expr::Sql(s) => s.ty(),
            Expr::Column(c) => c.ty.clone(),
            Expr::Cast(c) => c.ty.clone(),
            Expr::Function(f) => f.ty.clone(),
            Expr::Fragment(f) => f.ty.clone(),
        }
    }

    pub fn as_sql(&self) -> Option<&SqlExpression> {
        match self {
            Expr::Sql(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_sql(&self) -> bool {
        matches!(self, Expr::Sql(_))
    }

    pub fn as_entity_shaper(&self) -> Option<&EntityShaper> {
        match self {
            Expr::EntityShaper(s) => Some(s),
            _ => None,
        }
    }

    /// First method call in the tree that no translator rewrote.
    pub fn find_untranslated(&self) -> Option<&MethodCall> {
        match self {
            Expr::MethodCall(call) => Some(call),
            Expr::Constant { .. }
            | Expr::Parameter { .. }
            | Expr::EntityShaper(_)
            | Expr::ProjectionBinding(_)
            | Expr::Column(_)
            | Expr::Fragment(_) => None,
            Expr::Member(m) => m.receiver.as_deref().and_then(Expr::find_untranslated),
            Expr::Binary { left, right, .. } => left
                .find_untranslated()
                .or_else(|| right.find_untranslated()),
            Expr::Unary { operand, .. } => operand.find_untranslated(),
            Expr::Sql(s) => s.expression().find_untranslated(),
            Expr::Cast(c) => c.operand.find_untranslated(),
            Expr::Function(f) => f
                .instance
                .as_deref()
                .and_then(Expr::find_untranslated)
                .or_else(|| f.args.iter().find_map(Expr::find_untranslated)),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant { value, .. } => write!(f, "{}", value),
            Expr::Parameter { name, .. } => write!(f, "@{}", name),
            Expr::Member(m) => match &m.receiver {
                Some(receiver) => write!(f, "{}.{}", receiver, m.member),
                None => write!(f, "{}", m.member),
            },
            Expr::MethodCall(call) => {
                match &call.receiver {
                    Some(receiver) => write!(f, "{}.{}(", receiver, call.method.name)?,
                    None => write!(f, "{}.{}(", call.method.declaring_type, call.method.name)?,
                }
                write_args(f, &call.args)?;
                write!(f, ")")
            }
            Expr::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", left, op, right),
            Expr::Unary { op, operand, ty } => match op {
                UnaryOp::Convert => write!(f, "CONVERT({}, {})", operand, ty),
                UnaryOp::Not => write!(f, "NOT {}", operand),
                UnaryOp::Negate => write!(f, "-{}", operand),
            },
            Expr::EntityShaper(s) => write!(f, "Entity<{}>", s.entity_type.name),
            Expr::ProjectionBinding(b) => write!(f, "Projection({})", b.member),
            Expr::Sql(s) => write!(f, "{}", s.expression()),
            Expr::Column(c) => write!(f, "{}.{}", c.table_alias, c.name),
            Expr::Cast(c) => write!(f, "CAST({} AS {})", c.operand, c.store_type),
            Expr::Function(func) => {
                if let Some(instance) = &func.instance {
                    write!(f, "{}.", instance)?;
                } else if let Some(schema) = &func.schema {
                    write!(f, "{}.", schema)?;
                }
                write!(f, "{}(", func.name)?;
                write_args(f, &func.args)?;
                write!(f, ")")
            }
            Expr::Fragment(frag) => write!(f, "{}", frag.sql),
        }
    }
}

impl From<SqlExpression> for Expr {
    fn from(sql: SqlExpression) -> Self {
        Expr::Sql(sql)
    }
}

impl From<MethodCall> for Expr {
    fn from(call: MethodCall) -> Self {
        Expr::MethodCall(call)
    }
}

impl From<MemberAccess> for Expr {
    fn from(member: MemberAccess) -> Self {
        Expr::Member(member)
    }
}
