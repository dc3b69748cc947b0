//! Host expression to SQL scalar translation.
//!
//! The translator walks a host expression bottom-up against one
//! [`SelectExpression`]: member and property accesses on entity placeholders
//! bind to the select's columns, method calls and members go through the
//! [`TranslatorProvider`], binary nodes get their operand mappings
//! reconciled and conversions of SQL scalars become casts.

use std::sync::Arc;

use crate::ast::{
    EntityShaper, Expr, MemberAccess, MethodCall, SqlCast, SqlExpression, UnaryOp,
};
use crate::error::{RelationalError, RelationalResult};
use crate::query::inference::TypeMappingInferrer;
use crate::query::select::SelectExpression;
use crate::storage::{HostType, TypeMapping, TypeMappingSource};
use crate::translators::TranslatorProvider;

pub struct RelationalSqlTranslator {
    type_mappings: Arc<dyn TypeMappingSource>,
    translators: Arc<TranslatorProvider>,
    inference: TypeMappingInferrer,
    bool_mapping: TypeMapping,
}

impl RelationalSqlTranslator {
    /// Fails if `type_mappings` cannot map the boolean type, since conditions
    /// could not be recognised without it.
    pub fn new(
        type_mappings: Arc<dyn TypeMappingSource>,
        translators: Arc<TranslatorProvider>,
    ) -> RelationalResult<Self> {
        let bool_mapping = type_mappings.bool_mapping()?;
        Ok(Self {
            type_mappings,
            translators,
            inference: TypeMappingInferrer::new(),
            bool_mapping,
        })
    }

    /// Translate `expression` against `select`.
    ///
    /// A result that is not already a SQL scalar is wrapped with the mapping
    /// of its host type. With `condition` set, a boolean-mapped value is
    /// flagged as a condition.
    ///
    /// Method calls no translator accepts are kept as generic calls in the
    /// result; use [`translate_checked`](Self::translate_checked) to reject them.
    pub fn translate(
        &self,
        select: &SelectExpression,
        expression: &Expr,
        condition: bool,
    ) -> RelationalResult<SqlExpression> {
        let binder = Binder {
            translator: self,
            select,
        };
        let translation = binder.visit(expression)?;

        let sql = match translation {
            Expr::Sql(sql) => sql,
            Expr::EntityShaper(shaper) => {
                return Err(RelationalError::unsupported(format!(
                    "entity '{}' cannot be used as a scalar",
                    shaper.entity_type.name
                )));
            }
            Expr::ProjectionBinding(binding) => {
                return Err(RelationalError::unsupported(format!(
                    "projection binding '{}' cannot be used as a scalar",
                    binding.member
                )));
            }
            other => {
                let mapping = self.type_mappings.mapping(&other.ty())?;
                SqlExpression::new(other, Some(mapping))
            }
        };

        let sql = if condition
            && !sql.is_condition()
            && sql.type_mapping() == Some(&self.bool_mapping)
        {
            sql.into_condition()
        } else {
            sql
        };

        if let Some(call) = sql.expression().find_untranslated() {
            tracing::warn!(
                "No translator for {}.{}; left as a generic call",
                call.method.declaring_type,
                call.method.name
            );
        }
        Ok(sql)
    }

    /// Like [`translate`](Self::translate), but fails when any method call
    /// was left untranslated.
    pub fn translate_checked(
        &self,
        select: &SelectExpression,
        expression: &Expr,
        condition: bool,
    ) -> RelationalResult<SqlExpression> {
        let sql = self.translate(select, expression, condition)?;
        match sql.expression().find_untranslated() {
            Some(call) => Err(RelationalError::unsupported(format!(
                "no translation for {}",
                Expr::MethodCall(call.clone())
            ))),
            None => Ok(sql),
        }
    }

    pub fn bool_mapping(&self) -> &TypeMapping {
        &self.bool_mapping
    }

    pub fn translators(&self) -> &TranslatorProvider {
        &self.translators
    }
}

/// One translation pass bound to one select.
struct Binder<'a> {
    translator: &'a RelationalSqlTranslator,
    select: &'a SelectExpression,
}

impl Binder<'_> {
    fn visit(&self, expression: &Expr) -> RelationalResult<Expr> {
        tracing::trace!("Visiting {}", expression);
        match expression {
            Expr::Member(member) => self.visit_member(member),
            Expr::MethodCall(call) => self.visit_method_call(call),
            Expr::Binary {
                op,
                left,
                right,
                ty,
            } => {
                let rebuilt = Expr::Binary {
                    op: *op,
                    left: Box::new(self.visit(left)?),
                    right: Box::new(self.visit(right)?),
                    ty: ty.clone(),
                };
                Ok(self.translator.inference.infer(rebuilt))
            }
            Expr::Unary { op, operand, ty } => self.visit_unary(*op, operand, ty),
            // Placeholders are consumed by member and method handling above;
            // SQL nodes are already translated.
            Expr::Constant { .. }
            | Expr::Parameter { .. }
            | Expr::EntityShaper(_)
            | Expr::ProjectionBinding(_)
            | Expr::Sql(_)
            | Expr::Column(_)
            | Expr::Cast(_)
            | Expr::Function(_)
            | Expr::Fragment(_) => Ok(expression.clone()),
        }
    }

    fn visit_member(&self, member: &MemberAccess) -> RelationalResult<Expr> {
        let receiver = member
            .receiver
            .as_deref()
            .map(|r| self.visit(r))
            .transpose()?;

        if let Some(Expr::EntityShaper(shaper)) = &receiver {
            return self.bind(shaper, &member.member);
        }

        let updated = member.update(receiver);
        Ok(self
            .translator
            .translators
            .translate_member(&updated)
            .unwrap_or(Expr::Member(updated)))
    }

    fn visit_method_call(&self, call: &MethodCall) -> RelationalResult<Expr> {
        let receiver = call
            .receiver
            .as_deref()
            .map(|r| self.visit(r))
            .transpose()?;
        let args = call
            .args
            .iter()
            .map(|arg| self.visit(arg))
            .collect::<RelationalResult<Vec<_>>>()?;

        if call.method.is_property_accessor() {
            let shaper = args
                .first()
                .map(strip_object_convert)
                .and_then(Expr::as_entity_shaper);
            if let Some(shaper) = shaper {
                let name = property_name(args.get(1))?;
                return self.bind(shaper, name);
            }
        }

        let updated = call.update(receiver, args);
        Ok(self
            .translator
            .translators
            .translate_method_call(&updated)
            .unwrap_or(Expr::MethodCall(updated)))
    }

    fn visit_unary(&self, op: UnaryOp, operand: &Expr, ty: &HostType) -> RelationalResult<Expr> {
        let operand = self.visit(operand)?;

        if op == UnaryOp::Convert && operand.is_sql() && !ty.is_object() {
            let mapping = self.translator.type_mappings.mapping(ty)?;
            let cast = SqlCast {
                operand: Box::new(operand),
                ty: ty.clone(),
                store_type: mapping.store_type.clone(),
            };
            return Ok(Expr::Sql(SqlExpression::new(Expr::Cast(cast), Some(mapping))));
        }

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            ty: ty.clone(),
        })
    }

    fn bind(&self, shaper: &EntityShaper, name: &str) -> RelationalResult<Expr> {
        let entity = &shaper.entity_type;
        let property = entity
            .find_property(name)
            .ok_or_else(|| RelationalError::unresolvable(&entity.name, name))?;
        self.select.bind_property(&shaper.value_buffer, property)
    }
}

/// The property accessor may see its entity argument boxed to `object`.
fn strip_object_convert(expression: &Expr) -> &Expr {
    match expression {
        Expr::Unary {
            op: UnaryOp::Convert,
            operand,
            ty: HostType::Object,
        } => &**operand,
        other => other,
    }
}

fn property_name(argument: Option<&Expr>) -> RelationalResult<&str> {
    let argument = argument.ok_or_else(|| {
        RelationalError::unsupported("property accessor requires a property name")
    })?;
    match argument {
        Expr::Constant { value, .. } => value.as_str(),
        _ => None,
    }
    .ok_or_else(|| {
        RelationalError::unsupported(format!(
            "property name must be a string constant, got {}",
            argument
        ))
    })
}
