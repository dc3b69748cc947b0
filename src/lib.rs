//! # QAIL Relational
//!
//! Compiles host query expressions into SQL-bound scalar trees and keeps the
//! select model they are applied to.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use qail_relational::prelude::*;
//! use qail_relational::ast::builders::*;
//!
//! let (model, types) = RelationalConfig::load_from_file("relational.toml")?.into_parts()?;
//! let factory = QueryTranslatorFactory::new(Arc::new(types), Arc::new(TranslatorProvider::relational()));
//!
//! let mut query = factory.shaped_query(model.entity("Customer")?)?;
//! let translator = factory.create()?;
//!
//! // c => c.City == "Berlin"
//! let city = member(query.shaper().clone(), "City", HostType::String);
//! let predicate = translator.translate(query.query(), &eq(city, constant("Berlin")), true)?;
//! query.query_mut().apply_predicate(predicate);
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Metadata | [`metadata::Model`], [`metadata::EntityType`] |
//! | Store types | [`storage::TypeMappingSource`] |
//! | Rewrite rules | [`translators::TranslatorProvider`] |
//! | Translation | [`query::RelationalSqlTranslator`] |
//! | Query model | [`query::SelectExpression`] |

pub mod ast;
pub mod config;
pub mod error;
pub mod metadata;
pub mod query;
pub mod storage;
pub mod translators;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::RelationalConfig;
    pub use crate::error::*;
    pub use crate::metadata::{EntityType, Model, Property};
    pub use crate::query::*;
    pub use crate::storage::*;
    pub use crate::translators::*;
    pub use std::sync::Arc;
}
