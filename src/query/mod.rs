//! Query model and expression translation.

mod factory;
mod inference;
mod projection;
mod select;
mod shaped;
mod translator;

pub use factory::QueryTranslatorFactory;
pub use inference::TypeMappingInferrer;
pub use projection::*;
pub use select::{ProjectionPhase, SelectExpression};
pub use shaped::ShapedQuery;
pub use translator::RelationalSqlTranslator;
