use std::sync::Arc;

use crate::error::RelationalResult;
use crate::metadata::EntityType;
use crate::query::shaped::ShapedQuery;
use crate::query::translator::RelationalSqlTranslator;
use crate::storage::TypeMappingSource;
use crate::translators::TranslatorProvider;

/// Creates translators and shaped queries from injected collaborators.
///
/// Each compilation gets its own translator and select, so queries can be
/// compiled in parallel as long as every thread uses its own instances.
#[derive(Clone)]
pub struct QueryTranslatorFactory {
    type_mappings: Arc<dyn TypeMappingSource>,
    translators: Arc<TranslatorProvider>,
}

impl QueryTranslatorFactory {
    pub fn new(
        type_mappings: Arc<dyn TypeMappingSource>,
        translators: Arc<TranslatorProvider>,
    ) -> Self {
        Self {
            type_mappings,
            translators,
        }
    }

    pub fn create(&self) -> RelationalResult<RelationalSqlTranslator> {
        RelationalSqlTranslator::new(Arc::clone(&self.type_mappings), Arc::clone(&self.translators))
    }

    /// A fresh shaped query over `entity_type`.
    pub fn shaped_query(&self, entity_type: Arc<EntityType>) -> RelationalResult<ShapedQuery> {
        ShapedQuery::new(entity_type, self.type_mappings.as_ref())
    }

    pub fn type_mappings(&self) -> &dyn TypeMappingSource {
        self.type_mappings.as_ref()
    }

    pub fn translators(&self) -> &TranslatorProvider {
        &self.translators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Property;
    use crate::storage::{DefaultTypeMappingSource, HostType};

    #[test]
    fn test_instances_are_independent() {
        let factory = QueryTranslatorFactory::new(
            Arc::new(DefaultTypeMappingSource::default()),
            Arc::new(TranslatorProvider::relational()),
        );
        let entity = Arc::new(
            EntityType::new("Tag", "Tags").property(Property::new("Label", HostType::String)),
        );

        let mut first = factory.shaped_query(Arc::clone(&entity)).unwrap();
        let second = factory.shaped_query(entity).unwrap();
        first.query_mut().apply_projection().unwrap();

        assert!(first.query().is_projection_applied());
        assert!(!second.query().is_projection_applied());
        assert_eq!(factory.create().unwrap().bool_mapping().store_type, "boolean");
    }
}
