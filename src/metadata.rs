//! Entity metadata: which table an entity maps to and which columns back its properties.
//!
//! Metadata is read-only during compilation. It is usually loaded from the
//! `[[entities]]` section of a [`RelationalConfig`](crate::config::RelationalConfig)
//! or from a JSON document with [`Model::from_json_str`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{RelationalError, RelationalResult};
use crate::storage::{HostType, TypeMapping, TypeMappingSource};

/// A mapped property of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub host_type: HostType,
    /// Column name, defaults to the property name.
    #[serde(default)]
    pub column: Option<String>,
    /// Explicit store type, taking precedence over the type mapping source.
    #[serde(default)]
    pub store_type: Option<String>,
    #[serde(default)]
    pub nullable: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            name: name.into(),
            host_type,
            column: None,
            store_type: None,
            nullable: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn store_type(mut self, store_type: impl Into<String>) -> Self {
        self.store_type = Some(store_type.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Resolve the store type mapping of this property.
    pub fn type_mapping(&self, source: &dyn TypeMappingSource) -> RelationalResult<TypeMapping> {
        match &self.store_type {
            Some(store_type) => Ok(TypeMapping::new(store_type.clone(), self.host_type.clone())),
            None => source.mapping(&self.host_type),
        }
    }
}

/// An entity type and its table mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    /// Properties in declared order; projection expands them in this order.
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl EntityType {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            schema: None,
            properties: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn host_type(&self) -> HostType {
        HostType::Entity(self.name.clone())
    }

    /// Check that the entity can be mapped: a table name, at least one
    /// property and unique property names.
    ///
    /// A projected entity must contribute at least one column, otherwise the
    /// member after it would share its projection index.
    pub fn validate(&self) -> RelationalResult<()> {
        if self.table.trim().is_empty() {
            return Err(RelationalError::Metadata(format!(
                "entity '{}' has no table name",
                self.name
            )));
        }
        if self.properties.is_empty() {
            return Err(RelationalError::Metadata(format!(
                "entity '{}' maps no properties",
                self.name
            )));
        }
        for (i, property) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(RelationalError::Metadata(format!(
                    "entity '{}' declares property '{}' twice",
                    self.name, property.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ModelDocument {
    entities: Vec<EntityType>,
}

/// Registry of entity types, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct Model {
    entities: IndexMap<String, Arc<EntityType>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a model from `{"entities": [...]}` JSON.
    pub fn from_json_str(json: &str) -> RelationalResult<Self> {
        let document: ModelDocument = serde_json::from_str(json)
            .map_err(|e| RelationalError::Metadata(format!("Failed to parse model: {}", e)))?;
        Self::from_entities(document.entities)
    }

    pub fn from_entities(entities: impl IntoIterator<Item = EntityType>) -> RelationalResult<Self> {
        let mut model = Self::new();
        for entity in entities {
            model.add_entity(entity)?;
        }
        Ok(model)
    }

    pub fn add_entity(&mut self, entity: EntityType) -> RelationalResult<Arc<EntityType>> {
        entity.validate()?;
        if self.entities.contains_key(&entity.name) {
            return Err(RelationalError::Metadata(format!(
                "entity '{}' is declared twice",
                entity.name
            )));
        }
        tracing::debug!("Registered entity {} -> {}", entity.name, entity.table);
        let entity = Arc::new(entity);
        self.entities.insert(entity.name.clone(), Arc::clone(&entity));
        Ok(entity)
    }

    pub fn find_entity(&self, name: &str) -> Option<Arc<EntityType>> {
        self.entities.get(name).cloned()
    }

    pub fn entity(&self, name: &str) -> RelationalResult<Arc<EntityType>> {
        self.find_entity(name)
            .ok_or_else(|| RelationalError::Metadata(format!("entity '{}' is not mapped", name)))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DefaultTypeMappingSource;

    fn customer() -> EntityType {
        EntityType::new("Customer", "Customers")
            .schema("dbo")
            .property(Property::new("Id", HostType::Int32))
            .property(Property::new("Name", HostType::String).column("customer_name"))
    }

    #[test]
    fn test_find_property() {
        let entity = customer();
        assert_eq!(entity.find_property("Name").unwrap().column_name(), "customer_name");
        assert_eq!(entity.find_property("Id").unwrap().column_name(), "Id");
        assert!(entity.find_property("name").is_none());
    }

    #[test]
    fn test_store_type_override() {
        let source = DefaultTypeMappingSource::default();
        let property = Property::new("Code", HostType::String).store_type("nchar(3)");
        assert_eq!(property.type_mapping(&source).unwrap().store_type, "nchar(3)");
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let entity = customer().property(Property::new("Id", HostType::Int64));
        assert!(matches!(entity.validate(), Err(RelationalError::Metadata(_))));
    }

    #[test]
    fn test_entity_without_properties_rejected() {
        let err = EntityType::new("Empty", "Empties").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid metadata: entity 'Empty' maps no properties");
    }

    #[test]
    fn test_model_from_json() {
        let model = Model::from_json_str(
            r#"{"entities": [
                {"name": "Order", "table": "Orders", "properties": [
                    {"name": "Id", "type": "i64"},
                    {"name": "Total", "type": "decimal", "nullable": true}
                ]}
            ]}"#,
        )
        .unwrap();

        let order = model.entity("Order").unwrap();
        assert_eq!(order.table_name(), "Orders");
        assert_eq!(order.schema_name(), None);
        assert_eq!(order.properties().len(), 2);
        assert!(order.find_property("Total").unwrap().nullable);
        assert!(model.entity("Customer").is_err());
    }
}
