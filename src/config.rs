//! TOML configuration: store type overrides and entity metadata.
//!
//! ```toml
//! [type_mappings]
//! bool = "bit"
//! string = "nvarchar(max)"
//!
//! [[entities]]
//! name = "Customer"
//! table = "Customers"
//! schema = "dbo"
//!
//! [[entities.properties]]
//! name = "Id"
//! type = "i32"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{RelationalError, RelationalResult};
use crate::metadata::{EntityType, Model};
use crate::storage::{DefaultTypeMappingSource, HostType};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationalConfig {
    /// Host type name -> store type, applied over the defaults.
    #[serde(default)]
    pub type_mappings: BTreeMap<String, String>,
    /// Start from an empty mapping table instead of the defaults.
    #[serde(default)]
    pub replace_default_mappings: bool,
    #[serde(default)]
    pub entities: Vec<EntityType>,
}

impl RelationalConfig {
    pub fn from_toml_str(content: &str) -> RelationalResult<Self> {
        toml::from_str(content)
            .map_err(|e| RelationalError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> RelationalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded {} entities and {} type mappings from {}",
            config.entities.len(),
            config.type_mappings.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn type_mapping_source(&self) -> DefaultTypeMappingSource {
        let mut source = if self.replace_default_mappings {
            DefaultTypeMappingSource::empty()
        } else {
            DefaultTypeMappingSource::default()
        };
        for (host_type, store_type) in &self.type_mappings {
            source.insert(HostType::from(host_type.as_str()), store_type.as_str());
        }
        source
    }

    pub fn model(&self) -> RelationalResult<Model> {
        Model::from_entities(self.entities.iter().cloned())
    }

    pub fn into_parts(self) -> RelationalResult<(Model, DefaultTypeMappingSource)> {
        let source = self.type_mapping_source();
        let model = Model::from_entities(self.entities)?;
        Ok((model, source))
    }
}
