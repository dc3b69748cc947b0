use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The type a host expression evaluates to, before any store type is chosen.
///
/// Serialized as its configuration name (`"i32"`, `"string"`, ...), so it can
/// be used directly as a key in TOML and JSON metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    DateTime,
    Uuid,
    Bytes,
    /// The generic "any" type. Conversions to it are never turned into casts.
    Object,
    /// Row type of a mapped entity.
    Entity(String),
    /// Any other host type, identified by name (e.g. `MultiLineString`).
    Named(String),
}

impl HostType {
    pub fn is_bool(&self) -> bool {
        matches!(self, HostType::Bool)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, HostType::Object)
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, HostType::Entity(_))
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Bool => write!(f, "bool"),
            HostType::Int16 => write!(f, "i16"),
            HostType::Int32 => write!(f, "i32"),
            HostType::Int64 => write!(f, "i64"),
            HostType::Float32 => write!(f, "f32"),
            HostType::Float64 => write!(f, "f64"),
            HostType::Decimal => write!(f, "decimal"),
            HostType::String => write!(f, "string"),
            HostType::DateTime => write!(f, "datetime"),
            HostType::Uuid => write!(f, "uuid"),
            HostType::Bytes => write!(f, "bytes"),
            HostType::Object => write!(f, "object"),
            HostType::Entity(name) => write!(f, "entity:{}", name),
            HostType::Named(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for HostType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim() {
            "bool" | "boolean" => HostType::Bool,
            "i16" => HostType::Int16,
            "i32" | "int" => HostType::Int32,
            "i64" | "long" => HostType::Int64,
            "f32" => HostType::Float32,
            "f64" | "double" => HostType::Float64,
            "decimal" => HostType::Decimal,
            "string" | "str" => HostType::String,
            "datetime" | "timestamp" => HostType::DateTime,
            "uuid" => HostType::Uuid,
            "bytes" => HostType::Bytes,
            "object" | "any" => HostType::Object,
            other => match other.strip_prefix("entity:") {
                Some(entity) => HostType::Entity(entity.to_string()),
                None => HostType::Named(other.to_string()),
            },
        };
        Ok(ty)
    }
}

impl From<String> for HostType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for HostType {
    fn from(s: &str) -> Self {
        HostType::from(s.to_string())
    }
}

impl From<HostType> for String {
    fn from(ty: HostType) -> Self {
        ty.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_names() {
        assert_eq!(HostType::from("bool"), HostType::Bool);
        assert_eq!(HostType::from("long"), HostType::Int64);
        assert_eq!(HostType::from("entity:Customer"), HostType::Entity("Customer".to_string()));
        assert_eq!(HostType::from("MultiLineString"), HostType::Named("MultiLineString".to_string()));
    }

    #[test]
    fn test_display_parses_back() {
        for ty in [
            HostType::Int16,
            HostType::Float32,
            HostType::Uuid,
            HostType::Object,
            HostType::Entity("Order".to_string()),
        ] {
            assert_eq!(HostType::from(ty.to_string()), ty);
        }
    }
}
