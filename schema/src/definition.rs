//! @ai:module:intent Name a search space as a benchmark's public schema
//! @ai:module:layer domain
//! @ai:module:public_api ProblemDefinition
//! @ai:module:depends_on space
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// @ai:intent A benchmark's canonical name bound to its search space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionSpec", into = "DefinitionSpec")]
pub struct ProblemDefinition {
    name: String,
    search_space: SearchSpace,
}

impl ProblemDefinition {
    /// @ai:intent Bind a search space under a lowercased benchmark name
    /// @ai:pre name is non-empty
    /// @ai:example ("SPMM", space) -> name "spmm"
    /// @ai:effects pure
    pub fn new(name: &str, search_space: SearchSpace) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::schema(name, "benchmark name must not be empty"));
        }
        Ok(Self {
            name: name.to_lowercase(),
            search_space,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefinitionSpec {
    name: String,
    search_space: SearchSpace,
}

impl TryFrom<DefinitionSpec> for ProblemDefinition {
    type Error = Error;

    fn try_from(spec: DefinitionSpec) -> Result<Self> {
        ProblemDefinition::new(&spec.name, spec.search_space)
    }
}

impl From<ProblemDefinition> for DefinitionSpec {
    fn from(definition: ProblemDefinition) -> Self {
        DefinitionSpec {
            name: definition.name,
            search_space: definition.search_space,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;

    fn space() -> SearchSpace {
        SearchSpace::builder()
            .params(vec![Parameter::integer("tile", (1, 8), Some(2)).unwrap()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_name_is_lowercased() {
        let def = ProblemDefinition::new("SpMM", space()).unwrap();
        assert_eq!(def.name(), "spmm");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(ProblemDefinition::new("  ", space()).is_err());
    }

    #[test]
    fn test_deserialize_normalizes_name() {
        let json = r#"{
            "name": "Kmeans",
            "search_space": {
                "params": [{"type": "integer", "name": "tile", "bounds": [1, 8], "default": 2}]
            }
        }"#;
        let def: ProblemDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.name(), "kmeans");
        assert_eq!(def.search_space().params().len(), 1);
    }
}
