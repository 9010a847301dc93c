//! @ai:module:intent Observable metrics and the optimization objectives derived from them
//! @ai:module:layer domain
//! @ai:module:public_api Metric, Objective
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent A raw observable produced by a benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    /// Position in the raw result vector.
    pub index: usize,
    /// Scalar (`true`) or one value per repeat (`false`).
    pub singular: bool,
}

impl Metric {
    pub fn new(name: &str, index: usize, singular: bool) -> Self {
        Self {
            name: name.to_string(),
            index,
            singular,
        }
    }
}

/// @ai:intent A directional optimization target over one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    /// The referenced metric; a search space only accepts it if it holds an identical one.
    pub metric: Metric,
    pub minimize: bool,
}

impl Objective {
    /// @ai:intent Create an objective referencing an existing metric
    pub fn new(name: &str, metric: &Metric, minimize: bool) -> Self {
        Self {
            name: name.to_string(),
            metric: metric.clone(),
            minimize,
        }
    }

    /// @ai:intent Human-readable optimization direction
    /// @ai:effects pure
    pub fn direction(&self) -> &'static str {
        if self.minimize {
            "minimize"
        } else {
            "maximize"
        }
    }
}
