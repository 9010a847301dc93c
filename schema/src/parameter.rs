//! @ai:module:intent Typed parameter domains with default validation and membership checks
//! @ai:module:layer domain
//! @ai:module:public_api Parameter, Domain, is_identifier
//! @ai:module:depends_on value, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

/// Words the constraint language claims for itself.
pub(crate) const RESERVED_WORDS: [&str; 5] = ["and", "or", "not", "true", "false"];

/// @ai:intent Check whether a name can be referenced from a constraint expression
/// @ai:example ("tuned_gs0") -> true
/// @ai:example ("0abc") -> false
/// @ai:example ("and") -> false
/// @ai:effects pure
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !RESERVED_WORDS.contains(&name)
}

/// @ai:intent The set of admissible values of one tunable dimension
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Inclusive integer range, step 1.
    Integer { lo: i64, hi: i64 },
    /// Inclusive continuous range.
    Real { lo: f64, hi: f64 },
    /// Values `lo * base^k` for `k >= 0` that do not exceed `hi`.
    IntExponential { lo: i64, hi: i64, base: i64 },
    Categorical { categories: Vec<Value> },
    /// All orderings of `0..length`.
    Permutation { length: usize },
}

/// @ai:intent A named tunable dimension with an optional validated default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterSpec", into = "ParameterSpec")]
pub struct Parameter {
    name: String,
    default: Option<Value>,
    domain: Domain,
}

impl Parameter {
    /// @ai:intent Create an inclusive integer parameter
    /// @ai:pre lo <= hi, default within bounds
    /// @ai:effects pure
    pub fn integer(name: &str, bounds: (i64, i64), default: Option<i64>) -> Result<Self> {
        let (lo, hi) = bounds;
        if lo > hi {
            return Err(Error::schema(
                name,
                format!("lower bound {} exceeds upper bound {}", lo, hi),
            ));
        }
        Self::new(name, Domain::Integer { lo, hi }, default.map(Value::Int))
    }

    /// @ai:intent Create a continuous parameter
    /// @ai:pre bounds are finite and lo <= hi
    /// @ai:effects pure
    pub fn real(name: &str, bounds: (f64, f64), default: Option<f64>) -> Result<Self> {
        let (lo, hi) = bounds;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(Error::schema(name, "bounds must be finite"));
        }
        if lo > hi {
            return Err(Error::schema(
                name,
                format!("lower bound {} exceeds upper bound {}", lo, hi),
            ));
        }
        Self::new(name, Domain::Real { lo, hi }, default.map(Value::Real))
    }

    /// @ai:intent Create an integer parameter stepped by powers of `base` from the lower bound
    /// @ai:pre 1 <= lo <= hi, base >= 2
    /// @ai:effects pure
    pub fn int_exponential(
        name: &str,
        bounds: (i64, i64),
        base: i64,
        default: Option<i64>,
    ) -> Result<Self> {
        let (lo, hi) = bounds;
        if lo < 1 {
            return Err(Error::schema(
                name,
                format!("lower bound must be at least 1, got {}", lo),
            ));
        }
        if lo > hi {
            return Err(Error::schema(
                name,
                format!("lower bound {} exceeds upper bound {}", lo, hi),
            ));
        }
        if base < 2 {
            return Err(Error::schema(name, format!("base must be at least 2, got {}", base)));
        }
        Self::new(name, Domain::IntExponential { lo, hi, base }, default.map(Value::Int))
    }

    /// @ai:intent Create a parameter over an ordered set of categories
    /// @ai:pre categories non-empty and distinct
    /// @ai:effects pure
    pub fn categorical(name: &str, categories: Vec<Value>, default: Option<Value>) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::schema(name, "categories must not be empty"));
        }
        for (i, category) in categories.iter().enumerate() {
            if categories[..i].contains(category) {
                return Err(Error::schema(name, format!("duplicate category {}", category)));
            }
        }
        Self::new(name, Domain::Categorical { categories }, default)
    }

    /// @ai:intent Create a parameter over all permutations of `0..length`
    /// @ai:pre length >= 1
    /// @ai:effects pure
    pub fn permutation(name: &str, length: usize, default: Option<Vec<i64>>) -> Result<Self> {
        if length < 1 {
            return Err(Error::schema(name, "permutation length must be at least 1"));
        }
        Self::new(name, Domain::Permutation { length }, default.map(Value::Sequence))
    }

    fn new(name: &str, domain: Domain, default: Option<Value>) -> Result<Self> {
        if !is_identifier(name) {
            return Err(Error::schema(name, "name is not a valid identifier"));
        }

        if let Some(value) = &default {
            domain
                .check(value)
                .map_err(|reason| Error::schema(name, format!("invalid default: {}", reason)))?;
        }

        Ok(Self {
            name: name.to_string(),
            default,
            domain,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// @ai:intent Decide membership of a candidate value in this parameter's domain
    /// @ai:effects pure
    pub fn contains(&self, value: &Value) -> bool {
        self.domain.check(value).is_ok()
    }

    /// @ai:intent Membership check that reports why a value was rejected
    /// @ai:effects pure
    pub fn validate_value(&self, value: &Value) -> Result<()> {
        self.domain.check(value).map_err(|reason| {
            Error::InvalidConfiguration(format!("`{}`: {}", self.name, reason))
        })
    }
}

impl Domain {
    /// @ai:intent Short label of the domain kind
    /// @ai:effects pure
    pub fn kind(&self) -> &'static str {
        match self {
            Domain::Integer { .. } => "integer",
            Domain::Real { .. } => "real",
            Domain::IntExponential { .. } => "int_exponential",
            Domain::Categorical { .. } => "categorical",
            Domain::Permutation { .. } => "permutation",
        }
    }

    /// @ai:intent Number of admissible values, None when continuous or too large to count
    /// @ai:effects pure
    pub fn cardinality(&self) -> Option<u64> {
        match self {
            Domain::Integer { lo, hi } => u64::try_from(i128::from(*hi) - i128::from(*lo) + 1).ok(),
            Domain::Real { lo, hi } => (lo == hi).then_some(1),
            Domain::IntExponential { lo, hi, base } => {
                let mut count = 1;
                let mut step = *lo;
                while let Some(next) = step.checked_mul(*base) {
                    if next > *hi {
                        break;
                    }
                    step = next;
                    count += 1;
                }
                Some(count)
            }
            Domain::Categorical { categories } => Some(categories.len() as u64),
            Domain::Permutation { length } => {
                (1..=*length as u64).try_fold(1u64, |acc, n| acc.checked_mul(n))
            }
        }
    }

    /// @ai:intent Check membership, explaining the rejection
    /// @ai:effects pure
    pub(crate) fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Domain::Integer { lo, hi } => {
                let v = expect_int(value)?;
                if v < *lo || v > *hi {
                    return Err(format!("{} is outside [{}, {}]", v, lo, hi));
                }
                Ok(())
            }
            Domain::Real { lo, hi } => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| format!("expected a number, got {}", value.type_name()))?;
                if v.is_nan() || v < *lo || v > *hi {
                    return Err(format!("{} is outside [{}, {}]", v, lo, hi));
                }
                Ok(())
            }
            Domain::IntExponential { lo, hi, base } => {
                let v = expect_int(value)?;
                if v < *lo || v > *hi {
                    return Err(format!("{} is outside [{}, {}]", v, lo, hi));
                }
                let mut step = *lo;
                while step < v {
                    step = match step.checked_mul(*base) {
                        Some(next) => next,
                        None => break,
                    };
                }
                if step != v {
                    return Err(format!("{} is not {} times a power of {}", v, lo, base));
                }
                Ok(())
            }
            Domain::Categorical { categories } => {
                if categories.contains(value) {
                    Ok(())
                } else {
                    Err(format!("{} is not one of the categories", value))
                }
            }
            Domain::Permutation { length } => {
                let items = match value {
                    Value::Sequence(items) => items,
                    other => return Err(format!("expected a sequence, got {}", other.type_name())),
                };
                if items.len() != *length {
                    return Err(format!(
                        "expected {} elements, got {}",
                        length,
                        items.len()
                    ));
                }
                let mut seen = vec![false; *length];
                for item in items {
                    let slot = usize::try_from(*item)
                        .ok()
                        .filter(|i| *i < *length)
                        .ok_or_else(|| format!("{} is outside 0..{}", item, length))?;
                    if seen[slot] {
                        return Err(format!("{} appears more than once", item));
                    }
                    seen[slot] = true;
                }
                Ok(())
            }
        }
    }
}

fn expect_int(value: &Value) -> std::result::Result<i64, String> {
    value
        .as_i64()
        .ok_or_else(|| format!("expected an integer, got {}", value.type_name()))
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Integer { lo, hi } => write!(f, "integer [{}, {}]", lo, hi),
            Domain::Real { lo, hi } => write!(f, "real [{}, {}]", lo, hi),
            Domain::IntExponential { lo, hi, base } => {
                write!(f, "int_exponential [{}, {}] base {}", lo, hi, base)
            }
            Domain::Categorical { categories } => {
                let parts: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
                write!(f, "categorical {{{}}}", parts.join(", "))
            }
            Domain::Permutation { length } => write!(f, "permutation of {}", length),
        }
    }
}

/// @ai:intent Serialized form of a parameter, mirroring the authoring syntax
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ParameterSpec {
    Integer {
        name: String,
        bounds: (i64, i64),
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
    },
    Real {
        name: String,
        bounds: (f64, f64),
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
    },
    IntExponential {
        name: String,
        bounds: (i64, i64),
        base: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
    },
    Categorical {
        name: String,
        categories: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
    },
    Permutation {
        name: String,
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Vec<i64>>,
    },
}

impl TryFrom<ParameterSpec> for Parameter {
    type Error = Error;

    fn try_from(spec: ParameterSpec) -> Result<Self> {
        match spec {
            ParameterSpec::Integer { name, bounds, default } => {
                Parameter::integer(&name, bounds, default)
            }
            ParameterSpec::Real {
                name,
                bounds,
                default,
            } => Parameter::real(&name, bounds, default),
            ParameterSpec::IntExponential {
                name,
                bounds,
                base,
                default,
            } => Parameter::int_exponential(&name, bounds, base, default),
            ParameterSpec::Categorical {
                name,
                categories,
                default,
            } => Parameter::categorical(&name, categories, default),
            ParameterSpec::Permutation { name, length, default } => {
                Parameter::permutation(&name, length, default)
            }
        }
    }
}

impl From<Parameter> for ParameterSpec {
    fn from(param: Parameter) -> Self {
        let Parameter {
            name,
            default,
            domain,
        } = param;

        match domain {
            Domain::Integer { lo, hi } => ParameterSpec::Integer {
                name,
                bounds: (lo, hi),
                default: default.and_then(|v| v.as_i64()),
            },
            Domain::Real { lo, hi } => ParameterSpec::Real {
                name,
                bounds: (lo, hi),
                default: default.and_then(|v| v.as_f64()),
            },
            Domain::IntExponential { lo, hi, base } => ParameterSpec::IntExponential {
                name,
                bounds: (lo, hi),
                base,
                default: default.and_then(|v| v.as_i64()),
            },
            Domain::Categorical { categories } => ParameterSpec::Categorical {
                name,
                categories,
                default,
            },
            Domain::Permutation { length } => ParameterSpec::Permutation {
                name,
                length,
                default: match default {
                    Some(Value::Sequence(items)) => Some(items),
                    _ => None,
                },
            },
        }
    }
}
