//! @ai:module:intent Evaluate constraint expression trees against a bound configuration
//! @ai:module:layer domain
//! @ai:module:public_api evaluate
//! @ai:module:depends_on parser, value
//! @ai:module:stateless true

use super::parser::{BinaryOp, CompareOp, Expr, LogicalOp};
use super::EvalError;
use crate::value::{Configuration, Value};
use std::cmp::Ordering;

/// Intermediate result while walking the tree. `Undefined` is produced by
/// `x % 0`; a comparison it reaches is undefined too, `not` keeps it undefined
/// and the whole predicate only counts it as false at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operand<'a> {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(&'a str),
    Seq(&'a [i64]),
    Undefined,
}

impl Operand<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Operand::Int(_) => "integer",
            Operand::Real(_) => "real",
            Operand::Bool(_) => "boolean",
            Operand::Text(_) => "text",
            Operand::Seq(_) => "sequence",
            Operand::Undefined => "undefined",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Int(v) => Some(*v as f64),
            Operand::Real(v) => Some(*v),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Operand::Int(_) | Operand::Real(_))
    }
}

/// @ai:intent Evaluate a predicate tree to a boolean
/// @ai:pre every name read by the tree is bound in the configuration
/// @ai:post `and`/`or` operands are evaluated left to right with short-circuiting
/// @ai:effects pure
pub fn evaluate(expr: &Expr, config: &Configuration) -> Result<bool, EvalError> {
    match eval(expr, config)? {
        Operand::Bool(b) => Ok(b),
        Operand::Undefined => Ok(false),
        other => Err(EvalError::new(format!(
            "expression yields {}, expected boolean",
            other.type_name()
        ))),
    }
}

fn eval<'a>(expr: &'a Expr, config: &'a Configuration) -> Result<Operand<'a>, EvalError> {
    match expr {
        Expr::Int(v) => Ok(Operand::Int(*v)),
        Expr::Real(v) => Ok(Operand::Real(*v)),
        Expr::Text(s) => Ok(Operand::Text(s)),
        Expr::Bool(b) => Ok(Operand::Bool(*b)),
        Expr::Name(name) => lookup(name, config),
        Expr::Index { name, index } => {
            let items = match lookup(name, config)? {
                Operand::Seq(items) => items,
                other => {
                    return Err(EvalError::new(format!(
                        "cannot index `{}` of type {}",
                        name,
                        other.type_name()
                    )))
                }
            };
            let position = match eval(index, config)? {
                Operand::Int(i) => i,
                other => {
                    return Err(EvalError::new(format!(
                        "index into `{}` must be an integer, got {}",
                        name,
                        other.type_name()
                    )))
                }
            };
            usize::try_from(position)
                .ok()
                .and_then(|i| items.get(i))
                .map(|v| Operand::Int(*v))
                .ok_or_else(|| {
                    EvalError::new(format!(
                        "index {} out of range for `{}` of length {}",
                        position,
                        name,
                        items.len()
                    ))
                })
        }
        Expr::Neg(inner) => match eval(inner, config)? {
            Operand::Int(v) => Ok(v
                .checked_neg()
                .map(Operand::Int)
                .unwrap_or(Operand::Real(-(v as f64)))),
            Operand::Real(v) => Ok(Operand::Real(-v)),
            Operand::Undefined => Ok(Operand::Undefined),
            other => Err(EvalError::new(format!("cannot negate {}", other.type_name()))),
        },
        Expr::Not(inner) => match eval(inner, config)? {
            Operand::Bool(b) => Ok(Operand::Bool(!b)),
            Operand::Undefined => Ok(Operand::Undefined),
            other => Err(EvalError::new(format!(
                "`not` expects a boolean, got {}",
                other.type_name()
            ))),
        },
        Expr::Binary { op, lhs, rhs } => {
            let l = eval(lhs, config)?;
            let r = eval(rhs, config)?;
            arithmetic(*op, l, r)
        }
        Expr::Compare { op, lhs, rhs } => {
            let l = eval(lhs, config)?;
            let r = eval(rhs, config)?;
            if l == Operand::Undefined || r == Operand::Undefined {
                return Ok(Operand::Undefined);
            }
            compare(*op, l, r).map(Operand::Bool)
        }
        Expr::Logical { op, lhs, rhs } => {
            // An undefined side never satisfies the connective: `and` stops at it,
            // `or` only holds if the other side is true.
            let l = expect_truth(eval(lhs, config)?, *op)?;
            match (op, l) {
                (LogicalOp::And, Some(false)) => Ok(Operand::Bool(false)),
                (LogicalOp::And, None) => Ok(Operand::Undefined),
                (LogicalOp::Or, Some(true)) => Ok(Operand::Bool(true)),
                _ => {
                    let r = expect_truth(eval(rhs, config)?, *op)?;
                    Ok(match (l, r) {
                        (Some(_), Some(b)) => Operand::Bool(b),
                        (None, Some(true)) => Operand::Bool(true),
                        _ => Operand::Undefined,
                    })
                }
            }
        }
    }
}

fn lookup<'a>(name: &str, config: &'a Configuration) -> Result<Operand<'a>, EvalError> {
    match config.get(name) {
        Some(Value::Int(v)) => Ok(Operand::Int(*v)),
        Some(Value::Real(v)) => Ok(Operand::Real(*v)),
        Some(Value::Text(s)) => Ok(Operand::Text(s)),
        Some(Value::Sequence(items)) => Ok(Operand::Seq(items)),
        None => Err(EvalError::new(format!("`{}` is not bound", name))),
    }
}

/// `None` stands for an undefined operand.
fn expect_truth(operand: Operand<'_>, op: LogicalOp) -> Result<Option<bool>, EvalError> {
    match operand {
        Operand::Bool(b) => Ok(Some(b)),
        Operand::Undefined => Ok(None),
        other => {
            let word = match op {
                LogicalOp::And => "and",
                LogicalOp::Or => "or",
            };
            Err(EvalError::new(format!(
                "`{}` expects boolean operands, got {}",
                word,
                other.type_name()
            )))
        }
    }
}

fn arithmetic<'a>(op: BinaryOp, l: Operand<'a>, r: Operand<'a>) -> Result<Operand<'a>, EvalError> {
    let defined_or_numeric = |o: &Operand<'_>| o.is_numeric() || *o == Operand::Undefined;
    if !defined_or_numeric(&l) || !defined_or_numeric(&r) {
        return Err(EvalError::new(format!(
            "cannot apply `{}` to {} and {}",
            symbol(op),
            l.type_name(),
            r.type_name()
        )));
    }

    if op == BinaryOp::Mod {
        if matches!(l, Operand::Real(_)) || matches!(r, Operand::Real(_)) {
            return Err(EvalError::new("`%` requires integer operands"));
        }
        return Ok(match (l, r) {
            (Operand::Int(a), Operand::Int(b)) => floored_mod(a, b),
            _ => Operand::Undefined,
        });
    }

    if l == Operand::Undefined || r == Operand::Undefined {
        return Ok(Operand::Undefined);
    }

    if let (Operand::Int(a), Operand::Int(b)) = (l, r) {
        let exact = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div | BinaryOp::Mod => None,
        };
        if let Some(v) = exact {
            return Ok(Operand::Int(v));
        }
    }

    // Both operands are numeric at this point.
    let a = l.as_f64().unwrap_or_default();
    let b = r.as_f64().unwrap_or_default();
    match op {
        BinaryOp::Add => Ok(Operand::Real(a + b)),
        BinaryOp::Sub => Ok(Operand::Real(a - b)),
        BinaryOp::Mul => Ok(Operand::Real(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                Err(EvalError::new("division by zero"))
            } else {
                Ok(Operand::Real(a / b))
            }
        }
        BinaryOp::Mod => Ok(Operand::Undefined),
    }
}

/// Modulo whose result takes the sign of the divisor; zero divisor is undefined.
fn floored_mod<'a>(a: i64, b: i64) -> Operand<'a> {
    if b == 0 {
        return Operand::Undefined;
    }
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && (r < 0) != (b < 0) {
        Operand::Int(r + b)
    } else {
        Operand::Int(r)
    }
}

fn compare(op: CompareOp, l: Operand<'_>, r: Operand<'_>) -> Result<bool, EvalError> {
    let ordering = match (l, r) {
        (Operand::Int(a), Operand::Int(b)) => Some(a.cmp(&b)),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            let (x, y) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
            match x.partial_cmp(&y) {
                Some(ordering) => Some(ordering),
                None => return Ok(op == CompareOp::Ne),
            }
        }
        (Operand::Text(a), Operand::Text(b)) => return equality(op, a == b),
        (Operand::Seq(a), Operand::Seq(b)) => return equality(op, a == b),
        (Operand::Bool(a), Operand::Bool(b)) => return equality(op, a == b),
        _ => None,
    };

    let Some(ordering) = ordering else {
        return Err(EvalError::new(format!(
            "cannot compare {} with {}",
            l.type_name(),
            r.type_name()
        )));
    };

    Ok(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    })
}

fn equality(op: CompareOp, equal: bool) -> Result<bool, EvalError> {
    match op {
        CompareOp::Eq => Ok(equal),
        CompareOp::Ne => Ok(!equal),
        _ => Err(EvalError::new("only `==` and `!=` apply to non-numeric values")),
    }
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::parse;

    fn config(pairs: &[(&str, Value)]) -> Configuration {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn eval_str(source: &str, cfg: &Configuration) -> Result<bool, EvalError> {
        evaluate(&parse(source).unwrap(), cfg)
    }

    #[test]
    fn test_true_division() {
        let cfg = config(&[("x", Value::Int(7))]);
        assert!(eval_str("x / 2 == 3.5", &cfg).unwrap());
        assert!(!eval_str("x / 2 == 3", &cfg).unwrap());
    }

    #[test]
    fn test_floored_modulo() {
        let cfg = config(&[("x", Value::Int(-7))]);
        assert!(eval_str("x % 3 == 2", &cfg).unwrap());
        assert!(eval_str("7 % -3 == -2", &cfg).unwrap());
    }

    #[test]
    fn test_modulo_requires_integers() {
        let cfg = config(&[("x", Value::Real(4.0))]);
        assert!(eval_str("x % 2 == 0", &cfg).is_err());
    }

    #[test]
    fn test_modulo_by_zero_compares_false() {
        let cfg = config(&[("a", Value::Int(8)), ("b", Value::Int(0))]);
        assert!(!eval_str("a % b == 0", &cfg).unwrap());
        assert!(!eval_str("a % b != 0", &cfg).unwrap());
    }

    #[test]
    fn test_negated_modulo_by_zero_stays_false() {
        let cfg = config(&[("a", Value::Int(8)), ("b", Value::Int(0))]);
        assert!(!eval_str("not (a % b == 0)", &cfg).unwrap());
        assert!(!eval_str("not not (a % b == 0)", &cfg).unwrap());
        assert!(!eval_str("not ((a % b == 0) and (a > 1))", &cfg).unwrap());
        assert!(!eval_str("not ((a % b == 0) or (a < 1))", &cfg).unwrap());
        assert!(eval_str("(a % b == 0) or (a > 1)", &cfg).unwrap());
        assert!(eval_str("not (a % b == 0) or (b == 0)", &cfg).unwrap());
        assert!(!eval_str("(a > 1) and (b > 1)", &cfg).unwrap());
        assert!(!eval_str("(a > 1) and (a % b == 0)", &cfg).unwrap());
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let cfg = config(&[("a", Value::Int(8)), ("b", Value::Int(0))]);
        let err = eval_str("a / b >= 1", &cfg).unwrap_err();
        assert!(err.message.contains("division by zero"));
    }

    #[test]
    fn test_and_short_circuits_before_division() {
        let cfg = config(&[
            ("a", Value::Int(8)),
            ("b", Value::Int(0)),
            ("c", Value::Int(4)),
            ("d", Value::Int(16)),
        ]);
        assert!(!eval_str("(a % (b*c) == 0) and (d / (b*c) >= 1)", &cfg).unwrap());
        assert!(eval_str("(b == 0) or (d / b >= 1)", &cfg).unwrap());
        assert!(eval_str("(d / b >= 1) or (b == 0)", &cfg).is_err());
    }

    #[test]
    fn test_symbolic_connectives() {
        let cfg = config(&[("p", Value::Sequence(vec![1, 0, 2, 3, 4]))]);
        assert!(eval_str("(p[0] == 4) | ((p[0] == 1) & (p[1] == 0))", &cfg).unwrap());
        assert!(!eval_str("not (p[4] == 4)", &cfg).unwrap());
    }

    #[test]
    fn test_integer_overflow_promotes_to_real() {
        let cfg = config(&[("x", Value::Int(i64::MAX))]);
        assert!(eval_str("x * 2 > x", &cfg).unwrap());
    }

    #[test]
    fn test_evaluation_errors() {
        let cfg = config(&[("x", Value::Int(3)), ("p", Value::Sequence(vec![0, 1]))]);
        assert!(eval_str("y == 1", &cfg).is_err());
        assert!(eval_str("x[0] == 1", &cfg).is_err());
        assert!(eval_str("p[2] == 1", &cfg).is_err());
        assert!(eval_str("p[-1] == 1", &cfg).is_err());
        assert!(eval_str("x + 1", &cfg).is_err());
        assert!(eval_str("x and true", &cfg).is_err());
        assert!(eval_str("'a' < 'b'", &cfg).is_err());
    }

    #[test]
    fn test_text_equality() {
        let cfg = config(&[("format", Value::Text("csr".to_string()))]);
        assert!(eval_str("format == 'csr'", &cfg).unwrap());
        assert!(eval_str("format != \"coo\"", &cfg).unwrap());
    }
}
