//! Element-wise operations on cell values.
//!
//! Null propagates through arithmetic and compares false (except `!=`),
//! matching how missing values behave in a dataframe.

use super::ast::BinOp;
use crate::dataset::Value;
use std::cmp::Ordering;

/// Type label used in error messages.
pub fn type_label(value: &Value) -> &'static str {
    value.column_type().map(|t| t.as_str()).unwrap_or("null")
}

/// Numeric view of a value: booleans count as 0/1.
fn numeric(value: &Value) -> Option<Value> {
    match value {
        Value::Int(_) | Value::Float(_) => Some(value.clone()),
        Value::Bool(b) => Some(Value::Int(i64::from(*b))),
        _ => None,
    }
}

/// Applies `+ - * /` to two values.
pub fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, String> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    if op == BinOp::Add {
        if let (Value::Text(a), Value::Text(b)) = (left, right) {
            return Ok(Value::Text(format!("{a}{b}")));
        }
    }

    let unsupported = || {
        format!(
            "unsupported operand types for {}: '{}' and '{}'",
            op.symbol(),
            type_label(left),
            type_label(right)
        )
    };
    let (a, b) = match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(unsupported()),
    };

    if let (Value::Int(x), Value::Int(y)) = (&a, &b) {
        let exact = match op {
            BinOp::Add => x.checked_add(*y),
            BinOp::Sub => x.checked_sub(*y),
            BinOp::Mul => x.checked_mul(*y),
            _ => None,
        };
        if let Some(result) = exact {
            return Ok(Value::Int(result));
        }
    }

    let (x, y) = match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(unsupported()),
    };
    let result = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div => x / y,
        _ => return Err(unsupported()),
    };
    Ok(Value::Float(result))
}

/// Equality across compatible types; incompatible types are simply unequal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }
    left.partial_cmp_loose(right) == Some(Ordering::Equal)
}

/// Applies a comparison operator, yielding a boolean value.
pub fn compare(op: BinOp, left: &Value, right: &Value) -> Result<Value, String> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Bool(op == BinOp::NotEq));
    }

    let result = match op {
        BinOp::Eq => values_equal(left, right),
        BinOp::NotEq => !values_equal(left, right),
        _ => {
            let ordering = left.partial_cmp_loose(right).ok_or_else(|| {
                format!(
                    "'{}' not supported between '{}' and '{}' values",
                    op.symbol(),
                    type_label(left),
                    type_label(right)
                )
            })?;
            match op {
                BinOp::Lt => ordering == Ordering::Less,
                BinOp::LtEq => ordering != Ordering::Greater,
                BinOp::Gt => ordering == Ordering::Greater,
                BinOp::GtEq => ordering != Ordering::Less,
                _ => unreachable!("equality handled above"),
            }
        }
    };
    Ok(Value::Bool(result))
}

/// Applies `&` or `|` to two boolean values. Null counts as false.
pub fn logical(op: BinOp, left: &Value, right: &Value) -> Result<Value, String> {
    let a = truthy(left, op)?;
    let b = truthy(right, op)?;
    Ok(Value::Bool(match op {
        BinOp::And => a && b,
        _ => a || b,
    }))
}

fn truthy(value: &Value, op: BinOp) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        other => Err(format!(
            "operator {} requires boolean operands, got '{}'",
            op.symbol(),
            type_label(other)
        )),
    }
}

/// Unary minus.
pub fn negate(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(i) => Ok(i.checked_neg().map_or(Value::Float(-(*i as f64)), Value::Int)),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::Bool(b) => Ok(Value::Int(-i64::from(*b))),
        other => Err(format!("bad operand type for unary -: '{}'", type_label(other))),
    }
}

/// Unary `~` (boolean not).
pub fn invert(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(format!("bad operand type for unary ~: '{}'", type_label(other))),
    }
}

/// Canonical key for grouping and distinct counts; int and float compare
/// equal when numerically equal.
pub fn distinct_key(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("b:{b}"),
        Value::Int(_) | Value::Float(_) => {
            let f = value.as_f64().unwrap_or(f64::NAN);
            let f = if f == 0.0 { 0.0 } else { f };
            format!("n:{}", f.to_bits())
        }
        Value::Text(s) => format!("t:{s}"),
        Value::Date(_) | Value::DateTime(_) => {
            format!("d:{}", value.as_datetime().map(|d| d.to_string()).unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_keeps_integers_exact() {
        assert_eq!(arithmetic(BinOp::Add, &Value::Int(2), &Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(
            arithmetic(BinOp::Div, &Value::Int(3), &Value::Int(2)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            arithmetic(BinOp::Mul, &Value::Int(i64::MAX), &Value::Int(2)).unwrap(),
            Value::Float(i64::MAX as f64 * 2.0)
        );
    }

    #[test]
    fn test_arithmetic_null_and_text() {
        assert_eq!(arithmetic(BinOp::Sub, &Value::Null, &Value::Int(1)).unwrap(), Value::Null);
        assert_eq!(
            arithmetic(BinOp::Add, &Value::from("a"), &Value::from("b")).unwrap(),
            Value::from("ab")
        );
        assert!(arithmetic(BinOp::Mul, &Value::from("a"), &Value::Int(2)).is_err());
    }

    #[test]
    fn test_compare_semantics() {
        assert_eq!(compare(BinOp::Eq, &Value::Int(12), &Value::Float(12.0)).unwrap(), Value::Bool(true));
        assert_eq!(compare(BinOp::Eq, &Value::from("12"), &Value::Int(12)).unwrap(), Value::Bool(false));
        assert_eq!(compare(BinOp::NotEq, &Value::Null, &Value::Int(1)).unwrap(), Value::Bool(true));
        assert_eq!(compare(BinOp::Lt, &Value::Null, &Value::Int(1)).unwrap(), Value::Bool(false));
        assert!(compare(BinOp::Lt, &Value::from("a"), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_logical_requires_booleans() {
        assert_eq!(
            logical(BinOp::And, &Value::Bool(true), &Value::Null).unwrap(),
            Value::Bool(false)
        );
        assert!(logical(BinOp::Or, &Value::Int(1), &Value::Bool(true)).is_err());
    }

    #[test]
    fn test_distinct_key_merges_int_and_float() {
        assert_eq!(distinct_key(&Value::Int(3)), distinct_key(&Value::Float(3.0)));
        assert_ne!(distinct_key(&Value::Int(3)), distinct_key(&Value::from("3")));
    }
}
