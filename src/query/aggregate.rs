//! Column aggregations (`sum`, `mean`, ...), shared by series and groupby.

use super::ops::{distinct_key, type_label};
use crate::dataset::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Aggregation names callable on a series or a groupby.
pub const AGGREGATIONS: &[&str] = &[
    "sum", "mean", "median", "min", "max", "count", "nunique", "std",
];

/// Applies the named aggregation to `values`, skipping nulls.
pub fn aggregate(func: &str, values: &[Value], column: &str) -> Result<Value, String> {
    match func {
        "count" => Ok(Value::Int(values.iter().filter(|v| !v.is_null()).count() as i64)),
        "nunique" => {
            let distinct: HashSet<String> = values
                .iter()
                .filter(|v| !v.is_null())
                .map(distinct_key)
                .collect();
            Ok(Value::Int(distinct.len() as i64))
        }
        "sum" => sum(values, column),
        "mean" => {
            let nums = numeric_values(values, func, column)?;
            Ok(mean(&nums).map_or(Value::Null, Value::Float))
        }
        "median" => {
            let mut nums = numeric_values(values, func, column)?;
            Ok(median(&mut nums).map_or(Value::Null, Value::Float))
        }
        "std" => {
            let nums = numeric_values(values, func, column)?;
            Ok(sample_std(&nums).map_or(Value::Null, Value::Float))
        }
        "min" => extreme(values, Ordering::Less),
        "max" => extreme(values, Ordering::Greater),
        other => Err(format!("unknown aggregation '{other}'")),
    }
}

fn numeric_values(values: &[Value], func: &str, column: &str) -> Result<Vec<f64>, String> {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::Bool(b) => Ok(f64::from(u8::from(*b))),
            other => other.as_f64().ok_or_else(|| {
                format!(
                    "cannot compute {func} of column '{column}': found '{}' value",
                    type_label(other)
                )
            }),
        })
        .collect()
}

fn sum(values: &[Value], column: &str) -> Result<Value, String> {
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;
    let mut any_float = false;

    for value in values.iter().filter(|v| !v.is_null()) {
        let (as_int, as_float) = match value {
            Value::Int(i) => (Some(*i), *i as f64),
            Value::Bool(b) => (Some(i64::from(*b)), f64::from(u8::from(*b))),
            Value::Float(f) => {
                any_float = true;
                (None, *f)
            }
            other => {
                return Err(format!(
                    "cannot compute sum of column '{column}': found '{}' value",
                    type_label(other)
                ))
            }
        };
        int_total = match (int_total, as_int) {
            (Some(total), Some(i)) => total.checked_add(i),
            _ => None,
        };
        float_total += as_float;
    }

    Ok(match int_total {
        Some(total) if !any_float => Value::Int(total),
        _ => Value::Float(float_total),
    })
}

fn mean(nums: &[f64]) -> Option<f64> {
    (!nums.is_empty()).then(|| nums.iter().sum::<f64>() / nums.len() as f64)
}

fn median(nums: &mut [f64]) -> Option<f64> {
    if nums.is_empty() {
        return None;
    }
    nums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = nums.len() / 2;
    Some(if nums.len() % 2 == 0 {
        (nums[mid - 1] + nums[mid]) / 2.0
    } else {
        nums[mid]
    })
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(nums: &[f64]) -> Option<f64> {
    if nums.len() < 2 {
        return None;
    }
    let m = mean(nums)?;
    let variance = nums.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (nums.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Smallest (`Less`) or largest (`Greater`) non-null value.
fn extreme(values: &[Value], want: Ordering) -> Result<Value, String> {
    let mut best: Option<&Value> = None;
    for value in values.iter().filter(|v| !v.is_null()) {
        best = match best {
            None => Some(value),
            Some(current) => {
                let ordering = value.partial_cmp_loose(current).ok_or_else(|| {
                    format!(
                        "'<' not supported between '{}' and '{}' values",
                        type_label(value),
                        type_label(current)
                    )
                })?;
                if ordering == want {
                    Some(value)
                } else {
                    Some(current)
                }
            }
        };
    }
    Ok(best.cloned().unwrap_or(Value::Null))
}
