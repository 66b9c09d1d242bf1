//! Allowed method calls on frames, series, accessors and groupbys.

use super::aggregate::{aggregate, AGGREGATIONS};
use super::ast::BinOp;
use super::eval::{column_position, GroupBy, Obj, Selection};
use super::ops::{self, distinct_key};
use super::value::Series;
use crate::dataset::{Column, Frame, Value};
use chrono::Datelike;
use regex::RegexBuilder;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// Arguments of one call, bound to parameter names pandas-style: a keyword
/// wins, otherwise the next positional argument is used.
pub(super) struct Args<'a> {
    method: String,
    positional: VecDeque<Obj<'a>>,
    keywords: Vec<(String, Obj<'a>)>,
}

impl<'a> Args<'a> {
    pub fn new(method: &str, positional: Vec<Obj<'a>>, keywords: Vec<(String, Obj<'a>)>) -> Self {
        Self {
            method: method.to_string(),
            positional: positional.into(),
            keywords,
        }
    }

    fn take(&mut self, name: &str) -> Option<Obj<'a>> {
        self.keyword(name).or_else(|| self.positional.pop_front())
    }

    fn keyword(&mut self, name: &str) -> Option<Obj<'a>> {
        let pos = self.keywords.iter().position(|(k, _)| k == name)?;
        Some(self.keywords.remove(pos).1)
    }

    fn require(&mut self, name: &str) -> Result<Obj<'a>, String> {
        self.take(name)
            .ok_or_else(|| format!("{}() missing required argument '{name}'", self.method))
    }

    fn int_or(&mut self, name: &str, default: i64) -> Result<i64, String> {
        self.take(name)
            .map(|obj| int_arg(obj, name))
            .transpose()
            .map(|v| v.unwrap_or(default))
    }

    fn bool_or(&mut self, name: &str, default: bool) -> Result<bool, String> {
        self.take(name)
            .map(|obj| bool_arg(obj, name))
            .transpose()
            .map(|v| v.unwrap_or(default))
    }

    /// Errors on anything left unconsumed.
    fn finish(self) -> Result<(), String> {
        if let Some((name, _)) = self.keywords.first() {
            return Err(format!(
                "{}() got an unexpected keyword argument '{name}'",
                self.method
            ));
        }
        if !self.positional.is_empty() {
            return Err(format!("{}() got too many positional arguments", self.method));
        }
        Ok(())
    }
}

fn int_arg(obj: Obj<'_>, what: &str) -> Result<i64, String> {
    match obj {
        Obj::Scalar(Value::Int(i)) => Ok(i),
        Obj::Scalar(Value::Float(f)) if f.fract() == 0.0 => Ok(f as i64),
        other => Err(format!("{what} must be an integer, not a {}", other.kind())),
    }
}

fn bool_arg(obj: Obj<'_>, what: &str) -> Result<bool, String> {
    match obj {
        Obj::Scalar(Value::Bool(b)) => Ok(b),
        other => Err(format!("{what} must be True or False, not a {}", other.kind())),
    }
}

fn text_arg(obj: Obj<'_>, what: &str) -> Result<String, String> {
    match obj {
        Obj::Scalar(Value::Text(s)) => Ok(s),
        other => Err(format!("{what} must be a string, not a {}", other.kind())),
    }
}

fn value_arg(obj: Obj<'_>, what: &str) -> Result<Value, String> {
    match obj {
        Obj::Scalar(value) => Ok(value),
        other => Err(format!("{what} must be a single value, not a {}", other.kind())),
    }
}

fn names_arg(obj: Obj<'_>, what: &str) -> Result<Vec<String>, String> {
    match obj {
        Obj::Scalar(Value::Text(name)) => Ok(vec![name]),
        Obj::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Text(name) => Ok(name),
                other => Err(format!(
                    "{what} must name columns, got {}",
                    other.to_display_string()
                )),
            })
            .collect(),
        other => Err(format!("{what} must be a column name or list, not a {}", other.kind())),
    }
}

fn values_arg(obj: Obj<'_>, what: &str) -> Result<Vec<Value>, String> {
    match obj {
        Obj::List(values) | Obj::Tuple(values) => Ok(values),
        Obj::Series(series) => Ok(series.values),
        other => Err(format!("{what} must be list-like, not a {}", other.kind())),
    }
}

/// Invokes `method` on `target`.
pub(super) fn call<'a>(target: Obj<'a>, method: &str, mut args: Args<'a>) -> Result<Obj<'a>, String> {
    let result = match target {
        Obj::Frame(frame) => frame_method(frame, method, &mut args)?,
        Obj::Series(series) => series_method(series, method, &mut args)?,
        Obj::Str(series) => Obj::Series(str_method(&series, method, &mut args)?),
        Obj::Pandas => pandas_function(method, &mut args)?,
        Obj::GroupBy(group) => groupby_method(group, method, &mut args)?,
        Obj::Scalar(value) if method == "round" => {
            let decimals = args.int_or("decimals", 0)?;
            Obj::Scalar(round_value(&value, decimals)?)
        }
        other => return Err(format!("'{}' object has no method '{method}'", other.kind())),
    };
    args.finish()?;
    Ok(result)
}

// ---------------------------------------------------------------------------
// DataFrame
// ---------------------------------------------------------------------------

fn frame_method<'a>(frame: Cow<'a, Frame>, method: &str, args: &mut Args<'a>) -> Result<Obj<'a>, String> {
    let owned = |frame: Frame| Obj::Frame(Cow::Owned(frame));

    match method {
        "head" | "tail" => {
            let n = args.int_or("n", 5)?;
            let rows = head_tail_positions(frame.row_count(), n, method == "head");
            Ok(owned(frame.take_rows(&rows)))
        }
        "sort_values" => {
            let by = names_arg(args.require("by")?, "by")?;
            let ascending = ascending_arg(args.take("ascending"), by.len())?;
            let keys = key_columns(&frame, &by)?;
            let order = sorted_positions(&keys, &ascending, frame.row_count());
            Ok(owned(frame.take_rows(&order)))
        }
        "nlargest" | "nsmallest" => {
            let n = int_arg(args.require("n")?, "n")?;
            let columns = names_arg(args.require("columns")?, "columns")?;
            let keys = key_columns(&frame, &columns)?;
            for (name, values) in columns.iter().zip(&keys) {
                require_orderable(values, name, method)?;
            }
            let ascending = vec![method == "nsmallest"; keys.len()];
            let order = top_positions(&keys, &ascending, frame.row_count(), n);
            Ok(owned(frame.take_rows(&order)))
        }
        "groupby" => {
            let by = names_arg(args.require("by")?, "by")?;
            let [key] = <[String; 1]>::try_from(by)
                .map_err(|_| "grouping by more than one column is not supported".to_string())?;
            column_position(&frame, &key)?;
            Ok(Obj::GroupBy(GroupBy {
                frame,
                key,
                selection: Selection::All,
            }))
        }
        "count" => {
            let labels = frame.column_names().into_iter().map(Value::from).collect();
            let counts = frame
                .columns()
                .iter()
                .map(|c| Value::Int(c.values.iter().filter(|v| !v.is_null()).count() as i64))
                .collect();
            Ok(Obj::Series(
                Series::new("count", counts).with_index(Column::new("column", labels)),
            ))
        }
        other => Err(format!("DataFrame has no method '{other}'")),
    }
}

fn key_columns<'f>(frame: &'f Frame, names: &[String]) -> Result<Vec<&'f [Value]>, String> {
    names
        .iter()
        .map(|name| {
            let pos = column_position(frame, name)?;
            Ok(frame.columns()[pos].values.as_slice())
        })
        .collect()
}

fn ascending_arg(obj: Option<Obj<'_>>, keys: usize) -> Result<Vec<bool>, String> {
    match obj {
        None => Ok(vec![true; keys]),
        Some(Obj::Scalar(Value::Bool(b))) => Ok(vec![b; keys]),
        Some(Obj::List(items)) if items.len() == keys => items
            .into_iter()
            .map(|item| match item {
                Value::Bool(b) => Ok(b),
                other => Err(format!(
                    "ascending must contain booleans, got {}",
                    other.to_display_string()
                )),
            })
            .collect(),
        Some(Obj::List(items)) => Err(format!(
            "ascending has {} entries but {keys} sort keys were given",
            items.len()
        )),
        Some(other) => Err(format!("ascending must be True or False, not a {}", other.kind())),
    }
}

fn head_tail_positions(len: usize, n: i64, head: bool) -> Vec<usize> {
    let count = if n >= 0 {
        (n as usize).min(len)
    } else {
        len.saturating_sub(n.unsigned_abs() as usize)
    };
    if head {
        (0..count).collect()
    } else {
        (len - count..len).collect()
    }
}

/// Nulls sort last in either direction.
fn directional_cmp(a: &Value, b: &Value, ascending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.partial_cmp_loose(b).unwrap_or(Ordering::Equal);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
    }
}

/// Stable multi-key sort order.
fn sorted_positions(keys: &[&[Value]], ascending: &[bool], len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| {
        keys.iter()
            .zip(ascending)
            .map(|(values, &asc)| directional_cmp(&values[a], &values[b], asc))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// First `n` positions in sort order, skipping rows whose leading key is null.
fn top_positions(keys: &[&[Value]], ascending: &[bool], len: usize, n: i64) -> Vec<usize> {
    let mut order = sorted_positions(keys, ascending, len);
    order.retain(|&i| keys.first().map_or(true, |k| !k[i].is_null()));
    order.truncate(n.max(0) as usize);
    order
}

fn require_orderable(values: &[Value], column: &str, method: &str) -> Result<(), String> {
    match values.iter().find(|v| !v.is_null() && v.as_f64().is_none() && v.as_datetime().is_none()) {
        Some(bad) => Err(format!(
            "column '{column}' holds '{}' values, cannot use {method}",
            ops::type_label(bad)
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

fn series_method<'a>(series: Series, method: &str, args: &mut Args<'a>) -> Result<Obj<'a>, String> {
    if AGGREGATIONS.contains(&method) {
        return aggregate(method, &series.values, &series.name).map(Obj::Scalar);
    }

    match method {
        "unique" => Ok(Obj::List(unique_values(&series.values))),
        "tolist" => Ok(Obj::List(series.values)),
        "value_counts" => {
            let ascending = args.bool_or("ascending", false)?;
            Ok(Obj::Series(value_counts(&series, ascending)))
        }
        "isin" => {
            let candidates = values_arg(args.require("values")?, "values")?;
            let values = series
                .values
                .iter()
                .map(|v| Value::Bool(candidates.iter().any(|c| ops::values_equal(v, c))))
                .collect();
            Ok(Obj::Series(series.map_values(values)))
        }
        "between" => {
            let left = value_arg(args.require("left")?, "left")?;
            let right = value_arg(args.require("right")?, "right")?;
            let inclusive = match args.take("inclusive") {
                Some(obj) => text_arg(obj, "inclusive")?,
                None => "both".to_string(),
            };
            let (low_op, high_op) = match inclusive.as_str() {
                "both" => (BinOp::GtEq, BinOp::LtEq),
                "neither" => (BinOp::Gt, BinOp::Lt),
                "left" => (BinOp::GtEq, BinOp::Lt),
                "right" => (BinOp::Gt, BinOp::LtEq),
                other => {
                    return Err(format!(
                        "inclusive must be 'both', 'neither', 'left' or 'right', got '{other}'"
                    ))
                }
            };
            let values = series
                .values
                .iter()
                .map(|v| {
                    let low = ops::compare(low_op, v, &left)?;
                    let high = ops::compare(high_op, v, &right)?;
                    ops::logical(BinOp::And, &low, &high)
                })
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(series.map_values(values)))
        }
        "isna" | "notna" => {
            let want_null = method == "isna";
            let values = series
                .values
                .iter()
                .map(|v| Value::Bool(v.is_null() == want_null))
                .collect();
            Ok(Obj::Series(series.map_values(values)))
        }
        "abs" => {
            let values = series
                .values
                .iter()
                .map(abs_value)
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(series.map_values(values)))
        }
        "round" => {
            let decimals = args.int_or("decimals", 0)?;
            let values = series
                .values
                .iter()
                .map(|v| round_value(v, decimals))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(series.map_values(values)))
        }
        "head" | "tail" => {
            let n = args.int_or("n", 5)?;
            let rows = head_tail_positions(series.len(), n, method == "head");
            Ok(Obj::Series(series.take(&rows)))
        }
        "sort_values" => {
            let ascending = args.bool_or("ascending", true)?;
            let order = sorted_positions(&[&series.values], &[ascending], series.len());
            Ok(Obj::Series(series.take(&order)))
        }
        "nlargest" | "nsmallest" => {
            let n = args.int_or("n", 5)?;
            require_orderable(&series.values, &series.name, method)?;
            let order = top_positions(
                &[&series.values],
                &[method == "nsmallest"],
                series.len(),
                n,
            );
            Ok(Obj::Series(series.take(&order)))
        }
        other => Err(format!("Series has no method '{other}'")),
    }
}

/// Distinct values in order of first appearance.
fn unique_values(values: &[Value]) -> Vec<Value> {
    let mut seen = HashMap::new();
    let mut unique = Vec::new();
    for value in values {
        if seen.insert(distinct_key(value), ()).is_none() {
            unique.push(value.clone());
        }
    }
    unique
}

/// Counts per distinct non-null value, most frequent first.
fn value_counts(series: &Series, ascending: bool) -> Series {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<Value> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();

    for value in series.values.iter().filter(|v| !v.is_null()) {
        let slot = *slots.entry(distinct_key(value)).or_insert_with(|| {
            labels.push(value.clone());
            counts.push(0);
            labels.len() - 1
        });
        counts[slot] += 1;
    }

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        if ascending {
            counts[a].cmp(&counts[b])
        } else {
            counts[b].cmp(&counts[a])
        }
    });

    Series::new("count", order.iter().map(|&i| Value::Int(counts[i])).collect()).with_index(
        Column::new(
            series.name.clone(),
            order.iter().map(|&i| labels[i].clone()).collect(),
        ),
    )
}

fn abs_value(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(i) => Ok(i.checked_abs().map_or(Value::Float((*i as f64).abs()), Value::Int)),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(format!("bad operand type for abs(): '{}'", ops::type_label(other))),
    }
}

/// Half-to-even rounding to `decimals` places.
fn round_value(value: &Value, decimals: i64) -> Result<Value, String> {
    let factor = 10f64.powi(decimals.clamp(-15, 15) as i32);
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(i) if decimals >= 0 => Ok(Value::Int(*i)),
        Value::Int(i) => Ok(Value::Int(((*i as f64 * factor).round_ties_even() / factor) as i64)),
        Value::Float(f) => Ok(Value::Float((f * factor).round_ties_even() / factor)),
        other => Err(format!("cannot round '{}' values", ops::type_label(other))),
    }
}

// ---------------------------------------------------------------------------
// .str and .dt accessors
// ---------------------------------------------------------------------------

enum Matcher {
    Regex(regex::Regex),
    Literal { needle: String, case: bool },
}

impl Matcher {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(haystack),
            Matcher::Literal { needle, case: true } => haystack.contains(needle.as_str()),
            Matcher::Literal { needle, case: false } => {
                haystack.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

fn str_method(series: &Series, method: &str, args: &mut Args<'_>) -> Result<Series, String> {
    let values: Vec<Value> = match method {
        "contains" => {
            let pat = text_arg(args.require("pat")?, "pat")?;
            let case = args.bool_or("case", true)?;
            if args.int_or("flags", 0)? != 0 {
                return Err("flags are not supported; use case=False".to_string());
            }
            let na = args.take("na").map(|o| value_arg(o, "na")).transpose()?;
            let regex = args.bool_or("regex", true)?;

            let matcher = if regex {
                let re = RegexBuilder::new(&pat)
                    .case_insensitive(!case)
                    .build()
                    .map_err(|e| format!("invalid regular expression '{pat}': {e}"))?;
                Matcher::Regex(re)
            } else if case {
                Matcher::Literal { needle: pat, case }
            } else {
                Matcher::Literal {
                    needle: pat.to_lowercase(),
                    case,
                }
            };
            let na = na.unwrap_or(Value::Null);
            series
                .values
                .iter()
                .map(|v| match v {
                    Value::Text(s) => Value::Bool(matcher.is_match(s)),
                    _ => na.clone(),
                })
                .collect()
        }
        "startswith" | "endswith" => {
            let pat = text_arg(args.require("pat")?, "pat")?;
            let na = args.take("na").map(|o| value_arg(o, "na")).transpose()?;
            let case = match args.keyword("case") {
                Some(obj) => bool_arg(obj, "case")?,
                None => true,
            };
            let na = na.unwrap_or(Value::Null);
            let pat = if case { pat } else { pat.to_lowercase() };
            series
                .values
                .iter()
                .map(|v| match v {
                    Value::Text(s) => {
                        let s = if case { s.clone() } else { s.to_lowercase() };
                        Value::Bool(if method == "startswith" {
                            s.starts_with(&pat)
                        } else {
                            s.ends_with(&pat)
                        })
                    }
                    _ => na.clone(),
                })
                .collect()
        }
        "lower" | "upper" | "strip" => series
            .values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Value::Text(match method {
                    "lower" => s.to_lowercase(),
                    "upper" => s.to_uppercase(),
                    _ => s.trim().to_string(),
                }),
                _ => Value::Null,
            })
            .collect(),
        "len" => series
            .values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Value::Int(s.chars().count() as i64),
                _ => Value::Null,
            })
            .collect(),
        other => return Err(format!("str accessor has no method '{other}'")),
    };
    Ok(series.map_values(values))
}

/// One calendar component of a temporal value (text dates are parsed).
pub(super) fn date_part(value: &Value, part: &str) -> Result<Value, String> {
    let datetime = match value {
        Value::Null => return Ok(Value::Null),
        Value::Text(s) => Value::parse_temporal(s).and_then(|v| v.as_datetime()),
        other => other.as_datetime(),
    }
    .ok_or_else(|| {
        format!(
            "can only use .dt with date values, got {}",
            value.to_display_string()
        )
    })?;

    let n = match part {
        "year" => i64::from(datetime.year()),
        "month" => i64::from(datetime.month()),
        "day" => i64::from(datetime.day()),
        "quarter" => i64::from((datetime.month() - 1) / 3 + 1),
        "dayofweek" => i64::from(datetime.weekday().num_days_from_monday()),
        other => return Err(format!("dt accessor has no attribute '{other}'")),
    };
    Ok(Value::Int(n))
}

pub(super) fn date_part_series(series: &Series, part: &str) -> Result<Series, String> {
    let values = series
        .values
        .iter()
        .map(|v| date_part(v, part))
        .collect::<Result<Vec<_>, String>>()?;
    Ok(series.map_values(values))
}

// ---------------------------------------------------------------------------
// pd functions
// ---------------------------------------------------------------------------

fn pandas_function<'a>(name: &str, args: &mut Args<'a>) -> Result<Obj<'a>, String> {
    match name {
        "isna" | "notna" => {
            let want_null = name == "isna";
            match args.require("obj")? {
                Obj::Scalar(value) => Ok(Obj::Scalar(Value::Bool(value.is_null() == want_null))),
                Obj::Series(series) => {
                    let values = series
                        .values
                        .iter()
                        .map(|v| Value::Bool(v.is_null() == want_null))
                        .collect();
                    Ok(Obj::Series(series.map_values(values)))
                }
                other => Err(format!("pd.{name} does not accept a {}", other.kind())),
            }
        }
        "to_numeric" | "to_datetime" => {
            let arg = args.require("arg")?;
            let errors = match args.take("errors") {
                Some(obj) => text_arg(obj, "errors")?,
                None => "raise".to_string(),
            };
            if !matches!(errors.as_str(), "raise" | "coerce" | "ignore") {
                return Err(format!(
                    "errors must be 'raise', 'coerce' or 'ignore', got '{errors}'"
                ));
            }
            let parse: fn(&Value) -> Option<Value> = if name == "to_numeric" {
                to_numeric
            } else {
                to_datetime
            };
            let convert = |value: &Value| match parse(value) {
                Some(converted) => Ok(converted),
                None => match errors.as_str() {
                    "coerce" => Ok(Value::Null),
                    "ignore" => Ok(value.clone()),
                    _ => Err(format!(
                        "pd.{name} could not parse '{}'",
                        value.to_display_string()
                    )),
                },
            };
            match arg {
                Obj::Scalar(value) => convert(&value).map(Obj::Scalar),
                Obj::Series(series) => {
                    let values = series
                        .values
                        .iter()
                        .map(convert)
                        .collect::<Result<Vec<_>, String>>()?;
                    Ok(Obj::Series(series.map_values(values)))
                }
                Obj::List(values) => values
                    .iter()
                    .map(convert)
                    .collect::<Result<Vec<_>, String>>()
                    .map(Obj::List),
                other => Err(format!("pd.{name} does not accept a {}", other.kind())),
            }
        }
        other => Err(format!("pd.{other} is not available")),
    }
}

fn to_numeric(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Int(_) | Value::Float(_) => Some(value.clone()),
        Value::Bool(b) => Some(Value::Int(i64::from(*b))),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(Value::Null);
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Some(Value::Int(i));
            }
            trimmed.parse::<f64>().ok().map(Value::Float)
        }
        Value::Date(_) | Value::DateTime(_) => None,
    }
}

fn to_datetime(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Date(_) | Value::DateTime(_) => Some(value.clone()),
        Value::Text(s) if s.trim().is_empty() => Some(Value::Null),
        Value::Text(s) => Value::parse_temporal(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// groupby
// ---------------------------------------------------------------------------

/// Group keys (sorted, nulls dropped) with the row positions of each group.
fn build_groups(keys: &[Value]) -> Vec<(Value, Vec<usize>)> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
    for (row, key) in keys.iter().enumerate().filter(|(_, k)| !k.is_null()) {
        let slot = *slots.entry(distinct_key(key)).or_insert_with(|| {
            groups.push((key.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }
    groups.sort_by(|a, b| a.0.sort_cmp(&b.0));
    groups
}

fn aggregate_groups(
    func: &str,
    values: &[Value],
    groups: &[(Value, Vec<usize>)],
    column: &str,
) -> Result<Vec<Value>, String> {
    groups
        .iter()
        .map(|(_, rows)| {
            let picked: Vec<Value> = rows.iter().map(|&r| values[r].clone()).collect();
            aggregate(func, &picked, column)
        })
        .collect()
}

fn groupby_method<'a>(group: GroupBy<'a>, method: &str, args: &mut Args<'a>) -> Result<Obj<'a>, String> {
    // Accepted for compatibility; non-numeric columns are skipped when no
    // columns were selected.
    if let Some(obj) = args.keyword("numeric_only") {
        bool_arg(obj, "numeric_only")?;
    }

    let frame = group.frame.as_ref();
    let key_pos = column_position(frame, &group.key)?;
    let groups = build_groups(&frame.columns()[key_pos].values);
    let keys = Column::new(
        group.key.clone(),
        groups.iter().map(|(k, _)| k.clone()).collect(),
    );

    if method == "size" {
        let sizes = groups
            .iter()
            .map(|(_, rows)| Value::Int(rows.len() as i64))
            .collect();
        return Ok(Obj::Series(Series::new("size", sizes).with_index(keys)));
    }
    if !AGGREGATIONS.contains(&method) {
        return Err(format!("DataFrameGroupBy has no method '{method}'"));
    }

    match &group.selection {
        Selection::One(name) => {
            let pos = column_position(frame, name)?;
            let values = aggregate_groups(method, &frame.columns()[pos].values, &groups, name)?;
            Ok(Obj::Series(Series::new(name.clone(), values).with_index(keys)))
        }
        Selection::Many(names) => {
            let mut columns = vec![keys];
            for name in names {
                let pos = column_position(frame, name)?;
                let values = aggregate_groups(method, &frame.columns()[pos].values, &groups, name)?;
                columns.push(Column::new(name.clone(), values));
            }
            Frame::new(columns).map(|f| Obj::Frame(Cow::Owned(f)))
        }
        Selection::All => {
            let mut columns = vec![keys];
            for (pos, column) in frame.columns().iter().enumerate() {
                if pos == key_pos {
                    continue;
                }
                if let Ok(values) = aggregate_groups(method, &column.values, &groups, &column.name) {
                    columns.push(Column::new(column.name.clone(), values));
                }
            }
            Frame::new(columns).map(|f| Obj::Frame(Cow::Owned(f)))
        }
    }
}
