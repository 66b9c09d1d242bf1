//! Tree-walking evaluator over a read-only frame.
//!
//! Only the names `df` (the loaded frame) and `pd` (a small set of pandas
//! functions) resolve. Attribute access and method calls go through fixed
//! allow-lists, so nothing outside the frame is reachable.

use super::aggregate::AGGREGATIONS;
use super::ast::{BinOp, Expr, UnaryOp};
use super::methods::{self, Args};
use super::ops;
use super::value::{format_list, QueryValue, Series};
use crate::dataset::{Column, Frame, Value};
use std::borrow::Cow;

const FRAME_METHODS: &[&str] = &[
    "head",
    "tail",
    "sort_values",
    "nlargest",
    "nsmallest",
    "groupby",
    "count",
];

const SERIES_METHODS: &[&str] = &[
    "sum",
    "mean",
    "median",
    "min",
    "max",
    "count",
    "nunique",
    "std",
    "unique",
    "value_counts",
    "isin",
    "between",
    "isna",
    "notna",
    "abs",
    "round",
    "head",
    "tail",
    "sort_values",
    "nlargest",
    "nsmallest",
    "tolist",
];

const STR_METHODS: &[&str] = &[
    "contains",
    "startswith",
    "endswith",
    "lower",
    "upper",
    "strip",
    "len",
];

const PANDAS_FUNCTIONS: &[&str] = &["to_numeric", "to_datetime", "isna", "notna"];

const DATE_PARTS: &[&str] = &["year", "month", "day", "quarter", "dayofweek"];

/// Columns picked out of a groupby with `[...]`.
#[derive(Debug, Clone)]
pub(super) enum Selection {
    All,
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone)]
pub(super) struct GroupBy<'a> {
    pub frame: Cow<'a, Frame>,
    pub key: String,
    pub selection: Selection,
}

/// Intermediate evaluation result.
#[derive(Debug, Clone)]
pub(super) enum Obj<'a> {
    Frame(Cow<'a, Frame>),
    Series(Series),
    Scalar(Value),
    List(Vec<Value>),
    /// Fixed-size tuple such as `shape`.
    Tuple(Vec<Value>),
    /// The `pd` namespace.
    Pandas,
    /// An allowed method looked up but not yet called.
    Method { target: Box<Obj<'a>>, name: String },
    Str(Series),
    Dt(Series),
    ILoc(Box<Obj<'a>>),
    Loc(Cow<'a, Frame>),
    GroupBy(GroupBy<'a>),
}

impl<'a> Obj<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Obj::Frame(_) => "DataFrame",
            Obj::Series(_) => "Series",
            Obj::Scalar(_) => "scalar",
            Obj::List(_) => "list",
            Obj::Tuple(_) => "tuple",
            Obj::Pandas => "module",
            Obj::Method { .. } => "method",
            Obj::Str(_) => "str accessor",
            Obj::Dt(_) => "dt accessor",
            Obj::ILoc(_) => "iloc indexer",
            Obj::Loc(_) => "loc indexer",
            Obj::GroupBy(_) => "DataFrameGroupBy",
        }
    }

    fn into_query_value(self) -> Result<QueryValue, String> {
        match self {
            Obj::Frame(frame) => Ok(QueryValue::Table(frame.into_owned())),
            Obj::Series(series) => Ok(QueryValue::Series(series)),
            Obj::Scalar(Value::Null) => Ok(QueryValue::None),
            Obj::Scalar(value) => Ok(QueryValue::Scalar(value)),
            Obj::List(values) => Ok(QueryValue::List(values)),
            Obj::Tuple(values) => {
                let text = if values.len() == 1 {
                    format_list(&values, "(", ",)")
                } else {
                    format_list(&values, "(", ")")
                };
                Ok(QueryValue::Scalar(Value::Text(text)))
            }
            Obj::Method { name, .. } => Err(format!(
                "method '{name}' was referenced but never called; add parentheses"
            )),
            other => Err(format!(
                "expression produced a {} instead of a result",
                other.kind()
            )),
        }
    }
}

/// Evaluates parsed expressions against one frame.
pub struct Evaluator<'a> {
    frame: &'a Frame,
}

impl<'a> Evaluator<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<QueryValue, String> {
        self.eval(expr)?.into_query_value()
    }

    fn eval(&self, expr: &Expr) -> Result<Obj<'a>, String> {
        match expr {
            Expr::Literal(value) => Ok(Obj::Scalar(value.clone())),
            Expr::Name(name) => self.name(name),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| match self.eval(item)? {
                        Obj::Scalar(value) => Ok(value),
                        other => Err(format!(
                            "list elements must be plain values, not a {}",
                            other.kind()
                        )),
                    })
                    .collect::<Result<Vec<_>, String>>()?;
                Ok(Obj::List(values))
            }
            Expr::Tuple(_) | Expr::Slice { .. } => {
                Err("slices and tuples are only valid inside []".to_string())
            }
            Expr::Attribute { value, attr } => {
                if attr.starts_with('_') {
                    return Err(format!("access to attribute '{attr}' is not allowed"));
                }
                let target = self.eval(value)?;
                attribute(target, attr)
            }
            Expr::Subscript { value, index } => {
                let target = self.eval(value)?;
                self.subscript(target, index)
            }
            Expr::Call { func, args, kwargs } => self.call(func, args, kwargs),
            Expr::Unary { op, operand } => unary(*op, self.eval(operand)?),
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, left, right)
            }
        }
    }

    fn name(&self, name: &str) -> Result<Obj<'a>, String> {
        match name {
            "df" => Ok(Obj::Frame(Cow::Borrowed(self.frame))),
            "pd" => Ok(Obj::Pandas),
            other => Err(format!(
                "name '{other}' is not allowed; only df and pd are available"
            )),
        }
    }

    fn call(
        &self,
        func: &Expr,
        args: &[Expr],
        kwargs: &[(String, Expr)],
    ) -> Result<Obj<'a>, String> {
        if kwargs.iter().any(|(name, _)| name == "inplace") {
            return Err("in-place modification is not allowed; queries are read-only".to_string());
        }

        let (target, method) = match self.eval(func)? {
            Obj::Method { target, name } => (*target, name),
            other => return Err(format!("'{}' object is not callable", other.kind())),
        };

        let positional = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, String>>()?;
        let keywords = kwargs
            .iter()
            .map(|(name, expr)| Ok((name.clone(), self.eval(expr)?)))
            .collect::<Result<Vec<_>, String>>()?;

        methods::call(target, &method, Args::new(&method, positional, keywords))
    }

    fn subscript(&self, target: Obj<'a>, index: &Expr) -> Result<Obj<'a>, String> {
        match target {
            Obj::Frame(frame) => self.frame_subscript(frame, index),
            Obj::Series(series) => self.series_subscript(series, index),
            Obj::ILoc(inner) => self.iloc(*inner, index),
            Obj::Loc(frame) => self.loc(frame, index),
            Obj::GroupBy(group) => select_group_columns(group, self.eval(index)?),
            Obj::Tuple(values) | Obj::List(values) => match self.eval(index)? {
                Obj::Scalar(Value::Int(i)) => {
                    let pos = normalize_position(i, values.len())?;
                    Ok(Obj::Scalar(values[pos].clone()))
                }
                other => Err(format!("indices must be integers, not {}", other.kind())),
            },
            other => Err(format!("'{}' object is not subscriptable", other.kind())),
        }
    }

    fn frame_subscript(&self, frame: Cow<'a, Frame>, index: &Expr) -> Result<Obj<'a>, String> {
        if let Expr::Slice { start, stop } = index {
            let rows = self.slice_positions(start, stop, frame.row_count())?;
            return Ok(owned(frame.take_rows(&rows)));
        }

        match self.eval(index)? {
            Obj::Scalar(Value::Text(name)) => column_series(&frame, &name).map(Obj::Series),
            Obj::List(names) => {
                let indices = names
                    .iter()
                    .map(|name| match name {
                        Value::Text(name) => column_position(&frame, name),
                        other => Err(format!(
                            "column names must be text, got {}",
                            other.to_display_string()
                        )),
                    })
                    .collect::<Result<Vec<_>, String>>()?;
                project(&frame, &indices, None).map(owned)
            }
            Obj::Series(mask) => {
                let rows = mask_rows(&mask, frame.row_count())?;
                Ok(owned(frame.take_rows(&rows)))
            }
            Obj::Scalar(other) => Err(format!(
                "column key must be text, got {}",
                other.to_display_string()
            )),
            other => Err(format!("cannot index a DataFrame with a {}", other.kind())),
        }
    }

    fn series_subscript(&self, series: Series, index: &Expr) -> Result<Obj<'a>, String> {
        if let Expr::Slice { start, stop } = index {
            let rows = self.slice_positions(start, stop, series.len())?;
            return Ok(Obj::Series(series.take(&rows)));
        }

        match self.eval(index)? {
            Obj::Series(mask) => {
                let rows = mask_rows(&mask, series.len())?;
                Ok(Obj::Series(series.take(&rows)))
            }
            Obj::Scalar(key) => {
                if let Some(labels) = &series.index {
                    if let Some(pos) = labels.values.iter().position(|l| ops::values_equal(l, &key)) {
                        return Ok(Obj::Scalar(series.values[pos].clone()));
                    }
                }
                match key {
                    Value::Int(i) if series.index.is_none() => {
                        let pos = normalize_position(i, series.len())?;
                        Ok(Obj::Scalar(series.values[pos].clone()))
                    }
                    other => Err(format!(
                        "key {} not found in series '{}'",
                        other.to_display_string(),
                        series.name
                    )),
                }
            }
            other => Err(format!("cannot index a Series with a {}", other.kind())),
        }
    }

    fn iloc(&self, inner: Obj<'a>, index: &Expr) -> Result<Obj<'a>, String> {
        match inner {
            Obj::Frame(frame) => {
                let (row_expr, col_expr) = split_pair(index)?;
                let rows = self.positions(row_expr, frame.row_count())?;
                let cols = col_expr
                    .map(|expr| self.positions(expr, frame.column_count()))
                    .transpose()?;
                select(frame, rows, cols)
            }
            Obj::Series(series) => {
                if matches!(index, Expr::Tuple(_)) {
                    return Err("too many indexers for a Series".to_string());
                }
                match self.positions(index, series.len())? {
                    Positions::One(pos) => Ok(Obj::Scalar(series.values[pos].clone())),
                    Positions::Many(rows) => Ok(Obj::Series(series.take(&rows))),
                }
            }
            other => Err(format!("iloc is not available on a {}", other.kind())),
        }
    }

    fn loc(&self, frame: Cow<'a, Frame>, index: &Expr) -> Result<Obj<'a>, String> {
        let (row_expr, col_expr) = split_pair(index)?;

        let rows = match row_expr {
            Expr::Slice { start: None, stop: None } => {
                Positions::Many((0..frame.row_count()).collect())
            }
            Expr::Slice { .. } => {
                return Err("loc only supports ':' as a slice; use iloc for ranges".to_string())
            }
            expr => match self.eval(expr)? {
                Obj::Series(mask) => Positions::Many(mask_rows(&mask, frame.row_count())?),
                Obj::Scalar(Value::Int(i)) if i >= 0 && (i as usize) < frame.row_count() => {
                    Positions::One(i as usize)
                }
                Obj::Scalar(key) => {
                    return Err(format!("row label {} not found", key.to_display_string()))
                }
                other => return Err(format!("cannot select rows with a {}", other.kind())),
            },
        };

        let cols = match col_expr {
            None | Some(Expr::Slice { start: None, stop: None }) => None,
            Some(Expr::Slice { .. }) => {
                return Err("loc only supports ':' as a slice; use iloc for ranges".to_string())
            }
            Some(expr) => Some(match self.eval(expr)? {
                Obj::Scalar(Value::Text(name)) => Positions::One(column_position(&frame, &name)?),
                Obj::List(names) => Positions::Many(
                    names
                        .iter()
                        .map(|name| column_position(&frame, &name.to_display_string()))
                        .collect::<Result<Vec<_>, String>>()?,
                ),
                other => return Err(format!("cannot select columns with a {}", other.kind())),
            }),
        };

        select(frame, rows, cols)
    }

    /// Resolves a positional indexer: an integer, a list of integers or a slice.
    fn positions(&self, expr: &Expr, len: usize) -> Result<Positions, String> {
        if let Expr::Slice { start, stop } = expr {
            return Ok(Positions::Many(self.slice_positions(start, stop, len)?));
        }
        match self.eval(expr)? {
            Obj::Scalar(Value::Int(i)) => Ok(Positions::One(normalize_position(i, len)?)),
            Obj::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Int(i) => normalize_position(*i, len),
                    other => Err(format!(
                        "positions must be integers, got {}",
                        other.to_display_string()
                    )),
                })
                .collect::<Result<Vec<_>, String>>()
                .map(Positions::Many),
            other => Err(format!("positions must be integers, not a {}", other.kind())),
        }
    }

    /// Python slice semantics: negative bounds count from the end, out of
    /// range bounds clamp.
    fn slice_positions(
        &self,
        start: &Option<Box<Expr>>,
        stop: &Option<Box<Expr>>,
        len: usize,
    ) -> Result<Vec<usize>, String> {
        let n = len as i64;
        let bound = |expr: &Option<Box<Expr>>, default: i64| -> Result<i64, String> {
            let Some(expr) = expr else {
                return Ok(default);
            };
            match self.eval(expr)? {
                Obj::Scalar(Value::Int(i)) => Ok(if i < 0 { (i + n).max(0) } else { i.min(n) }),
                Obj::Scalar(Value::Null) => Ok(default),
                other => Err(format!("slice bounds must be integers, not a {}", other.kind())),
            }
        };
        let start = bound(start, 0)?;
        let stop = bound(stop, n)?;
        Ok((start..stop.max(start)).map(|i| i as usize).collect())
    }
}

/// Row or column selection by position.
enum Positions {
    One(usize),
    Many(Vec<usize>),
}

fn owned<'a>(frame: Frame) -> Obj<'a> {
    Obj::Frame(Cow::Owned(frame))
}

fn split_pair(index: &Expr) -> Result<(&Expr, Option<&Expr>), String> {
    match index {
        Expr::Tuple(items) if items.len() == 2 => Ok((&items[0], Some(&items[1]))),
        Expr::Tuple(items) => Err(format!(
            "expected at most 2 indexers (rows, columns), got {}",
            items.len()
        )),
        other => Ok((other, None)),
    }
}

fn normalize_position(i: i64, len: usize) -> Result<usize, String> {
    let resolved = if i < 0 { i + len as i64 } else { i };
    if resolved < 0 || resolved >= len as i64 {
        return Err(format!("position {i} is out of bounds for length {len}"));
    }
    Ok(resolved as usize)
}

fn missing_column(frame: &Frame, name: &str) -> String {
    let available: Vec<String> = frame
        .column_names()
        .iter()
        .map(|n| format!("'{n}'"))
        .collect();
    format!(
        "column '{name}' not found; available columns: {}",
        available.join(", ")
    )
}

pub(super) fn column_position(frame: &Frame, name: &str) -> Result<usize, String> {
    frame
        .columns()
        .iter()
        .position(|c| c.name == name)
        .ok_or_else(|| missing_column(frame, name))
}

pub(super) fn column_series(frame: &Frame, name: &str) -> Result<Series, String> {
    frame
        .column(name)
        .map(|c| Series::new(c.name.clone(), c.values.clone()))
        .ok_or_else(|| missing_column(frame, name))
}

/// Builds a frame from column positions, optionally restricted to rows.
fn project(frame: &Frame, cols: &[usize], rows: Option<&[usize]>) -> Result<Frame, String> {
    let columns = cols
        .iter()
        .map(|&c| {
            let column = &frame.columns()[c];
            let values = match rows {
                Some(rows) => rows.iter().map(|&r| column.values[r].clone()).collect(),
                None => column.values.clone(),
            };
            Column::new(column.name.clone(), values)
        })
        .collect();
    let projected = Frame::new(columns)?;
    if projected.column_count() == 0 {
        return Ok(Frame::empty_with_rows(rows.map_or(frame.row_count(), <[usize]>::len)));
    }
    Ok(projected)
}

fn select<'a>(
    frame: Cow<'a, Frame>,
    rows: Positions,
    cols: Option<Positions>,
) -> Result<Obj<'a>, String> {
    let cols = cols.unwrap_or_else(|| Positions::Many((0..frame.column_count()).collect()));
    match (rows, cols) {
        (Positions::One(r), Positions::One(c)) => {
            Ok(Obj::Scalar(frame.columns()[c].values[r].clone()))
        }
        (Positions::One(r), Positions::Many(cs)) => {
            let labels = cs
                .iter()
                .map(|&c| Value::Text(frame.columns()[c].name.clone()))
                .collect();
            let values = cs
                .iter()
                .map(|&c| frame.columns()[c].values[r].clone())
                .collect();
            Ok(Obj::Series(
                Series::new(r.to_string(), values).with_index(Column::new("column", labels)),
            ))
        }
        (Positions::Many(rs), Positions::One(c)) => {
            let column = &frame.columns()[c];
            Ok(Obj::Series(
                Series::new(column.name.clone(), column.values.clone()).take(&rs),
            ))
        }
        (Positions::Many(rs), Positions::Many(cs)) => project(&frame, &cs, Some(&rs)).map(owned),
    }
}

/// Row positions selected by a boolean mask. Null counts as false.
pub(super) fn mask_rows(mask: &Series, len: usize) -> Result<Vec<usize>, String> {
    if mask.len() != len {
        return Err(format!(
            "boolean mask has {} values but the target has {len} rows",
            mask.len()
        ));
    }
    let mut rows = Vec::new();
    for (i, value) in mask.values.iter().enumerate() {
        match value {
            Value::Bool(true) => rows.push(i),
            Value::Bool(false) | Value::Null => {}
            other => {
                return Err(format!(
                    "cannot filter with non-boolean series '{}' (found {})",
                    mask.name,
                    other.to_display_string()
                ))
            }
        }
    }
    Ok(rows)
}

fn select_group_columns<'a>(group: GroupBy<'a>, key: Obj<'a>) -> Result<Obj<'a>, String> {
    if !matches!(group.selection, Selection::All) {
        return Err("groupby columns were already selected".to_string());
    }
    let selection = match key {
        Obj::Scalar(Value::Text(name)) => {
            column_position(&group.frame, &name)?;
            Selection::One(name)
        }
        Obj::List(names) => {
            let names = names
                .iter()
                .map(|n| {
                    let name = n.to_display_string();
                    column_position(&group.frame, &name).map(|_| name)
                })
                .collect::<Result<Vec<_>, String>>()?;
            Selection::Many(names)
        }
        other => return Err(format!("cannot select groupby columns with a {}", other.kind())),
    };
    Ok(Obj::GroupBy(GroupBy { selection, ..group }))
}

fn bind<'a>(target: Obj<'a>, name: &str) -> Result<Obj<'a>, String> {
    Ok(Obj::Method {
        target: Box::new(target),
        name: name.to_string(),
    })
}

fn attribute<'a>(target: Obj<'a>, attr: &str) -> Result<Obj<'a>, String> {
    match target {
        Obj::Frame(frame) => match attr {
            "shape" => Ok(Obj::Tuple(vec![
                Value::Int(frame.row_count() as i64),
                Value::Int(frame.column_count() as i64),
            ])),
            "empty" => Ok(Obj::Scalar(Value::Bool(frame.is_empty()))),
            "size" => Ok(Obj::Scalar(Value::Int(
                (frame.row_count() * frame.column_count()) as i64,
            ))),
            "columns" => Ok(Obj::List(
                frame.column_names().into_iter().map(Value::from).collect(),
            )),
            "iloc" => Ok(Obj::ILoc(Box::new(Obj::Frame(frame)))),
            "loc" => Ok(Obj::Loc(frame)),
            _ if FRAME_METHODS.contains(&attr) => bind(Obj::Frame(frame), attr),
            _ => match frame.column(attr) {
                Some(column) => Ok(Obj::Series(Series::new(
                    column.name.clone(),
                    column.values.clone(),
                ))),
                None => Err(format!("DataFrame has no attribute or column '{attr}'")),
            },
        },
        Obj::Series(series) => match attr {
            "str" => Ok(Obj::Str(series)),
            "dt" => Ok(Obj::Dt(series)),
            "shape" => Ok(Obj::Tuple(vec![Value::Int(series.len() as i64)])),
            "empty" => Ok(Obj::Scalar(Value::Bool(series.is_empty()))),
            "size" => Ok(Obj::Scalar(Value::Int(series.len() as i64))),
            "name" => Ok(Obj::Scalar(Value::Text(series.name))),
            "iloc" => Ok(Obj::ILoc(Box::new(Obj::Series(series)))),
            _ if SERIES_METHODS.contains(&attr) => bind(Obj::Series(series), attr),
            _ => Err(format!("Series has no attribute '{attr}'")),
        },
        Obj::Str(series) if STR_METHODS.contains(&attr) => bind(Obj::Str(series), attr),
        Obj::Dt(series) if DATE_PARTS.contains(&attr) => {
            methods::date_part_series(&series, attr).map(Obj::Series)
        }
        Obj::Pandas if PANDAS_FUNCTIONS.contains(&attr) => bind(Obj::Pandas, attr),
        Obj::Pandas => Err(format!(
            "pd.{attr} is not available; allowed: {}",
            PANDAS_FUNCTIONS.join(", ")
        )),
        Obj::GroupBy(group) if AGGREGATIONS.contains(&attr) || attr == "size" => {
            bind(Obj::GroupBy(group), attr)
        }
        Obj::Scalar(value) if attr == "round" => bind(Obj::Scalar(value), attr),
        Obj::Scalar(value) if DATE_PARTS.contains(&attr) && value.as_datetime().is_some() => {
            methods::date_part(&value, attr).map(Obj::Scalar)
        }
        other => Err(format!("'{}' object has no attribute '{attr}'", other.kind())),
    }
}

fn positive(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null | Value::Int(_) | Value::Float(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(format!(
            "bad operand type for unary +: '{}'",
            ops::type_label(other)
        )),
    }
}

fn unary(op: UnaryOp, operand: Obj<'_>) -> Result<Obj<'_>, String> {
    let apply: fn(&Value) -> Result<Value, String> = match op {
        UnaryOp::Neg => ops::negate,
        UnaryOp::Pos => positive,
        UnaryOp::Invert => ops::invert,
    };
    match operand {
        Obj::Scalar(value) => apply(&value).map(Obj::Scalar),
        Obj::Series(series) => {
            let values = series
                .values
                .iter()
                .map(apply)
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(series.map_values(values)))
        }
        other => Err(format!("bad operand type for unary operator: '{}'", other.kind())),
    }
}

fn binary<'a>(op: BinOp, left: Obj<'a>, right: Obj<'a>) -> Result<Obj<'a>, String> {
    let apply: fn(BinOp, &Value, &Value) -> Result<Value, String> = match op {
        BinOp::And | BinOp::Or => ops::logical,
        _ if op.is_comparison() => ops::compare,
        _ => ops::arithmetic,
    };

    match (left, right) {
        (Obj::Series(a), Obj::Series(b)) => {
            if a.len() != b.len() {
                return Err(format!(
                    "cannot combine series of different lengths ({} and {})",
                    a.len(),
                    b.len()
                ));
            }
            let values = a
                .values
                .iter()
                .zip(&b.values)
                .map(|(x, y)| apply(op, x, y))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(a.map_values(values)))
        }
        (Obj::Series(a), Obj::Scalar(b)) => {
            let values = a
                .values
                .iter()
                .map(|x| apply(op, x, &b))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(a.map_values(values)))
        }
        (Obj::Scalar(a), Obj::Series(b)) => {
            let values = b
                .values
                .iter()
                .map(|y| apply(op, &a, y))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Obj::Series(b.map_values(values)))
        }
        (Obj::Scalar(a), Obj::Scalar(b)) => apply(op, &a, &b).map(Obj::Scalar),
        (left, right) => Err(format!(
            "unsupported operand types for {}: '{}' and '{}'",
            op.symbol(),
            left.kind(),
            right.kind()
        )),
    }
}
