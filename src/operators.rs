//! Operator registry
//!
//! Maps operator names to functions building a [`Predicate`] from a column and a
//! transformed value. Lookup is case-insensitive. A `~` prefix denotes the negated
//! form of an operator.

use crate::filter::FilterError;
use crate::predicate::{Column, CompareOp, Expr, Predicate, escape_like_pattern};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by registry operators
pub type OperatorFn = fn(&Column, Value) -> Result<Predicate, FilterError>;

/// Caller-supplied predicate builder
pub type CustomOperatorFn =
    Arc<dyn Fn(&Column, Value) -> Result<Predicate, FilterError> + Send + Sync>;

/// Operator selected for a field: a registry name or a custom function
#[derive(Clone)]
pub enum Operator {
    Named(String),
    Custom(CustomOperatorFn),
}

impl Operator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Column, Value) -> Result<Predicate, FilterError> + Send + Sync + 'static,
    {
        Operator::Custom(Arc::new(f))
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Operator::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::Named(name.to_string())
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::Named(name)
    }
}

/// Every registered operator name
pub const OPERATOR_NAMES: &[&str] = &[
    "eq",
    "ieq",
    "~eq",
    "~ieq",
    "gt",
    "gte",
    "lt",
    "lte",
    "contains",
    "~contains",
    "icontains",
];

/// Look up a registry operator by name (case-insensitive)
pub fn resolve(name: &str) -> Option<OperatorFn> {
    let op: OperatorFn = match name.to_lowercase().as_str() {
        "eq" => eq,
        "ieq" => ieq,
        "~eq" => not_eq,
        "~ieq" => not_ieq,
        "gt" => gt,
        "gte" => gte,
        "lt" => lt,
        "lte" => lte,
        "contains" => contains,
        "~contains" => not_contains,
        "icontains" => icontains,
        _ => return None,
    };
    Some(op)
}

pub fn eq(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    Ok(Predicate::compare(source, CompareOp::Eq, value))
}

pub fn ieq(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    let text = require_string(&value, "case insensitive operator")?;
    Ok(Predicate::compare(
        Expr::from(source).lower(),
        CompareOp::Eq,
        text.to_lowercase(),
    ))
}

pub fn not_eq(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    Ok(!eq(source, value)?)
}

pub fn not_ieq(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    Ok(!ieq(source, value)?)
}

pub fn gt(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    ordering(source, value, CompareOp::Gt, "gt")
}

pub fn gte(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    ordering(source, value, CompareOp::Gte, "gte")
}

pub fn lt(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    ordering(source, value, CompareOp::Lt, "lt")
}

pub fn lte(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    ordering(source, value, CompareOp::Lte, "lte")
}

/// Substring match for scalars, superset match for lists; null matches nothing
pub fn contains(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    match value {
        Value::Null => Ok(Predicate::like_null(source)),
        Value::List(values) => Ok(Predicate::array_contains(source, values)),
        Value::Str(text) => Ok(substring(Expr::from(source), &text)),
        other => Ok(substring(Expr::from(source), &other.to_string())),
    }
}

pub fn not_contains(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    Ok(!contains(source, value)?)
}

pub fn icontains(source: &Column, value: Value) -> Result<Predicate, FilterError> {
    let text = require_string(&value, "icontains")?;
    Ok(substring(Expr::from(source).lower(), &text.to_lowercase()))
}

fn ordering(
    source: &Column,
    value: Value,
    op: CompareOp,
    name: &str,
) -> Result<Predicate, FilterError> {
    if value.is_null() {
        return Err(FilterError::OperatorArgument(format!(
            "{} operator cannot be used with null",
            name
        )));
    }
    Ok(Predicate::compare(source, op, value))
}

fn substring(expr: Expr, text: &str) -> Predicate {
    Predicate::like(expr, format!("%{}%", escape_like_pattern(text)))
}

fn require_string<'a>(value: &'a Value, operator: &str) -> Result<&'a str, FilterError> {
    value.as_str().ok_or_else(|| {
        FilterError::OperatorArgument(format!(
            "{} can only be used with string values, got {}",
            operator,
            value.type_name()
        ))
    })
}
