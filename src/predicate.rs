//! Boolean predicates over a backing data source
//!
//! A [`Predicate`] is built by an operator from a [`Column`] and a transformed
//! [`Value`]. Predicates can be rendered as a SQL `WHERE` fragment with `?`
//! placeholders or evaluated directly against an in-memory [`Row`].

use crate::query::Row;
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::ops::Not;
use std::sync::OnceLock;
use tracing::warn;

/// Opaque locator of a column in the backing schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column(String);

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column(name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Left-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Column),
    /// Lower-cased text of the inner expression
    Lower(Box<Expr>),
}

impl Expr {
    pub fn lower(self) -> Self {
        Expr::Lower(Box::new(self))
    }

    fn eval(&self, row: &Row) -> Value {
        match self {
            Expr::Column(column) => row.get(column.name()).cloned().unwrap_or(Value::Null),
            Expr::Lower(inner) => match inner.eval(row) {
                Value::Str(s) => Value::Str(s.to_lowercase()),
                _ => Value::Null,
            },
        }
    }

    fn to_sql(&self) -> String {
        match self {
            Expr::Column(column) => column.to_string(),
            Expr::Lower(inner) => format!("lower({})", inner.to_sql()),
        }
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::Column(column)
    }
}

impl From<&Column> for Expr {
    fn from(column: &Column) -> Self {
        Expr::Column(column.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    fn sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        expr: Expr,
        op: CompareOp,
        value: Value,
    },
    /// `LIKE` match where `%` and `_` are wildcards and `\` escapes the next character.
    /// A missing pattern is a NULL operand and matches nothing.
    Like {
        expr: Expr,
        pattern: Option<LikePattern>,
    },
    /// The array held by `expr` contains every one of `values`
    ArrayContains { expr: Expr, values: Vec<Value> },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
}

/// `LIKE` pattern with its regex translation, built on first evaluation
#[derive(Debug, Clone)]
pub struct LikePattern {
    pattern: String,
    regex: OnceLock<Option<Regex>>,
}

impl LikePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            regex: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex
            .get_or_init(|| match like_regex(&self.pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!(pattern = %self.pattern, error = %err, "LIKE pattern does not compile, matching nothing");
                    None
                }
            })
            .as_ref()
            .is_some_and(|re| re.is_match(text))
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// Collects SQL parameters during rendering (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<Value>,
}

impl Predicate {
    pub fn compare(expr: impl Into<Expr>, op: CompareOp, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            expr: expr.into(),
            op,
            value: value.into(),
        }
    }

    pub fn like(expr: impl Into<Expr>, pattern: impl Into<String>) -> Self {
        Predicate::Like {
            expr: expr.into(),
            pattern: Some(LikePattern::new(pattern)),
        }
    }

    /// `LIKE` against a NULL operand
    pub fn like_null(expr: impl Into<Expr>) -> Self {
        Predicate::Like {
            expr: expr.into(),
            pattern: None,
        }
    }

    pub fn array_contains(expr: impl Into<Expr>, values: Vec<Value>) -> Self {
        Predicate::ArrayContains {
            expr: expr.into(),
            values,
        }
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Predicate::And(predicates)
    }

    /// Evaluate against a row using two-valued logic, so `Not` is an exact negation
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::Compare { expr, op, value } => {
                let lhs = expr.eval(row);
                match op {
                    CompareOp::Eq => lhs.same_as(value),
                    CompareOp::Ne => !lhs.same_as(value),
                    ordering_op => match (lhs.is_null() || value.is_null(), lhs.compare(value)) {
                        (false, Some(ordering)) => match ordering_op {
                            CompareOp::Gt => ordering.is_gt(),
                            CompareOp::Gte => ordering.is_ge(),
                            CompareOp::Lt => ordering.is_lt(),
                            _ => ordering.is_le(),
                        },
                        _ => false,
                    },
                }
            }
            Predicate::Like { expr, pattern } => {
                let Some(pattern) = pattern else {
                    return false;
                };
                match expr.eval(row) {
                    Value::Null => false,
                    Value::Str(s) => pattern.is_match(&s),
                    other => pattern.is_match(&other.to_string()),
                }
            }
            Predicate::ArrayContains { expr, values } => match expr.eval(row) {
                Value::List(items) => values
                    .iter()
                    .all(|wanted| items.iter().any(|item| item.same_as(wanted))),
                _ => false,
            },
            Predicate::Not(inner) => !inner.matches(row),
            Predicate::And(predicates) => predicates.iter().all(|p| p.matches(row)),
        }
    }

    /// Generate SQL WHERE clause fragment
    /// Returns the SQL clause with ? placeholders and updates params
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Predicate::Compare { expr, op, value } => {
                let lhs = expr.to_sql();
                match (op, value) {
                    (CompareOp::Eq, Value::Null) => format!("{} IS NULL", lhs),
                    (CompareOp::Ne, Value::Null) => format!("{} IS NOT NULL", lhs),
                    _ => {
                        params.values.push(value.clone());
                        format!("{} {} ?", lhs, op.sql())
                    }
                }
            }
            Predicate::Like {
                expr,
                pattern: Some(pattern),
            } => {
                params.values.push(Value::from(pattern.as_str()));
                format!("{} LIKE ? ESCAPE '\\'", expr.to_sql())
            }
            Predicate::Like {
                expr,
                pattern: None,
            } => format!("{} LIKE NULL", expr.to_sql()),
            Predicate::ArrayContains { expr, values } => {
                params.values.push(Value::List(values.clone()));
                format!("{} @> ?", expr.to_sql())
            }
            Predicate::Not(inner) => format!("NOT ({})", inner.to_sql(params)),
            Predicate::And(predicates) => {
                if predicates.is_empty() {
                    return "1=1".to_string();
                }
                let parts: Vec<String> = predicates
                    .iter()
                    .map(|p| format!("({})", p.to_sql(params)))
                    .collect();
                parts.join(" AND ")
            }
        }
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        Predicate::Not(Box::new(self))
    }
}

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Use this when building LIKE patterns from user input to prevent
/// unintended pattern matching.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Translate a LIKE pattern into an anchored regex
fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::from("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                re.push_str(&regex::escape(&literal.to_string()));
            }
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
}
