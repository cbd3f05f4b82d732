use crate::filter::FilterError;
use crate::value::Value;
use chrono::format::{ParseResult, Parsed, StrftimeItems, parse};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";
pub const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%z";
pub const DEFAULT_TIME_PATTERN: &str = "%H:%M:%S%z";

type ParseFn = fn(&str, &str) -> ParseResult<Value>;
type AcceptsFn = fn(&Value) -> bool;

/// Parsing strategy shared by the date, datetime and time field types
///
/// Each constructor pairs a strftime pattern with the function parsing it and the
/// check deciding which already-typed values pass through untouched.
#[derive(Debug, Clone)]
pub struct DateFormat {
    kind: &'static str,
    pattern: String,
    parse: ParseFn,
    accepts: AcceptsFn,
}

impl DateFormat {
    pub fn date() -> Self {
        Self {
            kind: "date",
            pattern: DEFAULT_DATE_PATTERN.to_string(),
            parse: parse_date,
            accepts: |v| matches!(v, Value::Date(_)),
        }
    }

    pub fn datetime() -> Self {
        Self {
            kind: "datetime",
            pattern: DEFAULT_DATETIME_PATTERN.to_string(),
            parse: parse_datetime,
            accepts: |v| matches!(v, Value::DateTime(_) | Value::NaiveDateTime(_)),
        }
    }

    pub fn time() -> Self {
        Self {
            kind: "time",
            pattern: DEFAULT_TIME_PATTERN.to_string(),
            parse: parse_time,
            accepts: |v| matches!(v, Value::Time(_) | Value::TimeTz(..)),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn transform(&self, raw: Value) -> Result<Value, FilterError> {
        if (self.accepts)(&raw) {
            return Ok(raw);
        }

        match &raw {
            Value::Str(text) => (self.parse)(text, &self.pattern).map_err(|e| {
                FilterError::FieldValidation(format!(
                    "{} does not conform to {} ({})",
                    text, self.pattern, e
                ))
            }),
            other => Err(FilterError::FieldValidation(format!(
                "{} value {} does not conform to {}",
                other.type_name(),
                other,
                self.pattern
            ))),
        }
    }
}

fn has_offset_token(pattern: &str) -> bool {
    ["%z", "%:z", "%::z", "%#z"]
        .iter()
        .any(|token| pattern.contains(token))
}

fn parse_date(text: &str, pattern: &str) -> ParseResult<Value> {
    NaiveDate::parse_from_str(text, pattern).map(Value::Date)
}

fn parse_datetime(text: &str, pattern: &str) -> ParseResult<Value> {
    if has_offset_token(pattern) {
        DateTime::parse_from_str(text, pattern).map(Value::DateTime)
    } else {
        NaiveDateTime::parse_from_str(text, pattern).map(Value::NaiveDateTime)
    }
}

fn parse_time(text: &str, pattern: &str) -> ParseResult<Value> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, text, StrftimeItems::new(pattern))?;
    let time = parsed.to_naive_time()?;

    if has_offset_token(pattern) {
        Ok(Value::TimeTz(time, parsed.to_fixed_offset()?))
    } else {
        Ok(Value::Time(time))
    }
}
