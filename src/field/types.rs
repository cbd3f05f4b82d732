use super::temporal::DateFormat;
use crate::filter::FilterError;
use crate::value::Value;

/// Concrete type of a field, deciding its transform and permitted operators
#[derive(Debug, Clone)]
pub enum FieldType {
    Char,
    Integer,
    Enum(EnumChoices),
    Boolean(BooleanTokens),
    Array,
    Date(DateFormat),
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Char => "char",
            FieldType::Integer => "integer",
            FieldType::Enum(_) => "enum",
            FieldType::Boolean(_) => "boolean",
            FieldType::Array => "array",
            FieldType::Date(format) => format.kind(),
        }
    }

    pub fn allowed_operators(&self) -> &'static [&'static str] {
        match self {
            FieldType::Char => &["eq", "~eq", "ieq", "~ieq", "contains", "icontains"],
            FieldType::Integer | FieldType::Date(_) => &["eq", "~eq", "gt", "gte", "lt", "lte"],
            FieldType::Enum(_) => &["eq", "~eq"],
            FieldType::Boolean(_) => &["eq"],
            FieldType::Array => &["contains", "~contains"],
        }
    }

    pub fn default_operator(&self) -> &'static str {
        match self {
            FieldType::Array => "contains",
            _ => "eq",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), FilterError> {
        match self {
            FieldType::Enum(choices) if choices.is_empty() => Err(
                FilterError::FieldInstantiation("enum field requires at least one choice".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Coerce a raw input value into the type expected by this field
    pub fn transform(&self, raw: Value) -> Result<Value, FilterError> {
        match self {
            FieldType::Char => to_string(raw),
            FieldType::Integer => match raw {
                Value::Null => Ok(Value::Null),
                other => to_integer(other).map_err(FilterError::FieldValidation),
            },
            FieldType::Enum(choices) => choices.lookup(raw),
            FieldType::Boolean(tokens) => tokens.lookup(raw),
            FieldType::Array => Ok(match raw {
                list @ Value::List(_) => list,
                Value::Str(text) => Value::List(text.split(',').map(Value::from).collect()),
                _ => Value::Null,
            }),
            FieldType::Date(format) => format.transform(raw),
        }
    }
}

fn to_string(raw: Value) -> Result<Value, FilterError> {
    match raw {
        Value::Str(_) => Ok(raw),
        Value::Null | Value::List(_) => Err(FilterError::FieldValidation(format!(
            "{} is not of type string",
            raw
        ))),
        other => Ok(Value::Str(other.to_string())),
    }
}

fn to_integer(raw: Value) -> Result<Value, String> {
    match raw {
        Value::Int(_) => Ok(raw),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Float(x) if x.is_finite() && x.abs() < i64::MAX as f64 => {
            Ok(Value::Int(x.trunc() as i64))
        }
        Value::Str(ref text) => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("{} is not of type integer", text)),
        other => Err(format!("{} is not of type integer", other)),
    }
}

/// Ordered (label, value) members of an enumeration
#[derive(Debug, Clone, Default)]
pub struct EnumChoices {
    members: Vec<(String, Value)>,
}

impl EnumChoices {
    pub fn new<L, V, I>(members: I) -> Self
    where
        L: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (L, V)>,
    {
        Self {
            members: members
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when every member value is an integer
    pub fn is_integral(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|(_, v)| matches!(v, Value::Int(_)))
    }

    pub fn label_of(&self, value: &Value) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, member)| member.same_as(value))
            .map(|(label, _)| label.as_str())
    }

    /// Values outside the enumeration are configuration errors, not validation errors
    fn lookup(&self, raw: Value) -> Result<Value, FilterError> {
        let candidate = if self.is_integral() {
            to_integer(raw).map_err(FilterError::FieldInstantiation)?
        } else {
            raw
        };

        self.members
            .iter()
            .find(|(_, member)| member.same_as(&candidate))
            .map(|(_, member)| member.clone())
            .ok_or_else(|| {
                FilterError::FieldInstantiation(format!(
                    "{} is not a valid choice, expected one of: {}",
                    candidate,
                    self.labels().join(", ")
                ))
            })
    }

    fn labels(&self) -> Vec<&str> {
        self.members.iter().map(|(label, _)| label.as_str()).collect()
    }
}

/// Raw values recognised as true and false
#[derive(Debug, Clone)]
pub struct BooleanTokens {
    truthy: Vec<Value>,
    falsy: Vec<Value>,
}

impl Default for BooleanTokens {
    fn default() -> Self {
        Self {
            truthy: vec![Value::Bool(true), Value::Int(1)],
            falsy: vec![Value::Bool(false), Value::Int(0)],
        }
    }
}

impl BooleanTokens {
    /// Replace the truthy set; an empty list keeps the defaults
    pub fn truthy<V: Into<Value>>(mut self, values: Vec<V>) -> Self {
        if !values.is_empty() {
            self.truthy = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Replace the falsy set; an empty list keeps the defaults
    pub fn falsy<V: Into<Value>>(mut self, values: Vec<V>) -> Self {
        if !values.is_empty() {
            self.falsy = values.into_iter().map(Into::into).collect();
        }
        self
    }

    fn lookup(&self, raw: Value) -> Result<Value, FilterError> {
        if self.truthy.iter().any(|t| t.same_as(&raw)) {
            return Ok(Value::Bool(true));
        }
        if self.falsy.iter().any(|f| f.same_as(&raw)) {
            return Ok(Value::Bool(false));
        }
        Err(FilterError::FieldValidation(format!(
            "{} is an invalid truthy/falsy option",
            raw
        )))
    }
}
