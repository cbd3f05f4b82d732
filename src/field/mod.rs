//! Field declarations
//!
//! A [`Field`] maps one named input key to one predicate. It owns the column it
//! filters, the operator bound at construction, an optional default and the raw
//! values treated as null. Fields hold no per-request state and can be shared
//! across any number of concurrent filter invocations.
//!
//! ```
//! use query_filter::field::Field;
//!
//! let field = Field::integer("number_of_heads").operator("gte").build().unwrap();
//! assert!(field.filter("2".into()).is_ok());
//! ```

pub mod temporal;
pub mod types;

use crate::filter::FilterError;
use crate::operators::{self, CustomOperatorFn, Operator, OperatorFn};
use crate::predicate::{Column, Predicate};
use crate::value::Value;
use std::fmt;

pub use temporal::DateFormat;
pub use types::{BooleanTokens, EnumChoices, FieldType};

/// Operator resolved once at field construction
#[derive(Clone)]
enum BoundOperator {
    Registry { name: String, func: OperatorFn },
    Custom(CustomOperatorFn),
}

impl fmt::Debug for BoundOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundOperator::Registry { name, .. } => f.debug_tuple("Registry").field(name).finish(),
            BoundOperator::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    source: Column,
    field_type: FieldType,
    operator: BoundOperator,
    default: Option<Value>,
    null_values: Vec<Value>,
}

impl Field {
    pub fn builder(source: impl Into<Column>, field_type: FieldType) -> FieldBuilder {
        FieldBuilder {
            source: source.into(),
            field_type,
            operator: None,
            default: None,
            null_values: Vec::new(),
        }
    }

    pub fn char(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Char)
    }

    pub fn integer(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Integer)
    }

    pub fn enumeration(source: impl Into<Column>, choices: EnumChoices) -> FieldBuilder {
        Self::builder(source, FieldType::Enum(choices))
    }

    pub fn boolean(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Boolean(BooleanTokens::default()))
    }

    pub fn array(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Array)
    }

    pub fn date(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Date(DateFormat::date()))
    }

    pub fn datetime(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Date(DateFormat::datetime()))
    }

    pub fn time(source: impl Into<Column>) -> FieldBuilder {
        Self::builder(source, FieldType::Date(DateFormat::time()))
    }

    pub fn source(&self) -> &Column {
        &self.source
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn null_values(&self) -> &[Value] {
        &self.null_values
    }

    /// Registry name of the operator, `None` for custom operators
    pub fn operator_name(&self) -> Option<&str> {
        match &self.operator {
            BoundOperator::Registry { name, .. } => Some(name),
            BoundOperator::Custom(_) => None,
        }
    }

    pub fn transform(&self, raw: Value) -> Result<Value, FilterError> {
        self.field_type.transform(raw)
    }

    /// Transform a raw value and build this field's predicate from it.
    ///
    /// Raw values listed in `null_values` skip the transform and reach the
    /// operator as [`Value::Null`].
    pub fn filter(&self, raw: Value) -> Result<Predicate, FilterError> {
        let value = if self.null_values.contains(&raw) {
            Value::Null
        } else {
            self.transform(raw)?
        };

        match &self.operator {
            BoundOperator::Registry { func, .. } => func(&self.source, value),
            BoundOperator::Custom(func) => func(&self.source, value),
        }
    }
}

pub struct FieldBuilder {
    source: Column,
    field_type: FieldType,
    operator: Option<Operator>,
    default: Option<Value>,
    null_values: Vec<Value>,
}

impl FieldBuilder {
    pub fn operator(mut self, operator: impl Into<Operator>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Value used when the field is absent from the input; `Null` clears it
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default = (!value.is_null()).then_some(value);
        self
    }

    pub fn null_values<V: Into<Value>>(mut self, values: Vec<V>) -> Self {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Field, FilterError> {
        let operator = self
            .operator
            .unwrap_or_else(|| Operator::from(self.field_type.default_operator()));

        let operator = match operator {
            Operator::Custom(func) => BoundOperator::Custom(func),
            Operator::Named(name) => {
                let key = name.to_lowercase();
                if !self.field_type.allowed_operators().contains(&key.as_str()) {
                    return Err(FilterError::FieldInstantiation(format!(
                        "{} not supported for {} field",
                        name,
                        self.field_type.name()
                    )));
                }
                let func = operators::resolve(&key)
                    .ok_or_else(|| FilterError::UnsupportedOperator(name.clone()))?;
                BoundOperator::Registry { name: key, func }
            }
        };

        self.field_type.validate()?;

        Ok(Field {
            source: self.source,
            field_type: self.field_type,
            operator,
            default: self.default,
            null_values: self.null_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::CompareOp;

    #[test]
    fn test_default_operators() {
        assert_eq!(Field::char("name").build().unwrap().operator_name(), Some("eq"));
        assert_eq!(
            Field::array("guest_names").build().unwrap().operator_name(),
            Some("contains")
        );
    }

    #[test]
    fn test_operator_outside_allow_list_fails() {
        let result = Field::boolean("has_paid").operator("~eq").build();
        assert!(matches!(result, Err(FilterError::FieldInstantiation(_))));

        let result = Field::integer("heads").operator("icontains").build();
        assert!(matches!(result, Err(FilterError::FieldInstantiation(_))));
    }

    #[test]
    fn test_operator_names_are_case_insensitive() {
        let field = Field::char("name").operator("IContains").build().unwrap();
        assert_eq!(field.operator_name(), Some("icontains"));
    }

    #[test]
    fn test_empty_enum_fails_to_build() {
        let result = Field::enumeration("heads", EnumChoices::default()).build();
        assert!(matches!(result, Err(FilterError::FieldInstantiation(_))));
    }

    #[test]
    fn test_null_values_bypass_transform() {
        let field = Field::integer("heads")
            .null_values(vec!["null"])
            .build()
            .unwrap();
        assert_eq!(
            field.filter(Value::from("null")).unwrap(),
            Predicate::compare(Column::new("heads"), CompareOp::Eq, Value::Null)
        );
        assert!(matches!(
            field.filter(Value::from("none")),
            Err(FilterError::FieldValidation(_))
        ));
    }

    #[test]
    fn test_string_and_integer_inputs_build_identical_predicates() {
        let field = Field::integer("heads").operator("gte").build().unwrap();
        assert_eq!(
            field.filter(Value::from("4")).unwrap(),
            field.filter(Value::Int(4)).unwrap()
        );
    }

    #[test]
    fn test_custom_operator_bypasses_allow_list() {
        let field = Field::boolean("has_paid")
            .operator(Operator::custom(|source, value| {
                Ok(!Predicate::compare(source, CompareOp::Eq, value))
            }))
            .build()
            .unwrap();
        assert_eq!(field.operator_name(), None);
        assert_eq!(
            field.filter(Value::Bool(true)).unwrap(),
            !Predicate::compare(Column::new("has_paid"), CompareOp::Eq, true)
        );
    }

    #[test]
    fn test_null_default_means_no_default() {
        let field = Field::integer("heads").default_value(Value::Null).build().unwrap();
        assert!(field.default().is_none());
        let field = Field::integer("heads").default_value(0).build().unwrap();
        assert_eq!(field.default(), Some(&Value::Int(0)));
    }
}
