use crate::field::{BooleanTokens, DateFormat, EnumChoices, Field, FieldType};
use crate::filter::{FieldSet, FilterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid declaration for field '{name}': {source}")]
    Field {
        name: String,
        #[source]
        source: FilterError,
    },
}

/// Declarative filter definition loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Table the generated query selects from.
    pub table: Option<String>,
    pub raise_exceptions: bool,
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Column to filter; defaults to the field name.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKindConfig,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub null_values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKindConfig {
    Char,
    Integer,
    Enum {
        choices: Vec<ChoiceConfig>,
    },
    Boolean {
        #[serde(default)]
        truthy: Vec<serde_json::Value>,
        #[serde(default)]
        falsy: Vec<serde_json::Value>,
    },
    Array,
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    Datetime {
        #[serde(default)]
        format: Option<String>,
    },
    Time {
        #[serde(default)]
        format: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceConfig {
    pub label: String,
    pub value: serde_json::Value,
}

impl FieldKindConfig {
    fn field_type(&self) -> FieldType {
        let with_format = |format: DateFormat, pattern: &Option<String>| match pattern {
            Some(pattern) => format.with_pattern(pattern.as_str()),
            None => format,
        };

        match self {
            FieldKindConfig::Char => FieldType::Char,
            FieldKindConfig::Integer => FieldType::Integer,
            FieldKindConfig::Enum { choices } => FieldType::Enum(EnumChoices::new(
                choices.iter().map(|c| (c.label.clone(), c.value.clone())),
            )),
            FieldKindConfig::Boolean { truthy, falsy } => FieldType::Boolean(
                BooleanTokens::default()
                    .truthy(truthy.clone())
                    .falsy(falsy.clone()),
            ),
            FieldKindConfig::Array => FieldType::Array,
            FieldKindConfig::Date { format } => FieldType::Date(with_format(DateFormat::date(), format)),
            FieldKindConfig::Datetime { format } => {
                FieldType::Date(with_format(DateFormat::datetime(), format))
            }
            FieldKindConfig::Time { format } => FieldType::Date(with_format(DateFormat::time(), format)),
        }
    }
}

impl FieldConfig {
    pub fn build(&self) -> Result<Field, FilterError> {
        let source = self.source.as_deref().unwrap_or(&self.name);
        let mut builder = Field::builder(source, self.kind.field_type())
            .null_values(self.null_values.clone());

        if let Some(operator) = &self.operator {
            builder = builder.operator(operator.as_str());
        }
        if let Some(default) = &self.default {
            builder = builder.default_value(default.clone());
        }

        builder.build()
    }
}

impl FilterConfig {
    /// Build the ordered field set, naming the first field that fails to build
    pub fn field_set(&self) -> Result<FieldSet, ConfigError> {
        self.fields.iter().try_fold(FieldSet::new(), |set, field| {
            let built = field.build().map_err(|source| ConfigError::Field {
                name: field.name.clone(),
                source,
            })?;
            Ok(set.with_field(field.name.clone(), built))
        })
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(FilterConfig::default())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FilterConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn parse_config(raw: &str) -> Result<FilterConfig, toml::de::Error> {
    toml::from_str::<FilterConfig>(raw)
}
