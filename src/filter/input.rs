use super::error::FilterError;
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Flat mapping of input keys to raw values
pub type QueryData = BTreeMap<String, Value>;

/// Input accepted by a filter before normalisation
#[derive(Debug, Clone)]
pub enum FilterInput {
    Mapping(QueryData),
    QueryString(String),
    /// Arbitrary JSON: objects are mappings, strings are query strings
    Json(serde_json::Value),
}

impl FilterInput {
    pub fn normalize(self) -> Result<QueryData, FilterError> {
        match self {
            FilterInput::Mapping(data) => Ok(data),
            FilterInput::QueryString(query) => Ok(parse_query_string(&query)),
            FilterInput::Json(serde_json::Value::Object(object)) => Ok(object
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            FilterInput::Json(serde_json::Value::String(query)) => Ok(parse_query_string(&query)),
            FilterInput::Json(other) => Err(FilterError::QueryParameterData(
                Value::from(other).type_name().to_string(),
            )),
        }
    }
}

impl From<QueryData> for FilterInput {
    fn from(data: QueryData) -> Self {
        FilterInput::Mapping(data)
    }
}

impl From<HashMap<String, Value>> for FilterInput {
    fn from(data: HashMap<String, Value>) -> Self {
        FilterInput::Mapping(data.into_iter().collect())
    }
}

impl From<&str> for FilterInput {
    fn from(query: &str) -> Self {
        FilterInput::QueryString(query.to_string())
    }
}

impl From<String> for FilterInput {
    fn from(query: String) -> Self {
        FilterInput::QueryString(query)
    }
}

impl From<serde_json::Value> for FilterInput {
    fn from(json: serde_json::Value) -> Self {
        FilterInput::Json(json)
    }
}

/// Parse a query string into a flat mapping.
///
/// One leading `?` is stripped, keys and values are percent-decoded, blank values
/// are dropped and repeated keys keep their first value.
pub fn parse_query_string(query_string: &str) -> QueryData {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query_string).unwrap_or_default();

    let mut data = QueryData::new();
    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        data.entry(key).or_insert(Value::Str(value));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_string() {
        let data = parse_query_string("?name=A&number_of_heads=2&date=2020-01-05");
        assert_eq!(data.len(), 3);
        assert_eq!(data.get("name"), Some(&Value::from("A")));
        assert_eq!(data.get("number_of_heads"), Some(&Value::from("2")));
        assert_eq!(
            data,
            parse_query_string("name=A&number_of_heads=2&date=2020-01-05")
        );
    }

    #[test]
    fn test_parse_query_string_decodes_and_keeps_first_value() {
        let data = parse_query_string("created_at=2020-01-01T10:00:00%2B0000&tag=a&tag=b&empty=");
        assert_eq!(
            data.get("created_at"),
            Some(&Value::from("2020-01-01T10:00:00+0000"))
        );
        assert_eq!(data.get("tag"), Some(&Value::from("a")));
        assert!(!data.contains_key("empty"));
    }

    #[test]
    fn test_parse_empty_query_string() {
        assert!(parse_query_string("").is_empty());
        assert!(parse_query_string("?").is_empty());
    }

    #[test]
    fn test_normalize_json() {
        let data = FilterInput::from(json!({"name": "a", "number_of_heads": 2}))
            .normalize()
            .unwrap();
        assert_eq!(data.get("number_of_heads"), Some(&Value::Int(2)));

        let data = FilterInput::from(json!("name=a")).normalize().unwrap();
        assert_eq!(data.get("name"), Some(&Value::from("a")));
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        for input in [json!(10), json!(null), json!([1, 2]), json!(true)] {
            assert!(matches!(
                FilterInput::from(input).normalize(),
                Err(FilterError::QueryParameterData(_))
            ));
        }
    }
}
