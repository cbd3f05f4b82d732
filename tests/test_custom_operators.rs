use query_filter::{
    Column, CompareOp, Field, FieldSet, Filter, FilterError, MemoryQuery, Operator, Predicate,
    Row, SelectQuery, Value, escape_like_pattern,
};
use serde_json::json;

fn starts_with() -> Operator {
    Operator::custom(|source: &Column, value: Value| match value {
        Value::Str(prefix) => Ok(Predicate::like(
            source,
            format!("{}%", escape_like_pattern(&prefix)),
        )),
        other => Err(FilterError::OperatorArgument(format!(
            "cannot match prefix {}",
            other
        ))),
    })
}

fn rows() -> Vec<Row> {
    ["Jim Halpert", "Michael Scott", "Dwight Schrute", "Pam Beesly", "Jim_Bob"]
        .into_iter()
        .map(|name| Row::new().with("name", name))
        .collect()
}

#[test]
fn test_custom_operator_builds_predicate() {
    let fields = FieldSet::new().with_field(
        "name",
        Field::char("name").operator(starts_with()).build().unwrap(),
    );
    let rows = rows();
    let query = Filter::new(&fields, MemoryQuery::new(&rows))
        .filter("name=Jim")
        .unwrap();
    assert_eq!(query.count(), 2);

    let query = Filter::new(&fields, MemoryQuery::new(&rows))
        .filter("name=Jim_")
        .unwrap();
    assert_eq!(query.count(), 1);
}

#[test]
fn test_custom_operator_renders_sql() {
    let fields = FieldSet::new().with_field(
        "name",
        Field::char("name").operator(starts_with()).build().unwrap(),
    );
    let (sql, params) = Filter::new(&fields, SelectQuery::new("booking"))
        .filter("name=Jim")
        .unwrap()
        .to_sql();
    assert_eq!(sql, r"SELECT * FROM booking WHERE name LIKE ? ESCAPE '\'");
    assert_eq!(params.values, vec![Value::from("Jim%")]);
}

#[test]
fn test_custom_operator_argument_errors_are_suppressible() {
    let fields = FieldSet::new().with_field(
        "heads",
        Field::integer("number_of_heads").operator(starts_with()).build().unwrap(),
    );
    let rows = rows();
    let query = Filter::new(&fields, MemoryQuery::new(&rows))
        .filter(json!({"heads": 2}))
        .unwrap();
    assert_eq!(query.count(), 5);

    let result = Filter::new(&fields, MemoryQuery::new(&rows))
        .raise_exceptions(true)
        .filter(json!({"heads": 2}));
    assert!(matches!(result, Err(FilterError::OperatorArgument(_))));
}

#[test]
fn test_custom_operator_external_errors_propagate() {
    let fields = FieldSet::new().with_field(
        "name",
        Field::char("name")
            .operator(Operator::custom(|_, _| {
                Err(anyhow::anyhow!("lookup service unavailable").into())
            }))
            .build()
            .unwrap(),
    );
    let rows = rows();
    let result = Filter::new(&fields, MemoryQuery::new(&rows)).filter("name=jim");

    match result {
        Err(err @ FilterError::External(_)) => {
            assert!(!err.is_suppressible());
            assert_eq!(err.to_string(), "lookup service unavailable");
        }
        other => panic!("expected an external error, got {:?}", other.map(|q| q.count())),
    }
}

#[test]
fn test_custom_operator_bypasses_allow_list() {
    let negated_eq = Operator::custom(|source, value| {
        Ok(!Predicate::compare(source, CompareOp::Eq, value))
    });
    let field = Field::boolean("has_paid").operator(negated_eq).build().unwrap();
    assert_eq!(field.operator_name(), None);
}

#[test]
fn test_unknown_operator_name() {
    let result = Field::char("name").operator("startswith").build();
    assert!(matches!(result, Err(FilterError::FieldInstantiation(_))));
}
