use query_filter::{EnumChoices, Field, FieldSet, Filter, SelectQuery, Value};
use serde_json::json;

fn booking_fields() -> FieldSet {
    FieldSet::new()
        .with_field("name", Field::char("name").operator("icontains").build().unwrap())
        .with_field(
            "number_of_heads",
            Field::integer("number_of_heads")
                .operator("gte")
                .null_values(vec!["none"])
                .build()
                .unwrap(),
        )
        .with_field(
            "excluded_name",
            Field::char("name").operator("~ieq").build().unwrap(),
        )
        .with_field(
            "status",
            Field::enumeration("status", EnumChoices::new([("open", "open"), ("closed", "closed")]))
                .operator("~eq")
                .build()
                .unwrap(),
        )
        .with_field("has_paid", Field::boolean("has_paid").null_values(vec!["none"]).build().unwrap())
}

fn render(input: serde_json::Value) -> (String, Vec<Value>) {
    let fields = booking_fields();
    let (sql, params) = Filter::new(&fields, SelectQuery::new("booking"))
        .filter(input)
        .unwrap()
        .to_sql();
    (sql, params.values)
}

#[test]
fn test_parameterised_where_clause() {
    let (sql, params) = render(json!({"name": "Jim", "number_of_heads": "2"}));
    assert_eq!(
        sql,
        r"SELECT * FROM booking WHERE lower(name) LIKE ? ESCAPE '\' AND number_of_heads >= ?"
    );
    assert_eq!(params, vec![Value::from("%jim%"), Value::Int(2)]);
}

#[test]
fn test_negations_render_as_not() {
    let (sql, params) = render(json!({"excluded_name": "Kevin", "status": "closed"}));
    assert_eq!(
        sql,
        "SELECT * FROM booking WHERE NOT (lower(name) = ?) AND NOT (status = ?)"
    );
    assert_eq!(params, vec![Value::from("kevin"), Value::from("closed")]);
}

#[test]
fn test_null_values_render_is_null() {
    let (sql, params) = render(json!({"has_paid": "none"}));
    assert_eq!(sql, "SELECT * FROM booking WHERE has_paid IS NULL");
    assert!(params.is_empty());
}

#[test]
fn test_user_input_cannot_inject_like_wildcards() {
    let (_, params) = render(json!({"name": "50%_off\\"}));
    assert_eq!(params, vec![Value::from(r"%50\%\_off\\%")]);
}

#[test]
fn test_json_params_serialise() {
    let fields = booking_fields();
    let (_, params) = Filter::new(&fields, SelectQuery::new("booking"))
        .filter("name=pam&number_of_heads=3")
        .unwrap()
        .to_sql();
    assert_eq!(
        serde_json::to_value(&params.values).unwrap(),
        json!(["%pam%", 3])
    );
}
