use super::Queryable;
use crate::predicate::{Predicate, SqlParams};

/// `SELECT` statement over one table, narrowed by predicates
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    predicates: Vec<Predicate>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render the statement with `?` placeholders and the values bound to them
    pub fn to_sql(&self) -> (String, SqlParams) {
        let mut params = SqlParams::default();
        let mut sql = format!("SELECT * FROM {}", self.table);

        let clauses: Vec<String> = self
            .predicates
            .iter()
            .map(|p| p.to_sql(&mut params))
            .collect();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        (sql, params)
    }
}

impl Queryable for SelectQuery {
    fn filter(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{Column, CompareOp};
    use crate::value::Value;

    #[test]
    fn test_select_without_predicates() {
        let (sql, params) = SelectQuery::new("booking").to_sql();
        assert_eq!(sql, "SELECT * FROM booking");
        assert!(params.values.is_empty());
    }

    #[test]
    fn test_select_joins_predicates_with_and() {
        let query = SelectQuery::new("booking").filter(vec![
            Predicate::compare(Column::new("number_of_heads"), CompareOp::Gte, 2),
            Predicate::compare(Column::new("has_paid"), CompareOp::Eq, Value::Null),
        ]);
        let (sql, params) = query.to_sql();
        assert_eq!(
            sql,
            "SELECT * FROM booking WHERE number_of_heads >= ? AND has_paid IS NULL"
        );
        assert_eq!(params.values, vec![Value::Int(2)]);
    }
}
