use super::Queryable;
use crate::predicate::Predicate;
use crate::value::Value;
use std::collections::BTreeMap;

/// A record of column values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }
}

/// Query over rows held in memory
#[derive(Debug, Clone)]
pub struct MemoryQuery<'a> {
    rows: &'a [Row],
    predicates: Vec<Predicate>,
}

impl<'a> MemoryQuery<'a> {
    pub fn new(rows: &'a [Row]) -> Self {
        Self {
            rows,
            predicates: Vec::new(),
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Rows matching every predicate, in insertion order
    pub fn all(&self) -> Vec<&'a Row> {
        self.rows
            .iter()
            .filter(|row| self.predicates.iter().all(|p| p.matches(row)))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.all().len()
    }
}

impl Queryable for MemoryQuery<'_> {
    fn filter(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }
}
