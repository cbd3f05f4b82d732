//! Filter declarations and invocation
//!
//! A filter declaration is an ordered set of named [`Field`]s. Invoking a filter
//! normalises the input into a flat mapping, asks every declared field for a
//! predicate, lets the declaration adjust the predicate list and finally restricts
//! a [`Queryable`] with the conjunction of the surviving predicates.
//!
//! # Defaults and skipping
//!
//! A field whose name is absent from the input contributes its default value, or
//! nothing at all when it has none.
//!
//! # Exception policy
//!
//! Filters suppress field configuration, validation and operator argument errors
//! unless [`Filter::raise_exceptions`] opts into strict mode. A suppressed error
//! drops that field's predicate and evaluation continues with the next field.
//! Input shape errors, unsupported operators and errors raised by custom
//! operators always propagate.

pub mod error;
pub mod input;

pub use error::{ErrorKind, FilterError};
pub use input::{FilterInput, QueryData, parse_query_string};

use crate::field::Field;
use crate::predicate::Predicate;
use crate::query::Queryable;
use tracing::{debug, trace};

/// Ordered set of named fields
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<(String, Field)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field; redeclaring a name replaces the earlier field in place
    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, field)| field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A filter declaration: its fields plus an optional post-filter hook
pub trait FilterDefinition {
    fn fields(&self) -> &FieldSet;

    /// Adjust the predicates built from the declared fields.
    ///
    /// Called exactly once per invocation, after every field has been processed.
    fn post_filter(&self, _data: &QueryData, predicates: Vec<Predicate>) -> Vec<Predicate> {
        predicates
    }
}

impl FilterDefinition for FieldSet {
    fn fields(&self) -> &FieldSet {
        self
    }
}

/// One filter invocation over a queryable
pub struct Filter<'d, D: ?Sized, Q> {
    definition: &'d D,
    query: Q,
    raise_exceptions: bool,
}

impl<'d, D, Q> Filter<'d, D, Q>
where
    D: FilterDefinition + ?Sized,
    Q: Queryable,
{
    pub fn new(definition: &'d D, query: Q) -> Self {
        Self {
            definition,
            query,
            raise_exceptions: false,
        }
    }

    /// Propagate recoverable field errors instead of dropping the field
    pub fn raise_exceptions(mut self, raise: bool) -> Self {
        self.raise_exceptions = raise;
        self
    }

    /// Build the predicates for normalised input, before the post-filter hook
    pub fn predicates(&self, data: &QueryData) -> Result<Vec<Predicate>, FilterError> {
        let mut predicates = Vec::new();

        for (name, field) in self.definition.fields().iter() {
            let raw = match (data.get(name), field.default()) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    trace!(field = name, "field absent without default, skipping");
                    continue;
                }
            };

            match field.filter(raw) {
                Ok(predicate) => {
                    trace!(field = name, ?predicate, "built predicate");
                    predicates.push(predicate);
                }
                Err(err) if !self.raise_exceptions && err.is_suppressible() => {
                    debug!(field = name, error = %err, "dropping field predicate");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(predicates)
    }

    /// Restrict the queryable with the predicates built from `input`
    pub fn filter(self, input: impl Into<FilterInput>) -> Result<Q, FilterError> {
        let data = input.into().normalize()?;
        let predicates = self.predicates(&data)?;
        let predicates = self.definition.post_filter(&data, predicates);

        if predicates.is_empty() {
            return Ok(self.query);
        }
        debug!(count = predicates.len(), "applying predicates");
        Ok(self.query.filter(predicates))
    }
}
