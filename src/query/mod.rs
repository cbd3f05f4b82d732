//! Queryable backends
//!
//! The filter core only needs a way to conjoin predicates onto a query. Two
//! backends are provided: [`MemoryQuery`] evaluates predicates against rows held in
//! memory and [`SelectQuery`] renders a parameterised SQL statement.

mod memory;
mod sql;

pub use memory::{MemoryQuery, Row};
pub use sql::SelectQuery;

use crate::predicate::Predicate;

/// A not-yet-executed data request that can be narrowed by predicates
pub trait Queryable: Sized {
    /// Return a new queryable restricted by the conjunction of `predicates`
    fn filter(self, predicates: Vec<Predicate>) -> Self;
}
