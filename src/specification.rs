// Copyright 2025 Cowboy AI, LLC.

//! Query specifications
//!
//! A specification is a named, reusable predicate over an aggregate. It is
//! built from the criteria values it needs and never changes afterwards, so
//! evaluating it twice gives the same answer. Repositories either evaluate
//! [`Specification::is_satisfied_by`] directly (in-memory stores) or
//! translate [`Specification::criteria`] into their own filter language.
//!
//! Specifications that implement [`SingleResultSpecification`] promise the
//! caller at most one match; a repository that finds more reports an
//! integrity error instead of picking one.

use crate::company::Company;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    /// Field equals the value, byte for byte
    Equals,
    /// Collection field contains an element equal to the value
    Contains,
}

/// One field condition of a specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name on the aggregate
    pub field: String,
    /// Comparison
    pub op: FilterOp,
    /// Value compared against
    pub value: serde_json::Value,
}

/// Store-neutral description of a specification, all filters joined by AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCriteria {
    /// Filter conditions
    pub filters: Vec<Filter>,
}

impl QueryCriteria {
    /// Create a new empty query criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn with_filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Append all filters of `other`
    pub fn merge(mut self, other: QueryCriteria) -> Self {
        self.filters.extend(other.filters);
        self
    }
}

impl fmt::Display for QueryCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("*");
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            let op = match filter.op {
                FilterOp::Equals => "=",
                FilterOp::Contains => "contains",
            };
            write!(f, "{} {} {}", filter.field, op, filter.value)?;
        }
        Ok(())
    }
}

/// Reusable query predicate over `T`
pub trait Specification<T>: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Whether `candidate` matches
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// Filters a store can translate into its own query language
    fn criteria(&self) -> QueryCriteria;
}

/// Marker for specifications that expect at most one match
pub trait SingleResultSpecification<T>: Specification<T> {}

/// Combinators available on every specification
pub trait SpecificationExt<T>: Specification<T> + Sized {
    /// Both specifications must match
    fn and<S: Specification<T>>(self, other: S) -> And<Self, S> {
        And {
            left: self,
            right: other,
        }
    }
}

impl<T, S: Specification<T>> SpecificationExt<T> for S {}

/// Conjunction of two specifications
#[derive(Debug, Clone)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<T, L, R> Specification<T> for And<L, R>
where
    L: Specification<T>,
    R: Specification<T>,
{
    fn name(&self) -> &'static str {
        "And"
    }

    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }

    fn criteria(&self) -> QueryCriteria {
        self.left.criteria().merge(self.right.criteria())
    }
}

/// Company whose name equals the given name exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyByName {
    name: String,
}

impl CompanyByName {
    /// Match companies named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Specification<Company> for CompanyByName {
    fn name(&self) -> &'static str {
        "CompanyByName"
    }

    fn is_satisfied_by(&self, candidate: &Company) -> bool {
        candidate.name() == self.name
    }

    fn criteria(&self) -> QueryCriteria {
        QueryCriteria::new().with_filter("name", FilterOp::Equals, self.name.clone())
    }
}

impl SingleResultSpecification<Company> for CompanyByName {}

/// Companies carrying a tag with the given name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyHasTag {
    tag_name: String,
}

impl CompanyHasTag {
    /// Match companies tagged `tag_name`
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }
}

impl Specification<Company> for CompanyHasTag {
    fn name(&self) -> &'static str {
        "CompanyHasTag"
    }

    fn is_satisfied_by(&self, candidate: &Company) -> bool {
        candidate.has_tag(&self.tag_name)
    }

    fn criteria(&self) -> QueryCriteria {
        QueryCriteria::new().with_filter("tags.name", FilterOp::Contains, self.tag_name.clone())
    }
}

/// Every company
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCompanies;

impl Specification<Company> for AllCompanies {
    fn name(&self) -> &'static str {
        "AllCompanies"
    }

    fn is_satisfied_by(&self, _candidate: &Company) -> bool {
        true
    }

    fn criteria(&self) -> QueryCriteria {
        QueryCriteria::new()
    }
}

/// Catalog tag with the given name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagByName {
    name: String,
}

impl TagByName {
    /// Match tags named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Specification<Tag> for TagByName {
    fn name(&self) -> &'static str {
        "TagByName"
    }

    fn is_satisfied_by(&self, candidate: &Tag) -> bool {
        candidate.name() == self.name
    }

    fn criteria(&self) -> QueryCriteria {
        QueryCriteria::new().with_filter("name", FilterOp::Equals, self.name.clone())
    }
}

impl SingleResultSpecification<Tag> for TagByName {}
