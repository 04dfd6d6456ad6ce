// Copyright 2025 Cowboy AI, LLC.

//! Repository contracts
//!
//! Repositories are the boundary between the domain and whatever store backs
//! it. They evaluate specifications, keep aggregates intact (a company is
//! stored with its whole tag collection), and own optimistic concurrency:
//! every successful write bumps the aggregate's version, and an update whose
//! version no longer matches the stored one is rejected.

use crate::entity::AggregateRoot;
use crate::errors::DomainResult;
use crate::specification::{SingleResultSpecification, Specification};
use async_trait::async_trait;

/// Read side of a repository
#[async_trait]
pub trait ReadRepository<A>: Send + Sync
where
    A: AggregateRoot + Send + Sync,
{
    /// Load by identity, `NotFound` when absent
    async fn get_by_id(&self, id: A::Id) -> DomainResult<A>;

    /// Load the single aggregate matching `spec`
    ///
    /// Zero matches is `NotFound`; more than one is `IntegrityError`, never
    /// an arbitrary pick.
    async fn find_one(&self, spec: &dyn SingleResultSpecification<A>) -> DomainResult<A>;

    /// All aggregates matching `spec`, in store order
    async fn list(&self, spec: &dyn Specification<A>) -> DomainResult<Vec<A>>;

    /// Number of aggregates matching `spec`
    async fn count(&self, spec: &dyn Specification<A>) -> DomainResult<usize>;

    /// Whether anything matches `spec`
    async fn any(&self, spec: &dyn Specification<A>) -> DomainResult<bool> {
        Ok(self.count(spec).await? > 0)
    }
}

/// Read-write repository
#[async_trait]
pub trait Repository<A>: ReadRepository<A>
where
    A: AggregateRoot + Send + Sync,
{
    /// Store a new aggregate and bump its version
    async fn add(&self, aggregate: &mut A) -> DomainResult<()>;

    /// Store changes to an existing aggregate and bump its version
    ///
    /// Fails with `ConcurrencyConflict` when the stored version differs from
    /// the aggregate's.
    async fn update(&self, aggregate: &mut A) -> DomainResult<()>;

    /// Remove an aggregate
    ///
    /// Only the aggregate's own record goes away; entities it merely
    /// references, such as catalog tags, are left alone.
    async fn delete(&self, aggregate: &A) -> DomainResult<()>;
}
