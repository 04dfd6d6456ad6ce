// Copyright 2025 Cowboy AI, LLC.

//! In-memory repository
//!
//! Reference implementation of [`Repository`] used by tests and by
//! single-process deployments. Aggregates are kept in insertion order and
//! stored as snapshots, so pending events never leak back out of the store.

use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::persistence::repository::{ReadRepository, Repository};
use crate::specification::{SingleResultSpecification, Specification};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Repository backed by an ordered in-memory map
pub struct InMemoryRepository<A: AggregateRoot> {
    storage: Arc<RwLock<IndexMap<A::Id, A>>>,
}

impl<A: AggregateRoot> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Number of stored aggregates
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }

    /// Insert a record as-is, bypassing every uniqueness rule
    ///
    /// For seeding a store that mirrors data whose invariants were broken
    /// upstream, e.g. to exercise integrity error handling.
    pub async fn seed(&self, aggregate: A) {
        self.storage
            .write()
            .await
            .insert(aggregate.id(), aggregate.snapshot());
    }
}

fn ensure_natural_key_free<A: AggregateRoot>(
    storage: &IndexMap<A::Id, A>,
    aggregate: &A,
) -> DomainResult<()> {
    let Some(key) = aggregate.natural_key() else {
        return Ok(());
    };
    let taken = storage
        .values()
        .any(|other| other.id() != aggregate.id() && other.natural_key() == Some(key));
    if taken {
        return Err(DomainError::AlreadyExists {
            entity_type: A::TYPE_NAME.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl<A> ReadRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Send + Sync + 'static,
{
    async fn get_by_id(&self, id: A::Id) -> DomainResult<A> {
        self.storage
            .read()
            .await
            .get(&id)
            .map(A::snapshot)
            .ok_or_else(|| DomainError::not_found(A::TYPE_NAME, format!("id = {id}")))
    }

    async fn find_one(&self, spec: &dyn SingleResultSpecification<A>) -> DomainResult<A> {
        let storage = self.storage.read().await;
        let mut matches = storage.values().filter(|a| spec.is_satisfied_by(a));

        let Some(first) = matches.next() else {
            debug!(aggregate = A::TYPE_NAME, spec = spec.name(), "no match");
            return Err(DomainError::not_found(A::TYPE_NAME, spec.criteria().to_string()));
        };

        let extra = matches.count();
        if extra > 0 {
            error!(
                aggregate = A::TYPE_NAME,
                spec = spec.name(),
                criteria = %spec.criteria(),
                matches = extra + 1,
                "single-result specification matched several records"
            );
            return Err(DomainError::IntegrityError {
                entity_type: A::TYPE_NAME.to_string(),
                specification: spec.name().to_string(),
                matches: extra + 1,
            });
        }

        Ok(first.snapshot())
    }

    async fn list(&self, spec: &dyn Specification<A>) -> DomainResult<Vec<A>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|a| spec.is_satisfied_by(a))
            .map(A::snapshot)
            .collect())
    }

    async fn count(&self, spec: &dyn Specification<A>) -> DomainResult<usize> {
        let storage = self.storage.read().await;
        Ok(storage.values().filter(|a| spec.is_satisfied_by(a)).count())
    }
}

#[async_trait]
impl<A> Repository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Send + Sync + 'static,
{
    async fn add(&self, aggregate: &mut A) -> DomainResult<()> {
        let mut storage = self.storage.write().await;
        let id = aggregate.id();
        if storage.contains_key(&id) {
            return Err(DomainError::AlreadyExists {
                entity_type: A::TYPE_NAME.to_string(),
                key: id.to_string(),
            });
        }
        ensure_natural_key_free(&storage, aggregate)?;

        aggregate.increment_version();
        storage.insert(id, aggregate.snapshot());
        debug!(aggregate = A::TYPE_NAME, %id, version = aggregate.version(), "added");
        Ok(())
    }

    async fn update(&self, aggregate: &mut A) -> DomainResult<()> {
        let mut storage = self.storage.write().await;
        let id = aggregate.id();
        let stored_version = storage
            .get(&id)
            .map(A::version)
            .ok_or_else(|| DomainError::not_found(A::TYPE_NAME, format!("id = {id}")))?;

        if stored_version != aggregate.version() {
            return Err(DomainError::ConcurrencyConflict {
                expected: aggregate.version(),
                actual: stored_version,
            });
        }
        ensure_natural_key_free(&storage, aggregate)?;

        aggregate.increment_version();
        storage.insert(id, aggregate.snapshot());
        debug!(aggregate = A::TYPE_NAME, %id, version = aggregate.version(), "updated");
        Ok(())
    }

    async fn delete(&self, aggregate: &A) -> DomainResult<()> {
        let id = aggregate.id();
        if self.storage.write().await.shift_remove(&id).is_none() {
            return Err(DomainError::not_found(A::TYPE_NAME, format!("id = {id}")));
        }
        debug!(aggregate = A::TYPE_NAME, %id, "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{AllCompanies, CompanyByName, CompanyHasTag, TagByName};
    use crate::{Company, Tag};

    #[tokio::test]
    async fn add_then_get_preserves_tags() {
        let repo = InMemoryRepository::<Company>::new();
        let mut acme = Company::create("Acme").unwrap();
        acme.add_tags(vec![Tag::new("a").unwrap(), Tag::new("b").unwrap()]);

        repo.add(&mut acme).await.unwrap();
        let loaded = repo.get_by_id(acme.id()).await.unwrap();

        assert_eq!(loaded.tag_names(), vec!["a", "b"]);
        assert_eq!(loaded.version(), 1);
        assert!(loaded.pending_events().is_empty());
    }

    #[tokio::test]
    async fn find_one_reports_missing_and_duplicates() {
        let repo = InMemoryRepository::<Company>::new();
        let err = repo.find_one(&CompanyByName::new("Acme")).await.unwrap_err();
        assert!(err.is_not_found());

        repo.seed(Company::create("Acme").unwrap()).await;
        repo.seed(Company::create("Acme").unwrap()).await;

        let err = repo.find_one(&CompanyByName::new("Acme")).await.unwrap_err();
        assert!(err.is_integrity_error());
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let repo = InMemoryRepository::<Company>::new();
        let mut acme = Company::create("Acme").unwrap();
        repo.add(&mut acme).await.unwrap();

        let mut first = repo.get_by_id(acme.id()).await.unwrap();
        let mut second = repo.get_by_id(acme.id()).await.unwrap();

        first.update_name("Acme One").unwrap();
        repo.update(&mut first).await.unwrap();

        second.update_name("Acme Two").unwrap();
        let err = repo.update(&mut second).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ConcurrencyConflict {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn tag_names_are_unique_in_the_catalog() {
        let repo = InMemoryRepository::<Tag>::new();
        repo.add(&mut Tag::new("fintech").unwrap()).await.unwrap();

        let err = repo.add(&mut Tag::new("fintech").unwrap()).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists { .. }));
        assert!(repo.any(&TagByName::new("fintech")).await.unwrap());
    }

    #[tokio::test]
    async fn list_and_count_follow_insertion_order() {
        let repo = InMemoryRepository::<Company>::new();
        for (name, tag) in [("Acme", "x"), ("Globex", "y"), ("Initech", "x")] {
            let mut company = Company::create(name).unwrap();
            company.add_tag(Tag::new(tag).unwrap());
            repo.add(&mut company).await.unwrap();
        }

        let tagged: Vec<String> = repo
            .list(&CompanyHasTag::new("x"))
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(tagged, vec!["Acme", "Initech"]);
        assert_eq!(repo.count(&AllCompanies).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = InMemoryRepository::<Company>::new();
        let acme = Company::create("Acme").unwrap();
        assert!(repo.delete(&acme).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let repo = InMemoryRepository::<Company>::new();
        let mut acme = Company::create("Acme").unwrap();
        let mut globex = Company::create("Globex").unwrap();
        repo.add(&mut acme).await.unwrap();
        repo.add(&mut globex).await.unwrap();

        repo.delete(&acme).await.unwrap();

        assert!(repo.get_by_id(acme.id()).await.unwrap_err().is_not_found());
        assert_eq!(repo.get_by_id(globex.id()).await.unwrap().name(), "Globex");
        assert!(repo.delete(&acme).await.unwrap_err().is_not_found());
    }
}
