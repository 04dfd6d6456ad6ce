// Copyright 2025 Cowboy AI, LLC.

//! Company application service
//!
//! Each mutating operation is one unit of work: load the aggregate through a
//! specification or its identity, mutate it, save it, and only then drain
//! and dispatch its events. When the save fails nothing is dispatched; when
//! dispatch fails the save stands and the delivery error is returned.

use crate::company::{Company, CompanyId};
use crate::config::CompanyServiceConfig;
use crate::dispatcher::DomainEventDispatcher;
use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::persistence::Repository;
use crate::specification::{CompanyByName, Specification, TagByName};
use crate::tag::Tag;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Orchestrates company use cases over the repositories and the dispatcher
pub struct CompanyService<C, T> {
    companies: Arc<C>,
    tags: Arc<T>,
    dispatcher: Arc<DomainEventDispatcher>,
    config: CompanyServiceConfig,
    shutdown: CancellationToken,
}

impl<C, T> CompanyService<C, T>
where
    C: Repository<Company>,
    T: Repository<Tag>,
{
    /// Create a service
    pub fn new(
        companies: Arc<C>,
        tags: Arc<T>,
        dispatcher: Arc<DomainEventDispatcher>,
        config: CompanyServiceConfig,
    ) -> Self {
        Self {
            companies,
            tags,
            dispatcher,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Stop dispatching to further handlers once `token` fires
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Create and store a new company
    #[instrument(skip(self))]
    pub async fn create_company(&self, name: &str) -> DomainResult<Company> {
        let mut company = Company::create(name)?;
        self.ensure_name_free(&company).await?;

        *company.audit_mut() = crate::AuditInfo::created_by(self.config.audit_user.as_str());
        self.companies.add(&mut company).await?;
        self.publish(&mut company).await?;

        info!(company_id = %company.id(), "company created");
        Ok(company)
    }

    /// Load a company by identity
    pub async fn get_company(&self, id: CompanyId) -> DomainResult<Company> {
        self.companies.get_by_id(id).await
    }

    /// Load the company with this exact name
    pub async fn get_company_by_name(&self, name: &str) -> DomainResult<Company> {
        self.companies.find_one(&CompanyByName::new(name)).await
    }

    /// Companies matching `spec`
    pub async fn list_companies(&self, spec: &dyn Specification<Company>) -> DomainResult<Vec<Company>> {
        self.companies.list(spec).await
    }

    /// Rename a company; raises no event
    #[instrument(skip(self))]
    pub async fn rename_company(&self, id: CompanyId, new_name: &str) -> DomainResult<Company> {
        let mut company = self.companies.get_by_id(id).await?;
        company.update_name(new_name)?;
        self.ensure_name_free(&company).await?;
        self.commit(company).await
    }

    /// Attach tags by name, creating catalog entries for unknown names
    #[instrument(skip(self, names))]
    pub async fn add_tags<S: AsRef<str>>(&self, id: CompanyId, names: &[S]) -> DomainResult<Company> {
        let mut company = self.companies.get_by_id(id).await?;
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            resolved.push(self.resolve_tag(name.as_ref()).await?);
        }
        company.add_tags(resolved);
        self.commit(company).await
    }

    /// Detach one tag by name; the catalog entry is kept
    #[instrument(skip(self))]
    pub async fn remove_tag(&self, id: CompanyId, tag_name: &str) -> DomainResult<Company> {
        let mut company = self.companies.get_by_id(id).await?;
        if company.remove_tag(tag_name).is_none() {
            debug!(company_id = %id, tag = tag_name, "tag not attached, nothing to save");
            return Ok(company);
        }
        self.commit(company).await
    }

    /// Detach every tag
    #[instrument(skip(self))]
    pub async fn remove_all_tags(&self, id: CompanyId) -> DomainResult<Company> {
        let mut company = self.companies.get_by_id(id).await?;
        if company.remove_tags() == 0 {
            return Ok(company);
        }
        self.commit(company).await
    }

    /// Delete a company; its tags stay in the catalog
    #[instrument(skip(self))]
    pub async fn delete_company(&self, id: CompanyId) -> DomainResult<()> {
        let company = self.companies.get_by_id(id).await?;
        self.companies.delete(&company).await?;
        info!(company_id = %id, "company deleted");
        Ok(())
    }

    /// Best-effort: the lookup and the following write are not atomic, so
    /// two concurrent callers can still both claim a name. Only a store-level
    /// unique constraint closes that gap.
    async fn ensure_name_free(&self, company: &Company) -> DomainResult<()> {
        if !self.config.reject_duplicate_names {
            return Ok(());
        }
        let spec = CompanyByName::new(company.name());
        let taken = self
            .companies
            .list(&spec)
            .await?
            .iter()
            .any(|other| other.id() != company.id());
        if taken {
            return Err(DomainError::AlreadyExists {
                entity_type: Company::TYPE_NAME.to_string(),
                key: company.name().to_string(),
            });
        }
        Ok(())
    }

    async fn resolve_tag(&self, name: &str) -> DomainResult<Tag> {
        match self.tags.find_one(&TagByName::new(name)).await {
            Ok(tag) => Ok(tag),
            Err(e) if e.is_not_found() => {
                let mut tag = Tag::new(name)?;
                *tag.audit_mut() = crate::AuditInfo::created_by(self.config.audit_user.as_str());
                match self.tags.add(&mut tag).await {
                    Ok(()) => {
                        info!(tag = name, "tag added to catalog");
                        Ok(tag)
                    }
                    // another caller created it since the lookup
                    Err(DomainError::AlreadyExists { .. }) => {
                        debug!(tag = name, "tag created concurrently, re-reading catalog");
                        self.tags.find_one(&TagByName::new(name)).await
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn commit(&self, mut company: Company) -> DomainResult<Company> {
        company.audit_mut().touch(self.config.audit_user.as_str());
        self.companies.update(&mut company).await?;
        self.publish(&mut company).await?;
        Ok(company)
    }

    async fn publish(&self, company: &mut Company) -> DomainResult<()> {
        let events = company.take_events();
        if events.is_empty() {
            return Ok(());
        }
        self.dispatcher
            .dispatch_with_cancel(events, &self.shutdown)
            .await
            .map(|_| ())
    }
}
