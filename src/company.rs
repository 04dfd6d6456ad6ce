// Copyright 2025 Cowboy AI, LLC.

//! The company aggregate
//!
//! A company owns a name and the membership of its tags. Membership is keyed
//! by tag name: the collection keeps insertion order but never holds two tags
//! with the same name. Every membership change enqueues a [`CompanyEvent`]
//! that stays pending until the unit of work drains it with
//! [`Company::take_events`] after the aggregate has been saved.
//!
//! ```rust
//! use company_domain::{Company, Tag};
//!
//! let mut acme = Company::create("Acme").unwrap();
//! acme.add_tag(Tag::new("fintech").unwrap());
//! acme.add_tag(Tag::new("fintech").unwrap());
//!
//! assert_eq!(acme.tag_names(), vec!["fintech"]);
//! assert_eq!(acme.take_events().len(), 1);
//! ```

use crate::entity::{AggregateRoot, AuditInfo, CompanyMarker, EntityId};
use crate::errors::{DomainError, DomainResult};
use crate::events::{CompanyEvent, TagAdded, TagRemoved};
use crate::tag::Tag;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Longest company name accepted
pub const COMPANY_NAME_MAX_LEN: usize = 255;

/// Identity of a company
pub type CompanyId = EntityId<CompanyMarker>;

/// Company aggregate root
///
/// Deserialization goes through the same checks as [`Company::hydrate`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "CompanyRecord")]
pub struct Company {
    id: CompanyId,
    name: String,
    tags: Vec<Tag>,
    version: u64,
    audit: AuditInfo,
    #[serde(skip)]
    #[schemars(skip)]
    pending_events: Vec<CompanyEvent>,
}

impl Company {
    /// Create a company with no tags
    ///
    /// Fails with a validation error when the name is empty or longer than
    /// [`COMPANY_NAME_MAX_LEN`] characters.
    pub fn create(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        validate_company_name(&name)?;
        Ok(Self {
            id: CompanyId::new(),
            name,
            tags: Vec::new(),
            version: 0,
            audit: AuditInfo::default(),
            pending_events: Vec::new(),
        })
    }

    /// Rebuild a company from stored state; no events are raised
    ///
    /// Fails with a validation error when the stored name is invalid or two
    /// stored tags share a name.
    pub fn hydrate(
        id: CompanyId,
        name: impl Into<String>,
        tags: Vec<Tag>,
        version: u64,
        audit: AuditInfo,
    ) -> DomainResult<Self> {
        let name = name.into();
        validate_company_name(&name)?;

        let mut seen = HashSet::with_capacity(tags.len());
        if let Some(duplicate) = tags.iter().find(|t| !seen.insert(t.name())) {
            return Err(DomainError::ValidationError(format!(
                "Company {id} holds tag '{}' more than once",
                duplicate.name()
            )));
        }

        Ok(Self {
            id,
            name,
            tags,
            version,
            audit,
            pending_events: Vec::new(),
        })
    }

    /// Current name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Tag names in insertion order
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(Tag::name).collect()
    }

    /// Whether a tag with this name is attached
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name() == name)
    }

    /// Audit trail
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Attach a tag unless one with the same name is already attached
    ///
    /// Returns whether the tag was added. A duplicate name is a silent no-op
    /// and raises no event.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.has_tag(tag.name()) {
            debug!(company_id = %self.id, tag = tag.name(), "tag already attached");
            return false;
        }

        debug!(company_id = %self.id, tag = tag.name(), "attaching tag");
        let event = TagAdded {
            company_id: self.id,
            company_name: self.name.clone(),
            tag: tag.clone(),
            occurred_at: Utc::now(),
        };
        self.tags.push(tag);
        self.pending_events.push(event.into());
        true
    }

    /// Attach each tag in order
    ///
    /// Not atomic: every tag accepted before a later one is rejected stays
    /// attached. Returns how many tags were actually added.
    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = Tag>) -> usize {
        let mut added = 0;
        for tag in tags {
            if self.add_tag(tag) {
                added += 1;
            }
        }
        added
    }

    /// Rename the company
    ///
    /// Same validation as [`Company::create`]. Renames are not observable
    /// to event handlers.
    pub fn update_name(&mut self, new_name: impl Into<String>) -> DomainResult<()> {
        let new_name = new_name.into();
        validate_company_name(&new_name)?;
        debug!(company_id = %self.id, from = %self.name, to = %new_name, "renaming company");
        self.name = new_name;
        Ok(())
    }

    /// Detach the first tag with this name
    ///
    /// Returns the removed tag, or `None` (and raises nothing) when no tag
    /// with that name is attached.
    pub fn remove_tag(&mut self, tag_name: &str) -> Option<Tag> {
        let position = self.tags.iter().position(|t| t.name() == tag_name)?;
        let tag = self.tags.remove(position);

        debug!(company_id = %self.id, tag = tag_name, "detaching tag");
        let event = TagRemoved {
            company_id: self.id,
            company_name: self.name.clone(),
            tag: tag.clone(),
            occurred_at: Utc::now(),
        };
        self.pending_events.push(event.into());
        Some(tag)
    }

    /// Detach every tag, one event per tag
    ///
    /// Returns the number of tags removed.
    pub fn remove_tags(&mut self) -> usize {
        if self.tags.is_empty() {
            return 0;
        }

        let names: Vec<String> = self.tags.iter().map(|t| t.name().to_string()).collect();
        names
            .iter()
            .filter_map(|name| self.remove_tag(name))
            .count()
    }

    /// Events raised since the last drain, oldest first
    pub fn pending_events(&self) -> &[CompanyEvent] {
        &self.pending_events
    }

    /// Drain the pending events
    ///
    /// Call only once the aggregate has been saved; a second call returns an
    /// empty list.
    pub fn take_events(&mut self) -> Vec<CompanyEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

/// Wire shape of a stored company, checked on the way in
#[derive(Deserialize, JsonSchema)]
struct CompanyRecord {
    id: CompanyId,
    name: String,
    tags: Vec<Tag>,
    version: u64,
    audit: AuditInfo,
}

impl TryFrom<CompanyRecord> for Company {
    type Error = DomainError;

    fn try_from(record: CompanyRecord) -> DomainResult<Self> {
        Self::hydrate(record.id, record.name, record.tags, record.version, record.audit)
    }
}

fn validate_company_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::validation("Company name must not be empty"));
    }
    let len = name.chars().count();
    if len > COMPANY_NAME_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Company name must be at most {COMPANY_NAME_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

impl AggregateRoot for Company {
    type Id = CompanyId;

    const TYPE_NAME: &'static str = "Company";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn snapshot(&self) -> Self {
        Self {
            pending_events: Vec::new(),
            ..self.clone()
        }
    }
}
