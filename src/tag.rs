//! Tags: named labels attached to companies

use crate::entity::{AggregateRoot, AuditInfo, EntityId, TagMarker};
use crate::errors::{DomainError, DomainResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Longest tag name the catalog accepts
pub const TAG_NAME_MAX_LEN: usize = 20;

/// Identity of a tag record
pub type TagId = EntityId<TagMarker>;

/// A named label
///
/// Tags are shared between companies. Two tag records carrying the same name
/// count as the same membership on a [`Company`](crate::Company); the catalog
/// repository keeps names unique.
///
/// ```rust
/// use company_domain::Tag;
///
/// let tag = Tag::new("fintech").unwrap();
/// assert_eq!(tag.name(), "fintech");
/// assert!(Tag::new("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "TagRecord")]
pub struct Tag {
    id: TagId,
    name: String,
    version: u64,
    audit: AuditInfo,
}

impl Tag {
    /// Create a tag, validating the name length
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        validate_tag_name(&name)?;
        Ok(Self {
            id: TagId::new(),
            name,
            version: 0,
            audit: AuditInfo::default(),
        })
    }

    /// Rebuild a tag from stored state, applying the same name rules as
    /// [`Tag::new`]
    pub fn hydrate(
        id: TagId,
        name: impl Into<String>,
        version: u64,
        audit: AuditInfo,
    ) -> DomainResult<Self> {
        let name = name.into();
        validate_tag_name(&name)?;
        Ok(Self {
            id,
            name,
            version,
            audit,
        })
    }

    /// The tag's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Audit trail
    pub fn audit(&self) -> &AuditInfo {
        &self.audit
    }
}

#[derive(Deserialize, JsonSchema)]
struct TagRecord {
    id: TagId,
    name: String,
    version: u64,
    audit: AuditInfo,
}

impl TryFrom<TagRecord> for Tag {
    type Error = DomainError;

    fn try_from(record: TagRecord) -> DomainResult<Self> {
        Self::hydrate(record.id, record.name, record.version, record.audit)
    }
}

fn validate_tag_name(name: &str) -> DomainResult<()> {
    let len = name.chars().count();
    if len == 0 {
        return Err(DomainError::validation("Tag name must not be empty"));
    }
    if len > TAG_NAME_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Tag name must be at most {TAG_NAME_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

impl AggregateRoot for Tag {
    type Id = TagId;

    const TYPE_NAME: &'static str = "Tag";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }

    fn snapshot(&self) -> Self {
        self.clone()
    }
}
