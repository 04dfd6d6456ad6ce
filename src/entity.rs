//! Entity identity, audit trail and the aggregate root contract

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// The phantom type parameter keeps company IDs and tag IDs from being
/// mixed up at compile time.
///
/// # Examples
///
/// ```rust
/// use company_domain::{EntityId, markers::{CompanyMarker, TagMarker}};
///
/// let company_id = EntityId::<CompanyMarker>::new();
/// let tag_id = EntityId::<TagMarker>::new();
///
/// // let _: EntityId<CompanyMarker> = tag_id; // does not compile
/// assert_ne!(company_id.as_uuid(), tag_id.as_uuid());
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

// Manual impls so the marker type does not need to implement these traits.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> std::hash::Hash for EntityId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.id).finish()
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JsonSchema for EntityId<T> {
    fn schema_name() -> String {
        "EntityId".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Uuid as JsonSchema>::json_schema(gen)
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

/// Who created and last modified a record, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditInfo {
    /// User that created the record
    pub created_by: String,
    /// Creation timestamp
    pub created_on: DateTime<Utc>,
    /// User that last modified the record
    pub modified_by: String,
    /// Last modification timestamp
    pub modified_on: DateTime<Utc>,
}

impl AuditInfo {
    /// Audit trail for a record created now by `user`
    pub fn created_by(user: impl Into<String>) -> Self {
        let user = user.into();
        let now = Utc::now();
        Self {
            created_by: user.clone(),
            created_on: now,
            modified_by: user,
            modified_on: now,
        }
    }

    /// Record a modification by `user`
    pub fn touch(&mut self, user: impl Into<String>) {
        self.modified_by = user.into();
        self.modified_on = Utc::now();
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::created_by("")
    }
}

/// Contract shared by everything a repository stores
///
/// Aggregate roots are the entry points for modifying aggregates.
/// All changes to entities within an aggregate must go through the root.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + std::hash::Hash + fmt::Display + Send + Sync;

    /// Name used in errors and log fields
    const TYPE_NAME: &'static str;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);

    /// Key that must be unique across the store, if any
    fn natural_key(&self) -> Option<&str> {
        None
    }

    /// Mutable access to the audit trail
    fn audit_mut(&mut self) -> &mut AuditInfo;

    /// Copy of the persistent state, without transient data such as
    /// pending events
    fn snapshot(&self) -> Self;
}

/// Marker for company identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyMarker;

/// Marker for tag identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagMarker;

#[cfg(test)]
mod tests {
    use super::*;

    /// Test EntityId creation and uniqueness
    ///
    /// ```mermaid
    /// graph LR
    ///     A[EntityId::new] -->|UUID v4| B[Unique ID]
    ///     C[EntityId::new] -->|UUID v4| D[Different ID]
    ///     B -->|Not Equal| D
    /// ```
    #[test]
    fn test_entity_id_new() {
        let id1 = EntityId::<CompanyMarker>::new();
        let id2 = EntityId::<CompanyMarker>::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_uuid().is_nil());
    }

    #[test]
    fn test_entity_id_display_and_serde() {
        let uuid = Uuid::new_v4();
        let id = EntityId::<TagMarker>::from_uuid(uuid);

        assert_eq!(format!("{id}"), format!("{uuid}"));

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
        let back: EntityId<TagMarker> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_audit_touch_keeps_creation() {
        let mut audit = AuditInfo::created_by("alice");
        let created_on = audit.created_on;

        audit.touch("bob");

        assert_eq!(audit.created_by, "alice");
        assert_eq!(audit.created_on, created_on);
        assert_eq!(audit.modified_by, "bob");
        assert!(audit.modified_on >= created_on);
    }
}
