// Copyright (c) 2025 - Cowboy AI, LLC.

//! Domain events raised by the company aggregate
//!
//! Events are inert records of a tag membership change. They live in the
//! aggregate's pending buffer until the unit of work drains them after a
//! successful save, and are never persisted.

use crate::company::CompanyId;
use crate::tag::Tag;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Base trait for all domain events
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}

/// A tag was attached to a company
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TagAdded {
    /// Company the tag was attached to
    pub company_id: CompanyId,
    /// Company name at the time of the change
    pub company_name: String,
    /// The attached tag
    pub tag: Tag,
    /// When the change happened
    pub occurred_at: DateTime<Utc>,
}

/// A tag was detached from a company
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TagRemoved {
    /// Company the tag was detached from
    pub company_id: CompanyId,
    /// Company name at the time of the change
    pub company_name: String,
    /// The detached tag
    pub tag: Tag,
    /// When the change happened
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for TagAdded {
    fn aggregate_id(&self) -> Uuid {
        *self.company_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        EventKind::TagAdded.as_str()
    }
}

impl DomainEvent for TagRemoved {
    fn aggregate_id(&self) -> Uuid {
        *self.company_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        EventKind::TagRemoved.as_str()
    }
}

/// Discriminant of [`CompanyEvent`], used to key handler registrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EventKind {
    /// See [`TagAdded`]
    TagAdded,
    /// See [`TagRemoved`]
    TagRemoved,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 2] = [EventKind::TagAdded, EventKind::TagRemoved];

    /// Stable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TagAdded => "TagAdded",
            EventKind::TagRemoved => "TagRemoved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every event the company aggregate can raise
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload")]
pub enum CompanyEvent {
    /// A tag was attached
    TagAdded(TagAdded),
    /// A tag was detached
    TagRemoved(TagRemoved),
}

impl CompanyEvent {
    /// The variant tag
    pub fn kind(&self) -> EventKind {
        match self {
            CompanyEvent::TagAdded(_) => EventKind::TagAdded,
            CompanyEvent::TagRemoved(_) => EventKind::TagRemoved,
        }
    }

    /// The company this event is about
    pub fn company_id(&self) -> CompanyId {
        match self {
            CompanyEvent::TagAdded(e) => e.company_id,
            CompanyEvent::TagRemoved(e) => e.company_id,
        }
    }

    /// The tag this event is about
    pub fn tag(&self) -> &Tag {
        match self {
            CompanyEvent::TagAdded(e) => &e.tag,
            CompanyEvent::TagRemoved(e) => &e.tag,
        }
    }

    /// Serialize for forwarding to a message bus
    pub fn to_json(&self) -> crate::DomainResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl DomainEvent for CompanyEvent {
    fn aggregate_id(&self) -> Uuid {
        *self.company_id().as_uuid()
    }

    fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }
}

impl From<TagAdded> for CompanyEvent {
    fn from(event: TagAdded) -> Self {
        CompanyEvent::TagAdded(event)
    }
}

impl From<TagRemoved> for CompanyEvent {
    fn from(event: TagRemoved) -> Self {
        CompanyEvent::TagRemoved(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(tag: &str) -> CompanyEvent {
        TagAdded {
            company_id: CompanyId::new(),
            company_name: "Acme".to_string(),
            tag: Tag::new(tag).unwrap(),
            occurred_at: Utc::now(),
        }
        .into()
    }

    #[test]
    fn kind_matches_variant() {
        let event = added("fintech");
        assert_eq!(event.kind(), EventKind::TagAdded);
        assert_eq!(event.event_type(), "TagAdded");
        assert_eq!(event.version(), "v1");
        assert_eq!(event.tag().name(), "fintech");
    }

    #[test]
    fn json_carries_type_tag() {
        let event = added("saas");
        let json = event.to_json().unwrap();

        assert_eq!(json["type"], "TagAdded");
        assert_eq!(json["payload"]["company_name"], "Acme");
        assert_eq!(json["payload"]["tag"]["name"], "saas");
        assert_eq!(
            json["payload"]["company_id"],
            serde_json::json!(event.aggregate_id().to_string())
        );
    }

    #[test]
    fn all_kinds_are_distinct() {
        assert_eq!(EventKind::ALL.len(), 2);
        assert_ne!(EventKind::ALL[0], EventKind::ALL[1]);
        assert_eq!(EventKind::TagRemoved.to_string(), "TagRemoved");
    }
}
