//! # Company Domain
//!
//! Domain core of the company service: the company aggregate and its tags,
//! the domain events raised when tag membership changes, the dispatcher that
//! delivers those events after a save, and the query specifications used to
//! look companies up.
//!
//! This crate provides:
//! - **Company**: aggregate root owning a name and a set of tags keyed by name
//! - **Tag**: named label shared between companies through a catalog
//! - **Domain Events**: `TagAdded` / `TagRemoved`, drained once after commit
//! - **Dispatcher**: routes drained events to handlers registered per kind
//! - **Specifications**: reusable predicates such as `CompanyByName`
//! - **Repositories**: specification-driven, optimistically versioned stores
//! - **CompanyService**: the unit of work tying the pieces together
//!
//! ## Unit of work
//!
//! ```rust
//! use company_domain::{
//!     AggregateRoot, Company, CompanyService, CompanyServiceConfig, DomainEventDispatcher,
//!     EventKind, InMemoryRepository, Tag, handler_fn,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let dispatcher = DomainEventDispatcher::default().with_handler(
//!     EventKind::TagAdded,
//!     handler_fn("log", |event, _cancel| async move {
//!         println!("{} on {}", event.kind(), event.tag().name());
//!         anyhow::Ok(())
//!     }),
//! );
//!
//! let service = CompanyService::new(
//!     Arc::new(InMemoryRepository::<Company>::new()),
//!     Arc::new(InMemoryRepository::<Tag>::new()),
//!     Arc::new(dispatcher),
//!     CompanyServiceConfig::default(),
//! );
//!
//! let acme = service.create_company("Acme").await.unwrap();
//! let acme = service.add_tags(acme.id(), &["fintech", "fintech"]).await.unwrap();
//! assert_eq!(acme.tag_names(), vec!["fintech"]);
//! # });
//! ```

#![warn(missing_docs)]

mod company;
mod config;
mod dispatcher;
mod entity;
mod errors;
mod event_handler;
mod events;
mod service;
mod tag;
pub mod integration;
pub mod persistence;
pub mod specification;

pub use company::{Company, CompanyId, COMPANY_NAME_MAX_LEN};
pub use config::{CompanyServiceConfig, DispatcherConfig};
pub use dispatcher::{DispatchReport, DomainEventDispatcher};
pub use entity::{AggregateRoot, AuditInfo, EntityId};
pub use errors::{DomainError, DomainResult};
pub use event_handler::{handler_fn, EventHandler, FnHandler};
pub use events::{CompanyEvent, DomainEvent, EventKind, TagAdded, TagRemoved};
pub use integration::{IntegrationEventPublisher, PublishingHandler};
pub use persistence::{InMemoryRepository, ReadRepository, Repository};
pub use service::CompanyService;
pub use specification::{
    AllCompanies, CompanyByName, CompanyHasTag, QueryCriteria, SingleResultSpecification,
    Specification, SpecificationExt, TagByName,
};
pub use tag::{Tag, TagId, TAG_NAME_MAX_LEN};

// Re-export common marker types
pub mod markers {
    //! Marker types for phantom type parameters
    pub use crate::entity::{CompanyMarker, TagMarker};
}

pub mod env {
    //! Environment variable names read by the configuration types
    pub use crate::config::{ENV_AUDIT_USER, ENV_DISPATCH_TIMEOUT_MS, ENV_REJECT_DUPLICATE_NAMES};
}
