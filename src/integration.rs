// Copyright 2025 Cowboy AI, LLC.

//! Forwarding of company events to other services
//!
//! The domain never talks to a broker directly. [`PublishingHandler`] turns
//! dispatched events into JSON integration messages and hands them to an
//! [`IntegrationEventPublisher`] supplied by the hosting application.

use crate::event_handler::EventHandler;
use crate::events::{CompanyEvent, DomainEvent};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Queue integration messages go to unless configured otherwise
pub const DEFAULT_INTEGRATION_QUEUE: &str = "integration_event_queue_new";

/// Outbound port to a message bus
#[async_trait]
pub trait IntegrationEventPublisher: Send + Sync {
    /// Publish `payload` on `queue`
    async fn publish(&self, queue: &str, payload: serde_json::Value) -> anyhow::Result<()>;
}

/// Event handler that forwards every event it receives to a publisher
pub struct PublishingHandler<P: ?Sized> {
    publisher: Arc<P>,
    queue: String,
}

impl<P: IntegrationEventPublisher + ?Sized> PublishingHandler<P> {
    /// Forward to `publisher` on the default queue
    pub fn new(publisher: Arc<P>) -> Self {
        Self::with_queue(publisher, DEFAULT_INTEGRATION_QUEUE)
    }

    /// Forward to `publisher` on `queue`
    pub fn with_queue(publisher: Arc<P>, queue: impl Into<String>) -> Self {
        Self {
            publisher,
            queue: queue.into(),
        }
    }

    /// Integration message for `event`
    pub fn message(event: &CompanyEvent) -> crate::DomainResult<serde_json::Value> {
        Ok(json!({
            "event_type": event.event_type(),
            "version": event.version(),
            "aggregate_id": event.aggregate_id(),
            "event": event.to_json()?,
        }))
    }
}

#[async_trait]
impl<P: IntegrationEventPublisher + ?Sized> EventHandler for PublishingHandler<P> {
    fn name(&self) -> &str {
        "integration-publisher"
    }

    async fn handle(&self, event: &CompanyEvent, cancel: &CancellationToken) -> anyhow::Result<()> {
        if cancel.is_cancelled() {
            anyhow::bail!("cancelled before publishing {}", event.kind());
        }
        let message = Self::message(event)?;
        self.publisher.publish(&self.queue, message).await
    }
}
