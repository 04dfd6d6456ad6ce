// Copyright 2025 Cowboy AI, LLC.

//! Delivery of drained domain events to registered handlers
//!
//! Delivery is best-effort and not transactional with persistence: the
//! aggregate is already saved when events are dispatched, a failing handler
//! stops the dispatch and is reported to the caller, and handlers that ran
//! before the failure are neither retried nor undone. Each call delivers an
//! event to a handler at most once.

use crate::config::DispatcherConfig;
use crate::errors::{DomainError, DomainResult};
use crate::event_handler::EventHandler;
use crate::events::{CompanyEvent, EventKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a successful dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events delivered to all of their handlers
    pub events: usize,
    /// Individual handler invocations that completed
    pub deliveries: usize,
}

/// Routes company events to the handlers registered for their kind
///
/// Register handlers while wiring the application, then share the
/// dispatcher (usually behind an `Arc`); the registry is not changed after
/// startup.
pub struct DomainEventDispatcher {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
    config: DispatcherConfig,
}

impl Default for DomainEventDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl DomainEventDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            handlers: HashMap::new(),
            config,
        }
    }

    /// Register `handler` for events of `kind`
    ///
    /// Handlers for the same kind run in registration order.
    pub fn register(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        debug!(kind = %kind, handler = handler.name(), "registering event handler");
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_handler(mut self, kind: EventKind, handler: impl EventHandler + 'static) -> Self {
        self.register(kind, Arc::new(handler));
        self
    }

    /// Number of handlers registered for `kind`
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Dispatch configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Deliver `events` in order without a cancellation signal
    pub async fn dispatch(&self, events: Vec<CompanyEvent>) -> DomainResult<DispatchReport> {
        self.dispatch_with_cancel(events, &CancellationToken::new())
            .await
    }

    /// Deliver `events` in order, stopping before the next handler once
    /// `cancel` fires
    ///
    /// A handler already running is left to finish or to honour the token
    /// itself. On error, the `delivered` field of the returned error counts
    /// the events that reached all of their handlers.
    pub async fn dispatch_with_cancel(
        &self,
        events: Vec<CompanyEvent>,
        cancel: &CancellationToken,
    ) -> DomainResult<DispatchReport> {
        let mut report = DispatchReport::default();
        let total = events.len();

        for event in &events {
            let kind = event.kind();
            let handlers = self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[]);

            for handler in handlers {
                if cancel.is_cancelled() {
                    warn!(delivered = report.events, total, "event dispatch cancelled");
                    return Err(DomainError::DispatchCancelled {
                        delivered: report.events,
                    });
                }
                self.invoke(handler.as_ref(), event, cancel, report.events)
                    .await?;
                report.deliveries += 1;
            }

            report.events += 1;
        }

        info!(
            events = report.events,
            deliveries = report.deliveries,
            "dispatched company events"
        );
        Ok(report)
    }

    async fn invoke(
        &self,
        handler: &dyn EventHandler,
        event: &CompanyEvent,
        cancel: &CancellationToken,
        delivered: usize,
    ) -> DomainResult<()> {
        let kind = event.kind();
        debug!(kind = %kind, handler = handler.name(), company_id = %event.company_id(), "delivering event");

        let outcome = match self.config.handler_timeout() {
            Some(limit) => match tokio::time::timeout(limit, handler.handle(event, cancel)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(kind = %kind, handler = handler.name(), timeout_ms = self.config.handler_timeout_ms, "event handler timed out");
                    return Err(DomainError::DispatchTimeout {
                        handler: handler.name().to_string(),
                        event_kind: kind.to_string(),
                        timeout_ms: self.config.handler_timeout_ms,
                        delivered,
                    });
                }
            },
            None => handler.handle(event, cancel).await,
        };

        outcome.map_err(|e| {
            warn!(kind = %kind, handler = handler.name(), error = %e, "event handler failed");
            DomainError::DeliveryError {
                handler: handler.name().to_string(),
                event_kind: kind.to_string(),
                message: format!("{e:#}"),
                delivered,
            }
        })
    }
}
