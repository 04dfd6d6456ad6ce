//! Handlers for company domain events

use crate::events::CompanyEvent;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Receives dispatched company events
///
/// Handlers run after the aggregate has been saved. A handler that fails
/// makes the whole dispatch fail, so handlers that forward to unreliable
/// infrastructure should decide for themselves what counts as an error.
/// Long running handlers should watch `cancel` and stop early when it fires.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in logs and delivery errors
    fn name(&self) -> &str;

    /// Handle one event
    async fn handle(&self, event: &CompanyEvent, cancel: &CancellationToken) -> anyhow::Result<()>;
}

type HandlerFn =
    Box<dyn Fn(CompanyEvent, CancellationToken) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// [`EventHandler`] backed by an async closure, see [`handler_fn`]
pub struct FnHandler {
    name: String,
    f: HandlerFn,
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

/// Wrap an async closure as an event handler
///
/// ```rust
/// use company_domain::{handler_fn, EventHandler};
///
/// let handler = handler_fn("audit-log", |event, _cancel| async move {
///     println!("{}", event.kind());
///     anyhow::Ok(())
/// });
/// assert_eq!(handler.name(), "audit-log");
/// ```
pub fn handler_fn<F, Fut>(name: impl Into<String>, f: F) -> FnHandler
where
    F: Fn(CompanyEvent, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    FnHandler {
        name: name.into(),
        f: Box::new(move |event, cancel| f(event, cancel).boxed()),
    }
}

#[async_trait]
impl EventHandler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &CompanyEvent, cancel: &CancellationToken) -> anyhow::Result<()> {
        (self.f)(event.clone(), cancel.clone()).await
    }
}
