//! # Controller
//!
//! Drives managed resources through their lifecycle against the Management API.
//!
//! - `data`: per-resource state handed to the controllers
//! - `sink`: mapping between declared sink attributes and remote sinks
//! - `secrets`: hook secret reconciliation
//! - `log_stream` / `hook`: create, read, update and delete per resource
//! - `lifecycle`: decides which of those operations an apply needs

use crate::observability::metrics;
use crate::schema::ResourceSpec;
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::{info_span, Instrument};

pub mod data;
pub mod hook;
pub mod lifecycle;
pub mod log_stream;
pub mod secrets;
pub mod sink;

pub use data::ResourceData;
pub use hook::HookController;
pub use lifecycle::{apply, destroy, import, ApplyOutcome};
pub use log_stream::LogStreamController;

/// Create, read, update and delete for one kind of resource
///
/// Every operation takes the API handle explicitly. Mutating operations end
/// with a read so the resource state reflects what Auth0 stored.
#[async_trait]
pub trait ResourceController: Send + Sync {
    /// Declared configuration of the resource
    type Spec: ResourceSpec;
    /// Management API surface the controller needs
    type Api: ?Sized + Send + Sync;

    /// Create the resource and adopt the ID Auth0 assigns
    async fn create(&self, api: &Self::Api, d: &mut ResourceData<Self::Spec>) -> Result<()>;

    /// Refresh the known state; clears the ID when the resource no longer exists
    async fn read(&self, api: &Self::Api, d: &mut ResourceData<Self::Spec>) -> Result<()>;

    /// Push the declared configuration to an existing resource
    async fn update(&self, api: &Self::Api, d: &mut ResourceData<Self::Spec>) -> Result<()>;

    /// Delete the resource; a resource that is already gone counts as deleted
    async fn delete(&self, api: &Self::Api, d: &mut ResourceData<Self::Spec>) -> Result<()>;
}

/// Run one lifecycle operation inside a span and record its outcome
pub(crate) async fn observe<T, F>(
    resource: &'static str,
    operation: &'static str,
    operation_future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let span = info_span!("auth0.resource", resource, operation);
    let start = Instant::now();
    let result = operation_future.instrument(span).await;

    match &result {
        Ok(_) => metrics::record_resource_operation(
            resource,
            operation,
            start.elapsed().as_secs_f64(),
        ),
        Err(_) => metrics::increment_resource_operation_errors(resource, operation),
    }
    result
}
