//! The reconciler event loop (C4): a single-threaded consumer of namespace
//! and service events, dispatching to the application use cases.
//!
//! Exactly one event is processed at a time — there is no intra-event
//! concurrency and no parallel workers (§4.4), which is what makes the
//! `ControllerState` zone map, subnet pool, and priority counter safe to
//! mutate without locks.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use zonectl_application::{
    NamespaceAddedUseCase, NamespaceDeletedUseCase, ServiceAddedUseCase, ServiceDeletedUseCase,
};
use zonectl_domain::{ControllerState, EventKind, NamespaceEvent, ServiceEvent};

pub struct ReconcilerJob {
    namespace_added: NamespaceAddedUseCase,
    namespace_deleted: NamespaceDeletedUseCase,
    service_added: ServiceAddedUseCase,
    service_deleted: ServiceDeletedUseCase,
    state: ControllerState,
}

impl ReconcilerJob {
    pub fn new(
        namespace_added: NamespaceAddedUseCase,
        namespace_deleted: NamespaceDeletedUseCase,
        service_added: ServiceAddedUseCase,
        service_deleted: ServiceDeletedUseCase,
        state: ControllerState,
    ) -> Self {
        Self {
            namespace_added,
            namespace_deleted,
            service_added,
            service_deleted,
            state,
        }
    }

    /// Runs the loop until `shutdown` is signalled or both input channels
    /// close. No SDN teardown is performed on cancellation (§5); in-flight
    /// HTTP requests are simply allowed to complete.
    pub async fn run(
        mut self,
        mut namespace_events: mpsc::Receiver<NamespaceEvent>,
        mut service_events: mpsc::Receiver<ServiceEvent>,
        shutdown: CancellationToken,
    ) -> ControllerState {
        info!("reconciler loop starting");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("reconciler loop stopping on cancellation");
                    break;
                }
                Some(event) = namespace_events.recv() => {
                    self.handle_namespace_event(event).await;
                }
                Some(event) = service_events.recv() => {
                    self.handle_service_event(event).await;
                }
            }
        }

        self.state
    }

    async fn handle_namespace_event(&mut self, event: NamespaceEvent) {
        let result = match event.kind {
            EventKind::Added => {
                self.namespace_added
                    .execute(&mut self.state, &event.name)
                    .await
            }
            EventKind::Deleted => {
                self.namespace_deleted
                    .execute(&mut self.state, &event.name)
                    .await
            }
        };

        match result {
            Ok(()) => info!(namespace = %event.name, kind = ?event.kind, "namespace event processed"),
            Err(err) => {
                warn!(namespace = %event.name, kind = ?event.kind, error = %err, "namespace event dropped")
            }
        }
    }

    async fn handle_service_event(&mut self, event: ServiceEvent) {
        let result = match event.kind {
            EventKind::Added => self.service_added.execute(&mut self.state, &event).await,
            EventKind::Deleted => {
                self.service_deleted
                    .execute(&mut self.state, &event.namespace, &event.name)
                    .await
            }
        };

        match result {
            Ok(()) => {
                info!(namespace = %event.namespace, service = %event.name, kind = ?event.kind, "service event processed")
            }
            Err(err) => {
                warn!(namespace = %event.namespace, service = %event.name, kind = ?event.kind, error = %err, "service event dropped")
            }
        }
    }
}
