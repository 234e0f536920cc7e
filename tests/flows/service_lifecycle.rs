//! End-to-end service lifecycle flows: macro creation, annotation
//! precedence, and deletion, driven through `ReconcilerJob`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use zonectl_application::testing::FakeSdnClient;
use zonectl_application::{
    NamespaceAddedUseCase, NamespaceDeletedUseCase, ServiceAddedUseCase, ServiceDeletedUseCase,
};
use zonectl_domain::{ControllerState, Ipv4Addr, Ipv4Subnet, NamespaceEvent, ServiceEvent};
use zonectl_jobs::ReconcilerJob;

const SUBNET_LENGTH: u8 = 8;

fn initial_state() -> ControllerState {
    let cluster_cidr = Ipv4Subnet::new(Ipv4Addr::new(10, 128, 0, 0), 14).unwrap();
    ControllerState::new(
        "ent-1".to_string(),
        "dom-1".to_string(),
        "ingress-tmpl".to_string(),
        "egress-tmpl".to_string(),
        cluster_cidr,
    )
}

struct Harness {
    sdn: Arc<FakeSdnClient>,
    namespace_tx: mpsc::Sender<NamespaceEvent>,
    service_tx: mpsc::Sender<ServiceEvent>,
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<ControllerState>,
}

impl Harness {
    fn start() -> Self {
        let sdn = Arc::new(FakeSdnClient::new());
        let job = ReconcilerJob::new(
            NamespaceAddedUseCase::new(sdn.clone(), SUBNET_LENGTH),
            NamespaceDeletedUseCase::new(sdn.clone()),
            ServiceAddedUseCase::new(sdn.clone()),
            ServiceDeletedUseCase::new(sdn.clone()),
            initial_state(),
        );

        let (namespace_tx, namespace_rx) = mpsc::channel(16);
        let (service_tx, service_rx) = mpsc::channel(16);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(job.run(namespace_rx, service_rx, shutdown.clone()));

        Self {
            sdn,
            namespace_tx,
            service_tx,
            shutdown,
            handle,
        }
    }

    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    async fn stop(self) -> ControllerState {
        self.shutdown.cancel();
        self.handle.await.unwrap()
    }
}

#[tokio::test]
async fn scenario_3_service_added_with_no_annotations_joins_own_zone_group() {
    let harness = Harness::start();
    harness
        .namespace_tx
        .send(NamespaceEvent::added("alpha"))
        .await
        .unwrap();
    harness.settle().await;
    harness
        .service_tx
        .send(ServiceEvent::added(
            "alpha",
            "web",
            "172.30.1.5",
            HashMap::new(),
        ))
        .await
        .unwrap();
    harness.settle().await;

    let sdn = harness.sdn.clone();
    let final_state = harness.stop().await;

    let zone = final_state.zone("alpha").unwrap();
    let macro_id = zone.network_macros.get("web").expect("macro recorded");
    let group_id = zone.network_macro_group_id.clone().unwrap();
    assert!(sdn.group_members_of(&group_id).contains(macro_id));
    assert_eq!(sdn.macro_count(), 1);
}

#[tokio::test]
async fn scenario_4_zone_annotation_mismatch_fails_without_creating_macro() {
    let harness = Harness::start();
    harness
        .namespace_tx
        .send(NamespaceEvent::added("alpha"))
        .await
        .unwrap();
    harness
        .namespace_tx
        .send(NamespaceEvent::added("beta"))
        .await
        .unwrap();
    harness.settle().await;

    let mut annotations = HashMap::new();
    annotations.insert("zone".to_string(), "beta".to_string());
    harness
        .service_tx
        .send(ServiceEvent::added(
            "alpha",
            "web",
            "172.30.1.5",
            annotations,
        ))
        .await
        .unwrap();
    harness.settle().await;

    let sdn = harness.sdn.clone();
    let final_state = harness.stop().await;

    // The failed event is logged and dropped (§7); no macro exists and the
    // zone map carries no entry for it.
    assert_eq!(sdn.macro_count(), 0);
    assert!(!final_state
        .zone("alpha")
        .unwrap()
        .network_macros
        .contains_key("web"));
}

#[tokio::test]
async fn service_deleted_removes_macro_from_group() {
    let harness = Harness::start();
    harness
        .namespace_tx
        .send(NamespaceEvent::added("alpha"))
        .await
        .unwrap();
    harness.settle().await;
    harness
        .service_tx
        .send(ServiceEvent::added(
            "alpha",
            "web",
            "172.30.1.5",
            HashMap::new(),
        ))
        .await
        .unwrap();
    harness.settle().await;
    harness
        .service_tx
        .send(ServiceEvent::deleted("alpha", "web"))
        .await
        .unwrap();
    harness.settle().await;

    let sdn = harness.sdn.clone();
    let final_state = harness.stop().await;

    assert_eq!(sdn.macro_count(), 0);
    assert!(!final_state
        .zone("alpha")
        .unwrap()
        .network_macros
        .contains_key("web"));
}
