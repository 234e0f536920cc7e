//! Restart reconciliation: a fresh `ControllerState` (as after a process
//! restart, which persists none of its in-memory maps) replaying the same
//! "Added" events against an SDN that already holds the prior run's
//! objects must rediscover them via create-or-get rather than duplicate
//! them.

use std::sync::Arc;

use zonectl_application::testing::FakeSdnClient;
use zonectl_application::NamespaceAddedUseCase;
use zonectl_domain::{ControllerState, Ipv4Addr, Ipv4Subnet};

fn fresh_state() -> ControllerState {
    let cluster_cidr = Ipv4Subnet::new(Ipv4Addr::new(10, 128, 0, 0), 14).unwrap();
    ControllerState::new(
        "ent-1".to_string(),
        "dom-1".to_string(),
        "ingress-tmpl".to_string(),
        "egress-tmpl".to_string(),
        cluster_cidr,
    )
}

#[tokio::test]
async fn replaying_added_against_a_fresh_state_rediscovers_the_prior_zone() {
    let sdn = Arc::new(FakeSdnClient::new());

    // "Run 1": the namespace is created for the first time.
    let mut first_run_state = fresh_state();
    NamespaceAddedUseCase::new(sdn.clone(), 8)
        .execute(&mut first_run_state, "alpha")
        .await
        .unwrap();
    assert_eq!(sdn.zone_count(), 1);
    assert_eq!(sdn.acl_entry_count(), 2);

    let original_subnet = first_run_state.zone("alpha").unwrap().subnets[0]
        .block
        .to_string();

    // "Run 2": process restarted, in-memory state is gone, but the SDN
    // still has everything from run 1. The watcher replays "Added" on
    // startup (per §1's replay-on-restart non-goal exception).
    let mut second_run_state = fresh_state();
    NamespaceAddedUseCase::new(sdn.clone(), 8)
        .execute(&mut second_run_state, "alpha")
        .await
        .unwrap();

    // No duplicate zone, no duplicate ACL entries, and the same subnet
    // block is rediscovered rather than a second one being carved out.
    assert_eq!(sdn.zone_count(), 1);
    assert_eq!(sdn.acl_entry_count(), 2);
    assert_eq!(
        second_run_state.zone("alpha").unwrap().subnets[0]
            .block
            .to_string(),
        original_subnet
    );
}

#[tokio::test]
async fn restart_reconciliation_of_default_namespace_is_idempotent() {
    let sdn = Arc::new(FakeSdnClient::new());

    let mut first_run_state = fresh_state();
    NamespaceAddedUseCase::new(sdn.clone(), 8)
        .execute(&mut first_run_state, "default")
        .await
        .unwrap();

    let mut second_run_state = fresh_state();
    NamespaceAddedUseCase::new(sdn.clone(), 8)
        .execute(&mut second_run_state, "default")
        .await
        .unwrap();

    assert_eq!(sdn.zone_count(), 1);
    assert_eq!(sdn.macro_group_count(), 1);
    assert_eq!(sdn.acl_entry_count(), 2);
}
