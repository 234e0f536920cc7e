//! Network-policy controller entry point.
//!
//! Wires together the five components from the spec: loads configuration,
//! initializes logging, runs the one-shot bootstrap sequence (C5) against
//! the real `HttpSdnClient`, then hands the resulting [`ControllerState`]
//! to the reconciler job (C4), which drains the namespace/service event
//! channels until a shutdown signal arrives.
//!
//! The cluster watchers that actually populate those channels are an
//! out-of-scope collaborator (see spec §1) — this binary owns the channel
//! endpoints but does not implement a real Kubernetes watch loop.

mod bootstrap;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use zonectl_application::{
    BootstrapUseCase, NamespaceAddedUseCase, NamespaceDeletedUseCase, ServiceAddedUseCase,
    ServiceDeletedUseCase,
};
use zonectl_domain::CliOverrides;
use zonectl_infrastructure::HttpSdnClient;
use zonectl_jobs::ReconcilerJob;

/// Network-policy controller: keeps an SDN in sync with cluster namespaces
/// and services.
#[derive(Parser, Debug)]
#[command(name = "zonectl", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Override `cluster.cidr` (e.g. "10.128.0.0/14").
    #[arg(long)]
    cluster_cidr: Option<String>,

    /// Override `cluster.subnet_length`.
    #[arg(long)]
    subnet_length: Option<u8>,

    /// Override `cluster.license_file`.
    #[arg(long)]
    license_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let overrides = CliOverrides {
        sdn_base_url: None,
        cluster_cidr: args.cluster_cidr,
        subnet_length: args.subnet_length,
        license_file: args.license_file,
    };
    let config = bootstrap::load_config(args.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    let (cluster_cidr, subnet_length) = config.cluster.parsed_cidr_and_subnet_length()?;

    let sdn: Arc<dyn zonectl_application::SdnClient> =
        Arc::new(HttpSdnClient::new(&config.sdn)?);

    let state = BootstrapUseCase::new(sdn.clone())
        .execute(
            &config.csp,
            &config.cluster.enterprise_name,
            &format!("{}-template", config.cluster.domain_name),
            &config.cluster.domain_name,
            config.cluster.license_file.as_deref(),
            cluster_cidr,
        )
        .await
        .map_err(|err| {
            // Bootstrap failures are fatal to the process (§7).
            tracing::error!(error = %err, "bootstrap failed, exiting");
            anyhow::anyhow!(err)
        })?;

    let reconciler = ReconcilerJob::new(
        NamespaceAddedUseCase::new(sdn.clone(), subnet_length),
        NamespaceDeletedUseCase::new(sdn.clone()),
        ServiceAddedUseCase::new(sdn.clone()),
        ServiceDeletedUseCase::new(sdn),
        state,
    );

    // Channel endpoints the (out-of-scope) cluster watchers would feed;
    // this binary only owns the consuming side.
    let (_namespace_tx, namespace_rx) = mpsc::channel(64);
    let (_service_tx, service_rx) = mpsc::channel(64);
    let shutdown = CancellationToken::new();

    let shutdown_on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown_on_signal.cancel();
        }
    });

    reconciler.run(namespace_rx, service_rx, shutdown).await;

    Ok(())
}
