//! The reconciler's background job (C4), in the style of the teacher's
//! `JobRunner`/`ClientSyncJob`: a `tokio::select!`-driven loop owned by a
//! `CancellationToken`, wired up by `crates/cli::di`.

pub mod reconciler;

pub use reconciler::ReconcilerJob;
