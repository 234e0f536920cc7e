//! Network-policy controller application layer.
//!
//! Ports (the `SdnClient` trait, the interface C2 exposes to the rest of
//! the core) and use cases (the reconciler's per-event logic and the
//! bootstrap sequence), mirroring the teacher's `ports/` + `use_cases/`
//! split.

pub mod ports;
pub mod use_cases;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use ports::{BootstrapCredentials, SdnClient};
pub use use_cases::{
    BootstrapUseCase, NamespaceAddedUseCase, NamespaceDeletedUseCase, ServiceAddedUseCase,
    ServiceDeletedUseCase,
};
