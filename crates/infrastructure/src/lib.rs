//! HTTP/JSON implementation of the `SdnClient` port (C2).
//!
//! The wire contract (§6) is abstract in the core: JSON resources under
//! `<base>/nuage/api/<version>/...`, filter-header-qualified list GETs, and
//! the 200/201/204/409 status contract. Everything in this crate exists to
//! make that contract concrete over `reqwest`; none of it is visible to
//! `zonectl-application` or `zonectl-jobs`.

pub mod sdn;

pub use sdn::HttpSdnClient;
