pub mod sdn_client;

pub use sdn_client::{BootstrapCredentials, SdnClient};
