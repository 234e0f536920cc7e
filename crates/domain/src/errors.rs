use thiserror::Error;

/// Every error kind the core can surface, per the error-handling design.
///
/// Bootstrap failures are fatal to the process; reconciliation failures are
/// logged and the offending event is dropped so the next one still runs.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status} from {operation}")]
    UnexpectedStatus { operation: String, status: u16 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("natural-key mismatch for {entity}: requested {requested}, got {got}")]
    Mismatch {
        entity: String,
        requested: String,
        got: String,
    },

    #[error("subnet pool exhausted for mask /{0}")]
    OutOfAddresses(u8),

    #[error("double free of subnet {0}")]
    DoubleFree(String),

    #[error("invalid CIDR mask length: {0}")]
    InvalidMask(u8),

    #[error("annotation error: {0}")]
    AnnotationError(String),

    #[error("bootstrap failed: {0}")]
    BootstrapFatal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
