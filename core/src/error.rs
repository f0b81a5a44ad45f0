use thiserror::Error;

/// Error taxonomy from §7. Each variant carries the context needed to
/// reconstruct a useful message; the bare `StatusCode` (normative, stable
/// across versions per §6) is what an FFI boundary built on top of this
/// crate would translate these into.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("null pointer: {0}")]
    NullPointer(&'static str),

    #[error("worker pool not initialized")]
    Uninitialized,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("vertex buffer overflow: net {net_index} needed {needed} vertices, {available} available")]
    VertexBufferOverflow { net_index: usize, needed: usize, available: usize },

    #[error("wire-view buffer overflow: net {net_index} needed {needed} wire views, {available} available")]
    WireViewBufferOverflow { net_index: usize, needed: usize, available: usize },

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RoutingError {
    fn from(e: std::io::Error) -> Self {
        RoutingError::Io(e.to_string())
    }
}

/// Stable status codes per §6. Values must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StatusCode {
    Success = 0,
    NullPointer = 1,
    InvalidOperation = 2,
    VertexBufferOverflow = 3,
    WireViewBufferOverflow = 4,
    Uninitialized = 5,
    InvalidArgument = 6,
    IoError = 7,
}

impl From<&RoutingError> for StatusCode {
    fn from(e: &RoutingError) -> Self {
        match e {
            RoutingError::NullPointer(_) => StatusCode::NullPointer,
            RoutingError::Uninitialized => StatusCode::Uninitialized,
            RoutingError::InvalidArgument(_) => StatusCode::InvalidArgument,
            RoutingError::InvalidOperation(_) => StatusCode::InvalidOperation,
            RoutingError::VertexBufferOverflow { .. } => StatusCode::VertexBufferOverflow,
            RoutingError::WireViewBufferOverflow { .. } => StatusCode::WireViewBufferOverflow,
            RoutingError::Io(_) => StatusCode::IoError,
        }
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
