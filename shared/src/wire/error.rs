use thiserror::Error;

/// Errors that can occur while decoding a peer message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Payload was empty
    #[error("Cannot decode an empty payload")]
    EmptyPayload,

    /// Payload did not decode as a peer message
    #[error("Malformed payload of {length} bytes: {reason}")]
    Malformed { length: usize, reason: String },
}
