use thiserror::Error;

pub mod codec;
pub mod command;
pub mod response;

#[cfg(test)]
pub(crate) mod fake;

use response::Response;

#[derive(Debug, Error)]
pub enum ProtoError {
    /// Transport failure, including malformed response lines surfaced by
    /// the codec as `InvalidData`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Connection closed before a response arrived.
    #[error("Connection aborted")]
    Abort,

    /// The instrument answered, but not with what the pending query expects.
    #[error("Unexpected response: {0:?}")]
    Unexpected(Response),

    /// Numeric argument outside the instrument range. Raised before any
    /// byte is written.
    #[error("{property} value {value} V is outside [{min}, {max}] V")]
    OutOfRange {
        property: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Token outside the discrete set a property accepts. Raised before
    /// any byte is written.
    #[error("`{value}` is not a valid {what}")]
    InvalidValue { what: &'static str, value: String },
}

impl From<Response> for ProtoError {
    fn from(response: Response) -> Self {
        ProtoError::Unexpected(response)
    }
}

pub type Result<T> = std::result::Result<T, ProtoError>;
