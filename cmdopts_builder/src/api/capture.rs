use thiserror::Error;

/// The reasons a [`ValueSpec`](crate::ValueSpec) rejects a raw value.
/// Reported as the source of [`ParseError::InvalidArgument`](crate::ParseError::InvalidArgument).
#[derive(Debug, Error)]
pub enum InvalidCapture {
    /// The raw value does not convert to the target type.
    #[error("cannot convert '{token}' to {type_name}: {cause}.")]
    InvalidConversion {
        /// The raw value (after any transform).
        token: String,
        /// The target type.
        type_name: &'static str,
        /// The [`FromStr`](std::str::FromStr) failure.
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The converted value failed validation.
    #[error("'{token}' is rejected: {message}.")]
    Rejected {
        /// The raw value (after any transform).
        token: String,
        /// Why it was rejected.
        message: String,
    },
}
