use hickory_proto::error::ProtoError;
use thiserror::Error;

/// Errors produced by the resolution layer.
///
/// The filesystem engine collapses all of these into "no such entry" (or an
/// empty listing); the variants exist for logging and for tests.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An I/O error from the underlying TCP transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The exchange exceeded the configured time budget.
    #[error("query timed out")]
    Timeout,

    /// The peer closed the connection before a full framed message arrived.
    #[error("truncated response from resolver")]
    TruncatedResponse,

    /// The encoded query does not fit the two-byte TCP length prefix.
    #[error("query exceeds the tcp message limit: {0} bytes")]
    QueryTooLarge(usize),

    /// Wire-format encoding or decoding failed.
    #[error("wire error: {0}")]
    Proto(#[from] ProtoError),

    /// The resolver returned a non-success response code.
    #[error("resolver answered {rcode}")]
    ErrorResponse { rcode: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_timeout() {
        assert_eq!(ResolveError::Timeout.to_string(), "query timed out");
    }

    #[test]
    fn test_display_error_response() {
        let err = ResolveError::ErrorResponse {
            rcode: "NXDomain".to_string(),
        };
        assert!(err.to_string().contains("NXDomain"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ResolveError = io.into();
        assert!(matches!(err, ResolveError::Io(_)));
        assert!(err.to_string().contains("refused"));
    }
}
