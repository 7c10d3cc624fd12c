use shared::error::ProtocolError;
use thiserror::Error;

/// Bad or missing form input. The message is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter valid numbers")]
    InvalidParameters,
    #[error("Please generate combinations first")]
    MissingParameters,
    #[error("Please enter valid sum range")]
    SumRange,
    #[error("Please enter valid even/odd range")]
    EvenOddRange,
    #[error("Please enter valid distance range")]
    DistanceRange,
    #[error("Please enter valid numbers to include")]
    IncludeNumbers,
    #[error("Please enter valid numbers to exclude")]
    ExcludeNumbers,
    #[error("Please enter a valid number of combinations")]
    RandomCount,
    #[error("Please enter a valid consecutive limit")]
    ConsecutiveLimit,
    #[error("Unknown filter kind: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url must start with http:// or https://, got '{0}'")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unparseable response (status {status}): {source}")]
    MalformedBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed response: {0}")]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    ApplyFilter,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Generate => "Error generating combinations",
            Action::ApplyFilter => "Error applying filter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Server,
    Transport,
    Processing,
}

/// Every failure an action can end in. `Display` is the user-facing text.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Error: {message}")]
    Server { message: String },
    #[error("{}: {source}", .action.failure_prefix())]
    Transport {
        action: Action,
        #[source]
        source: TransportError,
    },
    /// The filter request could not be encoded before sending. The built-in
    /// request types always encode, so only a custom `FilterService` reports this.
    #[error("Error processing filter: {source}")]
    Processing {
        #[source]
        source: TransportError,
    },
}

impl CoordinatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoordinatorError::Validation(_) => ErrorCategory::Validation,
            CoordinatorError::Server { .. } => ErrorCategory::Server,
            CoordinatorError::Transport { .. } => ErrorCategory::Transport,
            CoordinatorError::Processing { .. } => ErrorCategory::Processing,
        }
    }

    pub(crate) fn from_transport(action: Action, source: TransportError) -> Self {
        match (action, source) {
            (Action::ApplyFilter, source @ TransportError::Encode(_)) => {
                CoordinatorError::Processing { source }
            }
            (action, source) => CoordinatorError::Transport { action, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_messages_name_the_action() {
        let generate = CoordinatorError::from_transport(
            Action::Generate,
            TransportError::Protocol(ProtocolError::MissingField("total")),
        );
        assert_eq!(
            generate.to_string(),
            "Error generating combinations: malformed response: response is missing `total`"
        );

        let filter = CoordinatorError::from_transport(
            Action::ApplyFilter,
            TransportError::UnsupportedScheme("ftp://x".into()),
        );
        assert!(filter.to_string().starts_with("Error applying filter: "));
        assert_eq!(filter.category(), ErrorCategory::Transport);
    }

    #[test]
    fn encode_failures_while_filtering_are_processing_errors() {
        let source = serde_json::from_str::<u8>("nope").expect_err("invalid json");
        let err = CoordinatorError::from_transport(Action::ApplyFilter, TransportError::Encode(source));
        assert_eq!(err.category(), ErrorCategory::Processing);
        assert!(err.to_string().starts_with("Error processing filter: "));
    }

    #[test]
    fn server_errors_are_reported_verbatim() {
        let err = CoordinatorError::Server {
            message: "bad request".into(),
        };
        assert_eq!(err.to_string(), "Error: bad request");
    }
}
