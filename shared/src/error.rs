//! Error taxonomy for the detection client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Every failure the client can surface to the user.
///
/// None of these escape the user action that triggered them: the workflow
/// controllers turn each one into a message via [`ClientError::user_message`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Local input problem, no request was made.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure (server unreachable, CORS, aborted request).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-ok HTTP response carrying the server's error text.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A job reached its terminal `error` state.
    #[error("{0}")]
    Job(String),

    /// The curation queue is empty.
    #[error("{0}")]
    NoSampleAvailable(String),

    /// The poll loop gave up before the job reached a terminal state.
    #[error("No result after {attempts} status checks, giving up")]
    PollTimeout { attempts: u32 },

    /// A successful response whose body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request could not be built locally.
    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ClientError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection(_))
    }

    /// Text shown in the result area when this error ends a workflow.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Connection(_) => {
                format!("{}. Is the prediction server running?", self)
            }
            other => format!("Error: {}", other),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_is_verbatim() {
        let err = ClientError::server(400, "No face detected");
        assert_eq!(err.to_string(), "No face detected");
        assert_eq!(err.user_message(), "Error: No face detected");
    }

    #[test]
    fn connection_error_keeps_underlying_text() {
        let err = ClientError::Connection("Failed to fetch".into());
        assert!(err.is_connection());
        let msg = err.user_message();
        assert!(msg.contains("Failed to fetch"));
        assert!(msg.contains("server running"));
    }

    #[test]
    fn validation_message_is_not_prefixed() {
        let err = ClientError::Validation("Please select a file.".into());
        assert_eq!(err.user_message(), "Please select a file.");
    }
}
