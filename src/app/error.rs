//! Error taxonomy for stack operations.
//!
//! The one condition callers are expected to branch on is
//! [`ApiError::NotFound`]: the delete-stack and delete-change-set polls
//! absorb it into their success path, everywhere else it is a hard failure.

use thiserror::Error;

/// Errors raised at the remote API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The stack or change set does not exist. CloudFormation reports this
    /// as a `ValidationError` ("Stack ... does not exist") or a
    /// `ChangeSetNotFound` service error.
    #[error("{0}")]
    NotFound(String),

    /// Any other remote failure (service, transport, throttling). Never
    /// retried; propagates unchanged to the caller.
    #[error("{0}")]
    Remote(String),
}

#[derive(Debug, Error)]
pub enum Error {
    // The message text is part of the external contract; downstream tooling
    // parses it. Keep it byte-for-byte stable.
    #[error("1 validation error detected: Value '{0}' at 'stackName' failed to satisfy constraint: Member must satisfy regular expression pattern: [a-zA-Z][-a-zA-Z0-9]*")]
    InvalidStackName(String),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// A stack operation reached a terminal state other than the expected
    /// success status.
    #[error("{message}")]
    StackOperation { message: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to parse template: {0}")]
    TemplateParse(String),

    #[error("Failed to read template source `{source_name}`: {reason}")]
    TemplateRead { source_name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build the terminal-failure error for a stack operation. The message
    /// carries the operation name, the stack name and the remote status
    /// reason when one was provided.
    pub fn stack_operation(message: &str, stack_name: &str, reason: Option<&str>) -> Self {
        let mut parts = vec![message.to_string(), stack_name.to_string()];
        if let Some(reason) = reason {
            parts.push(reason.to_string());
        }
        Error::StackOperation {
            message: parts.join(": "),
        }
    }

    /// True when the underlying cause is a remote "does not exist"
    /// condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_stack_name_message_is_stable() {
        let err = Error::InvalidStackName("bad_name".to_string());
        assert_eq!(
            err.to_string(),
            "1 validation error detected: Value 'bad_name' at 'stackName' failed to satisfy \
             constraint: Member must satisfy regular expression pattern: [a-zA-Z][-a-zA-Z0-9]*"
        );
    }

    #[test]
    fn stack_operation_message_includes_reason_when_present() {
        let err = Error::stack_operation("Create failed", "my-stack", Some("rollback"));
        assert_eq!(err.to_string(), "Create failed: my-stack: rollback");

        let err = Error::stack_operation("Delete failed", "my-stack", None);
        assert_eq!(err.to_string(), "Delete failed: my-stack");
    }

    #[test]
    fn not_found_is_distinguishable() {
        let err = Error::from(ApiError::NotFound("Stack does not exist".into()));
        assert!(err.is_not_found());
        let err = Error::from(ApiError::Remote("throttled".into()));
        assert!(!err.is_not_found());
    }
}
