use thiserror::Error;

/// Errors surfaced by the console client and its view-models
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// No response from the backend (connection refused, timeout, DNS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// The backend refused the call for lack of a permission code
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Form-level validation, raised before any request is issued
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Unexpected payload: {0}")]
    Decode(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

pub(crate) const GENERIC_TRANSPORT_MESSAGE: &str =
    "Unable to reach the claims service. Check your connection and try again.";

impl ConsoleError {
    /// Message suitable for an inline error banner or a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Transport(_) => GENERIC_TRANSPORT_MESSAGE.to_string(),
            ConsoleError::Unauthorized(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            ConsoleError::Forbidden { message } => {
                format!("{message}. {}", self.hint().unwrap_or_default())
            }
            ConsoleError::NotFound(what) => format!("{what} was not found."),
            ConsoleError::Api { message, .. } => message.clone(),
            ConsoleError::Validation(errors) => errors.join("\n"),
            ConsoleError::Decode(_) => {
                "The claims service returned data this console does not understand.".to_string()
            }
            ConsoleError::Session(msg) | ConsoleError::Config(msg) => msg.clone(),
        }
    }

    /// Actionable guidance for authorization failures.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConsoleError::Forbidden { .. } => Some(
                "Ask an administrator to grant the missing permission to your role, then log in again.",
            ),
            ConsoleError::Unauthorized(_) => Some("Run `claims-console login` to start a new session."),
            _ => None,
        }
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            ConsoleError::Forbidden { .. } | ConsoleError::Unauthorized(_)
        )
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::Decode(err.to_string())
        } else {
            ConsoleError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_use_generic_message() {
        let err = ConsoleError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), GENERIC_TRANSPORT_MESSAGE);
    }

    #[test]
    fn forbidden_carries_server_message_and_hint() {
        let err = ConsoleError::Forbidden {
            message: "Forbidden - roles.view required".to_string(),
        };
        let msg = err.user_message();
        assert!(msg.starts_with("Forbidden - roles.view required"));
        assert!(msg.contains("administrator"));
        assert!(err.is_authorization());
    }

    #[test]
    fn validation_lists_every_problem() {
        let err = ConsoleError::Validation(vec!["a is required".into(), "b must be numeric".into()]);
        assert_eq!(err.to_string(), "Validation failed: a is required; b must be numeric");
    }
}
