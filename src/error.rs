use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("pronunciation dictionary line {line}: {message}")]
    Dictionary { line: usize, message: String },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("{capability} is unavailable")]
    Unavailable { capability: &'static str },
}

impl ScoringError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn dictionary(line: usize, message: impl Into<String>) -> Self {
        Self::Dictionary {
            line,
            message: message.into(),
        }
    }

    pub fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unavailable(capability: &'static str) -> Self {
        Self::Unavailable { capability }
    }
}
