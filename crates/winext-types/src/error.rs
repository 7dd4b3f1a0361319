use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExtError {
    #[error("Execution error: {0}")]
    Exec(String),

    #[error("Filesystem error: {path}: {message}")]
    Fs { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown function: {module}.{function}")]
    UnknownFunction { module: String, function: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ExtError {
    fn from(e: serde_json::Error) -> Self {
        ExtError::Serialization(e.to_string())
    }
}
