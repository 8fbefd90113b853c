use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("Unknown plan '{0}'")]
    UnknownPlan(String),

    #[error("Filter must include at least one {0}")]
    EmptySelection(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
