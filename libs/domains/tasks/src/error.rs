use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<redis::RedisError> for TaskError {
    fn from(err: redis::RedisError) -> Self {
        TaskError::Cache(err.to_string())
    }
}
