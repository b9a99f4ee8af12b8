use swiss_core::EngineError;
use thiserror::Error;

pub mod app;
pub mod r#match;
pub mod memory;
pub mod player;
pub mod tournament;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("byes exhausted: {0}")]
    ExhaustedByes(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn bad_request<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::BadRequest(msg.into()))
    }

    pub fn invalid_state<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::InvalidState(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ExhaustedByes { .. } => ServiceError::ExhaustedByes(err.to_string()),
            EngineError::NoContestants | EngineError::MismatchedMatchCounts { .. } => {
                ServiceError::InvalidState(err.to_string())
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
