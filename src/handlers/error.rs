// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Upstream,
    InvalidData,
    Llm,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError { kind: ErrorKind::NotFound, message: message.into() }
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        ApiError { kind: ErrorKind::Upstream, message: message.into() }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        ApiError { kind: ErrorKind::InvalidData, message: message.into() }
    }

    pub fn llm_error(message: impl Into<String>) -> Self {
        ApiError { kind: ErrorKind::Llm, message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
