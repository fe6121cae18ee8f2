use std::fmt::{Display, Formatter, Result};

use reports_api::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ValidationError(String),
    ReportError(String),
    EmptyReport,
    IoError(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Error::ValidationError(message) => write!(f, "Validation error: {}", message),
            Error::ReportError(message) => write!(f, "Report error: {}", message),
            Error::EmptyReport => write!(f, "Server returned an empty report file"),
            Error::IoError(message) => write!(f, "IO error: {}", message),
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::ReportError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
