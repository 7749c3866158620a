//! The unified error handling system for the application.

use std::fmt::Display;

pub use types::EvalError;

/// A unified `Result` type for the entire application.
pub type Result<T> = std::result::Result<T, EvalError>;

pub mod macros;
pub mod types;

/// Context trait for adding a human readable prefix to errors.
pub trait Context<T, E> {
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display;

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<EvalError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(EvalError::Context {
                context: context().to_string(),
                source: Box::new(error.into()),
            }),
        }
    }
}

/// Error category used to pick the log level of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the client. Corresponds to 4xx HTTP status codes.
    Client,
    /// Errors caused by the server or the database. Corresponds to 5xx.
    Server,
}
