//! Common error structure used all over dsh

use std::collections::LinkedList;

use crate::{docker::DockerError, vcs::VcsError};

mod support;
pub use support::*;

/// The type of error at hand
#[derive(Debug)]
pub enum ErrorType {
    IO(std::io::Error),
    TOML(TOMLError),
    Vcs(VcsError),
    Docker(DockerError),
}

/// The error struct, containing the error and a context
#[derive(Debug)]
pub struct Error {
    /// A stack of contexes the error occured in
    pub context: LinkedList<String>,
    /// The error itself
    pub error: ErrorType,
}

/// Traits for handling error contexts
pub trait ErrorExt<T> {
    /// Adds context to an error. This function takes a trait, so strings do only get constructed when needed
    /// # Arguments
    /// * `context` - A closure that returns the context message
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error>;
}

/// A trait for types that can be populated to an `Error`
pub trait Throwable {
    /// Converts `self` to an `Error` with the supplied context
    fn throw(self, context: String) -> Error;
}

impl Error {
    /// Creates a new `Error` with context
    /// # Arguments
    /// * `error` - The error to use as a basis for the message
    /// * `context` - The initial context message
    pub fn new_context(error: ErrorType, context: String) -> Self {
        let mut l = LinkedList::new();
        l.push_back(context);

        Self { context: l, error }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => e.fmt(f),
            Self::TOML(e) => e.fmt(f),
            Self::Vcs(e) => e.fmt(f),
            Self::Docker(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed while")?;
        for (i, context) in self.context.iter().enumerate() {
            write!(f, "\n{}-- {}:", "  ".repeat(i), context)?
        }
        write!(f, "\n{}-- {}", "  ".repeat(self.context.len()), self.error)
    }
}

impl<T> ErrorExt<T> for Result<T, Error> {
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(mut e) => {
                e.context.push_front(context());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nests_contexts_outermost_first() {
        let inner: Result<(), Error> = Err(Error::new_context(
            ErrorType::Vcs(VcsError::NoTags),
            "Querying tags".to_string(),
        ));

        let err = inner
            .e_context(|| "Stamping the build".to_string())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed while\n-- Stamping the build:\n  -- Querying tags:\n    -- The repository has no tags"
        );
    }

    #[test]
    fn io_errors_convert_with_context() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let err = res.e_context(|| "Spawning git".to_string()).unwrap_err();
        assert!(matches!(err.error, ErrorType::IO(_)));
        assert_eq!(err.context.front().map(String::as_str), Some("Spawning git"));
    }
}
