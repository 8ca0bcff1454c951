//! Error types for pipeline operations.
//!
//! Filesystem failures carry the operation that was attempted and the path it
//! touched, so a fatal error printed by the CLI is enough to diagnose the run.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed on a known path
    #[error("{context} ({path}): {source}")]
    Fs {
        /// What was being done
        context: String,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// IO error without path context
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed mapping markup
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// PNG encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Archive writing errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping errors
    #[error("Path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(quick_xml::Error::from(err))
    }
}

/// Attaches operation and path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an `io::Error` into [`Error::Fs`] naming `context` and `path`.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts options and foreign results into [`Error::GenericError`].
pub trait Context<T> {
    /// Wraps a missing value or error with a message.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::Error::GenericError(format!($($arg)*)))
    };
}

/// Joins a blocking task, mapping a panic into a pipeline error.
pub(crate) async fn join_blocking<T, F>(what: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::GenericError(format!("{what} task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_names_path_and_operation() {
        let err = Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "gone"))
            .fs_context("reading appfilter", "/tmp/appfilter.xml")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("reading appfilter"));
        assert!(message.contains("/tmp/appfilter.xml"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let err = None::<u8>.context("nothing here").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "nothing here"));
    }
}
