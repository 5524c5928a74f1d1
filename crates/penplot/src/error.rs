//! Error types.
//!
//! Structural operations on a drawing never fail. Errors come from the
//! edges: opening and writing export files, and parsing SVG input.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! `thiserror` derives `Display` and `std::error::Error` from the
//! `#[error(..)]` attributes. `#[from]` also derives a `From` impl, so `?`
//! turns an `io::Error` into a `PlotError` without any `map_err`.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    /// The output file could not be created. Nothing was written.
    #[error("cannot open export destination {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("no geometry found in SVG")]
    NoGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_error_names_path() {
        let error = PlotError::Destination {
            path: PathBuf::from("/nope/out.gcode"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = error.to_string();
        assert!(message.contains("/nope/out.gcode"), "{message}");
        assert!(message.contains("missing"), "{message}");
    }

    #[test]
    fn io_error_converts() {
        fn fails() -> Result<()> {
            Err(std::io::Error::other("disk full"))?
        }
        assert!(matches!(fails(), Err(PlotError::Io(_))));
    }
}
