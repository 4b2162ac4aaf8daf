//! Error types for diagram compilation and document conversion.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use tikzdown_svg::SvgError;

/// Reason a diagram block could not be compiled.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited unsuccessfully.
    #[error("compiler exited with {status}")]
    Failed { status: ExitStatus },

    /// The compiler ran longer than the configured limit and was killed.
    #[error("compiler timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The compiler succeeded but produced no SVG file.
    #[error("compiler produced no SVG output")]
    NoOutput,

    /// Job directory or file handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output search pattern was invalid.
    #[error("invalid output pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The produced SVG could not be parsed.
    #[error("invalid SVG output: {0}")]
    Parse(#[from] SvgError),
}

/// Failure converting a markdown file to HTML.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_messages() {
        assert_eq!(
            CompileError::NoOutput.to_string(),
            "compiler produced no SVG output"
        );
        assert_eq!(
            CompileError::Timeout(Duration::from_millis(1500)).to_string(),
            "compiler timed out after 1.5s"
        );
        let launch = CompileError::Launch {
            program: "mk4ht".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(launch.to_string(), "failed to launch `mk4ht`: not found");
    }

    #[test]
    fn test_convert_error_message() {
        let err = ConvertError::Read {
            path: PathBuf::from("doc.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read doc.md: missing");
    }
}
