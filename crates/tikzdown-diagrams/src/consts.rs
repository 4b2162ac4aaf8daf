//! Internal constants for diagram compilation.

use std::time::Duration;

/// Substring that opens a diagram block.
pub const BEGIN_MARKER: &str = r"\begin{tikzpicture}";

/// Substring that closes a diagram block.
pub const END_MARKER: &str = r"\end{tikzpicture}";

/// Fence language for diagram code blocks.
pub(crate) const FENCE_LANGUAGE: &str = "tikz";

/// Default compiler command line, run inside the job directory.
pub(crate) const DEFAULT_COMMAND: &str = "mk4ht xhmlatex job";

/// Default PGF system driver (SVG output through tex4ht).
pub(crate) const DEFAULT_DRIVER: &str = "pgfsys-tex4ht.def";

/// Default packages loaded by the job preamble.
pub(crate) const DEFAULT_PACKAGES: &[&str] = &["tikz"];

/// Name of the source file written to the job directory.
pub(crate) const JOB_FILE: &str = "job.tex";

/// How often a compiler with a timeout is polled for exit.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(50);
