//! External compiler invocation.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::consts::{DEFAULT_COMMAND, POLL_INTERVAL};
use crate::error::CompileError;

/// Turns the job file in a working directory into one or more SVG files.
pub trait Compiler {
    /// Run the compiler with `workdir` as its working directory.
    ///
    /// The job source has already been written to `workdir`. Success means
    /// the compiler finished cleanly, not that it wrote any SVG.
    fn compile(&self, workdir: &Path) -> Result<(), CompileError>;
}

/// Runs a TeX toolchain command as a subprocess.
///
/// The command line is split on spaces into program and arguments; no shell
/// is involved. Standard streams are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexCompiler {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for TexCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl TexCompiler {
    /// Create a compiler from a command line such as `mk4ht xhmlatex job`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        let mut parts = command.split(' ').filter(|part| !part.is_empty());
        Self {
            program: parts.next().unwrap_or_default().to_owned(),
            args: parts.map(str::to_owned).collect(),
            timeout: None,
        }
    }

    /// Kill the compiler if it runs longer than `timeout`.
    ///
    /// Without a timeout the compiler may run indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Compiler for TexCompiler {
    fn compile(&self, workdir: &Path) -> Result<(), CompileError> {
        debug!(program = %self.program, args = ?self.args, dir = %workdir.display(), "Running compiler");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CompileError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let status = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)?,
            None => child.wait()?,
        };

        if status.success() {
            Ok(())
        } else {
            Err(CompileError::Failed { status })
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, CompileError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            // The process may exit between the check and the kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(CompileError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_splits_on_spaces() {
        let compiler = TexCompiler::new("mk4ht  xhmlatex job");

        assert_eq!(compiler.program(), "mk4ht");
        assert_eq!(compiler.args(), ["xhmlatex", "job"]);
    }

    #[test]
    fn test_default_command() {
        assert_eq!(TexCompiler::default(), TexCompiler::new("mk4ht xhmlatex job"));
    }

    #[test]
    fn test_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = TexCompiler::new("tikzdown-no-such-compiler job").compile(dir.path());

        assert!(matches!(result, Err(CompileError::Launch { program, .. }) if program == "tikzdown-no-such-compiler"));
    }

    #[test]
    fn test_empty_command_fails_to_launch() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            TexCompiler::new("").compile(dir.path()),
            Err(CompileError::Launch { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_and_failure_status() {
        let dir = tempfile::tempdir().unwrap();

        assert!(TexCompiler::new("true").compile(dir.path()).is_ok());
        assert!(matches!(
            TexCompiler::new("false").compile(dir.path()),
            Err(CompileError::Failed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("job.tex"), "x").unwrap();

        TexCompiler::new("cp job.tex job.svg").compile(dir.path()).unwrap();

        assert!(dir.path().join("job.svg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TexCompiler::new("sleep 5").with_timeout(Some(Duration::from_millis(100)));

        let started = Instant::now();
        let result = compiler.compile(dir.path());

        assert!(matches!(result, Err(CompileError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_not_reached() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TexCompiler::new("true").with_timeout(Some(Duration::from_secs(5)));

        assert!(compiler.compile(dir.path()).is_ok());
    }
}
