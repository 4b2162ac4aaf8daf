//! `tikzdown convert` command implementation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tikzdown_config::Config;
use tikzdown_diagrams::{convert_file, document_renderer, output_path};

use super::{CompilerArgs, build_processor};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args, Debug)]
pub(crate) struct ConvertArgs {
    /// Markdown file to convert, or `-` to read stdin.
    input: PathBuf,

    /// Output file, or `-` for stdout (default: input with the output
    /// extension, or stdout when reading stdin).
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    compiler: CompilerArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// Diagrams that fail to compile are printed as warnings; the document is
    /// still written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.compiler.config.as_deref(), Some(&self.compiler.settings()))?;
        let mut renderer = document_renderer(build_processor(&config));
        let target = self.target(&config.watch.output_extension);

        if !is_stdio(&self.input)
            && let Some(target) = &target
        {
            let result = convert_file(&mut renderer, &self.input, target)?;
            output.warnings(&result.warnings);
            output.converted(&self.input, target);
            return Ok(());
        }

        let markdown = if is_stdio(&self.input) {
            io::read_to_string(io::stdin())?
        } else {
            fs::read_to_string(&self.input)?
        };
        let result = renderer.render_markdown(&markdown);
        output.warnings(&result.warnings);

        match target {
            Some(path) => {
                fs::write(&path, &result.html)?;
                output.success(&format!("  => {}", path.display()));
            }
            None => io::stdout().lock().write_all(result.html.as_bytes())?,
        }
        Ok(())
    }

    /// Where to write the HTML; `None` means stdout.
    fn target(&self, extension: &str) -> Option<PathBuf> {
        match &self.output {
            Some(path) if is_stdio(path) => None,
            Some(path) => Some(path.clone()),
            None if is_stdio(&self.input) => None,
            None => Some(output_path(&self.input, extension)),
        }
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(input: &str, output: Option<&str>) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            compiler: CompilerArgs::default(),
        }
    }

    #[test]
    fn test_target_defaults_to_output_extension() {
        assert_eq!(
            args("docs/a.md", None).target(".html"),
            Some(PathBuf::from("docs/a.html"))
        );
    }

    #[test]
    fn test_target_explicit_and_stdout() {
        assert_eq!(
            args("a.md", Some("b.htm")).target(".html"),
            Some(PathBuf::from("b.htm"))
        );
        assert_eq!(args("a.md", Some("-")).target(".html"), None);
        assert_eq!(args("-", None).target(".html"), None);
        assert_eq!(
            args("-", Some("out.html")).target(".html"),
            Some(PathBuf::from("out.html"))
        );
    }

    #[test]
    fn test_execute_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("tikzdown.toml");
        fs::write(&config, "[tikz]\ncommand = \"tikzdown-no-such-compiler\"\n").unwrap();
        let input = dir.path().join("doc.md");
        fs::write(&input, "# Doc\n\n\\begin{tikzpicture}\n\\end{tikzpicture}\n").unwrap();

        ConvertArgs {
            input: input.clone(),
            output: None,
            compiler: CompilerArgs {
                config: Some(config),
                ..CompilerArgs::default()
            },
        }
        .execute()
        .unwrap();

        let html = fs::read_to_string(dir.path().join("doc.html")).unwrap();
        assert!(html.starts_with("<h1>Doc</h1>\n<pre><code>\\begin{tikzpicture}"));
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("tikzdown.toml");
        fs::write(&config, "").unwrap();

        let result = ConvertArgs {
            input: dir.path().join("missing.md"),
            output: None,
            compiler: CompilerArgs {
                config: Some(config),
                ..CompilerArgs::default()
            },
        }
        .execute();

        assert!(matches!(result, Err(CliError::Convert(_))));
    }
}
