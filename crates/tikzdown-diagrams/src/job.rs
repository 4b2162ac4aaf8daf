//! TeX source generation for a single diagram.

use std::fmt::Write;

use crate::consts::{DEFAULT_DRIVER, DEFAULT_PACKAGES};

/// Standalone document preamble wrapped around each diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTemplate {
    driver: String,
    packages: Vec<String>,
}

impl Default for JobTemplate {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_owned(),
            packages: DEFAULT_PACKAGES.iter().map(|&p| p.to_owned()).collect(),
        }
    }
}

impl JobTemplate {
    /// Set the PGF system driver file.
    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Replace the list of packages loaded by the preamble.
    #[must_use]
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Build the complete document for `block`.
    ///
    /// The compiler runs in batch mode so a TeX error never waits for input.
    #[must_use]
    pub fn render(&self, block: &str) -> String {
        let mut source = String::with_capacity(block.len() + 256);
        source.push_str("\\batchmode\n\\documentclass{standalone}\n");
        writeln!(source, "\\def\\pgfsysdriver{{{}}}", self.driver).unwrap();
        for package in &self.packages {
            writeln!(source, "\\usepackage{{{package}}}").unwrap();
        }
        source.push_str("\\begin{document}\\large\n");
        source.push_str(block);
        source.push_str("\n\\end{document}\n");
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_default() {
        let source = JobTemplate::default().render("\\begin{tikzpicture}\\end{tikzpicture}");

        assert_eq!(
            source,
            "\\batchmode
\\documentclass{standalone}
\\def\\pgfsysdriver{pgfsys-tex4ht.def}
\\usepackage{tikz}
\\begin{document}\\large
\\begin{tikzpicture}\\end{tikzpicture}
\\end{document}
"
        );
    }

    #[test]
    fn test_render_custom_packages() {
        let source = JobTemplate::default()
            .with_driver("pgfsys-dvisvgm.def")
            .with_packages(["tikz", "pgfplots"])
            .render("x");

        assert!(source.contains("\\def\\pgfsysdriver{pgfsys-dvisvgm.def}\n"));
        assert!(source.contains("\\usepackage{tikz}\n\\usepackage{pgfplots}\n"));
    }

    #[test]
    fn test_render_no_packages() {
        let source = JobTemplate::default()
            .with_packages(Vec::<String>::new())
            .render("x");

        assert!(!source.contains("\\usepackage"));
    }
}
