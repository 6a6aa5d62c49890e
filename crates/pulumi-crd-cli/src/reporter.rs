//! User-facing stderr lines
//!
//! `info:` and `warn:` lines appear only with `--verbose`; the single
//! `error:` line is always written.

use std::fmt::Display;
use std::io::Write;

use miette::Diagnostic;
use pulumi_crd_core::SkipIssue;

use crate::error::CliError;

pub struct Reporter<W: Write> {
    verbose: bool,
    out: W,
}

impl Reporter<std::io::Stderr> {
    pub fn stderr(verbose: bool) -> Self {
        Self::new(verbose, std::io::stderr())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(verbose: bool, out: W) -> Self {
        Self { verbose, out }
    }

    pub fn info(&mut self, message: impl Display) {
        if self.verbose {
            self.line(format_args!("info: {message}"));
        }
    }

    pub fn warn(&mut self, issue: &SkipIssue) {
        if self.verbose {
            self.line(format_args!(
                "warn: component={:?} path={:?} reason={:?}",
                issue.component, issue.path, issue.reason
            ));
        }
    }

    pub fn warnings(&mut self, issues: &[SkipIssue]) {
        for issue in issues {
            self.warn(issue);
        }
    }

    pub fn error(&mut self, err: &CliError) {
        if let Some(help) = err.help() {
            self.info(format_args!("hint: {help}"));
        }
        self.line(format_args!("error: {err}"));
    }

    // Write failures on stderr are ignored
    fn line(&mut self, line: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{line}");
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulumi_crd_core::SelectError;

    fn issue() -> SkipIssue {
        SkipIssue {
            component: "pkg:index:Thing".into(),
            path: "spec.bad".into(),
            reason: "keyword \"oneOf\"".into(),
        }
    }

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_quiet_reports_only_errors() {
        let mut reporter = Reporter::new(false, Vec::new());
        reporter.info("loading");
        reporter.warn(&issue());
        reporter.error(&CliError::from(SelectError::NoComponents));
        assert_eq!(output(reporter), "error: no component resources found in schema\n");
    }

    #[test]
    fn test_verbose_warn_line() {
        let mut reporter = Reporter::new(true, Vec::new());
        reporter.warnings(&[issue()]);
        assert_eq!(
            output(reporter),
            "warn: component=\"pkg:index:Thing\" path=\"spec.bad\" reason=\"keyword \\\"oneOf\\\"\"\n"
        );
    }

    #[test]
    fn test_verbose_error_includes_hint() {
        let mut reporter = Reporter::new(true, Vec::new());
        reporter.error(&CliError::usage("unexpected argument '--bogus' found"));
        let text = output(reporter);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("info: hint: "));
        assert_eq!(lines[1], "error: unexpected argument '--bogus' found");
    }
}
