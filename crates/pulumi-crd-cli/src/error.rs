//! CLI error type with exit code handling
//!
//! Every library error converts into [`CliError`], which decides the exit
//! code. The `Display` output is the single `error:` line shown to users.

use miette::Diagnostic;
use pulumi_crd_core::{EmitError, IdentityError, PreflightError, SelectError, TranslateError};
use pulumi_crd_fetch::FetchError;
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid command-line arguments
    #[error("{message}")]
    #[diagnostic(code(pulumi_crd::usage), help("run `pulumi-crd --help` for usage"))]
    Usage { message: String },

    #[error(transparent)]
    #[diagnostic(code(pulumi_crd::input))]
    Input(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(
        code(pulumi_crd::select),
        help("pass --component with one of the listed tokens")
    )]
    Select(#[from] SelectError),

    #[error(transparent)]
    #[diagnostic(code(pulumi_crd::preflight))]
    Preflight(#[from] PreflightError),

    #[error(transparent)]
    #[diagnostic(
        code(pulumi_crd::identity),
        help("override the derived value with the flag named in the message")
    )]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    #[diagnostic(code(pulumi_crd::translate))]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    #[diagnostic(code(pulumi_crd::emit))]
    Emit(#[from] EmitError),

    /// Writing the rendered YAML failed
    #[error("write CRD to {target}: {cause}")]
    #[diagnostic(code(pulumi_crd::output))]
    Output {
        target: String,
        #[source]
        cause: std::io::Error,
    },

    /// The async runtime could not be started
    #[error("start runtime: {0}")]
    #[diagnostic(code(pulumi_crd::runtime))]
    Runtime(#[source] std::io::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Input(err) if err.is_cancelled() => exit_codes::OUTPUT_ERROR,
            CliError::Input(_) => exit_codes::USAGE_ERROR,
            CliError::Select(_) => exit_codes::USAGE_ERROR,
            CliError::Preflight(_) => exit_codes::USAGE_ERROR,
            CliError::Identity(_) => exit_codes::USAGE_ERROR,
            CliError::Translate(TranslateError::Unsupported(_)) => exit_codes::UNSUPPORTED,
            CliError::Translate(_) => exit_codes::USAGE_ERROR,
            CliError::Emit(_) => exit_codes::OUTPUT_ERROR,
            CliError::Output { .. } => exit_codes::OUTPUT_ERROR,
            CliError::Runtime(_) => exit_codes::OUTPUT_ERROR,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pulumi_crd_core::{Severity, UnsupportedError};

    fn unsupported(severity: Severity) -> CliError {
        let err = match severity {
            Severity::Hard => UnsupportedError::hard("pkg:index:Thing", "spec.cycle", "cyclic local ref \"#/types/pkg:index:A\""),
            Severity::Skippable => UnsupportedError::skippable("pkg:index:Thing", "spec.bad", "keyword \"oneOf\""),
        };
        CliError::from(TranslateError::from(err))
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::usage("bad flag").exit_code(), exit_codes::USAGE_ERROR);
        assert_eq!(CliError::from(SelectError::NoComponents).exit_code(), 2);
        assert_eq!(unsupported(Severity::Hard).exit_code(), exit_codes::UNSUPPORTED);
        assert_eq!(CliError::from(EmitError::NullSchema).exit_code(), exit_codes::OUTPUT_ERROR);
        assert_eq!(
            CliError::from(FetchError::Cancelled { location: "schema.json".into() }).exit_code(),
            exit_codes::OUTPUT_ERROR
        );
        assert_eq!(
            CliError::from(TranslateError::NothingTranslatable {
                component: "pkg:index:Thing".into(),
                skipped: Vec::new(),
            })
            .exit_code(),
            exit_codes::USAGE_ERROR
        );
    }

    #[test]
    fn test_messages_pass_through() {
        let err = unsupported(Severity::Hard);
        assert_eq!(
            err.to_string(),
            "unsupported schema component \"pkg:index:Thing\" path \"spec.cycle\": cyclic local ref \"#/types/pkg:index:A\""
        );
        assert_eq!(
            CliError::from(SelectError::NoComponents).to_string(),
            "no component resources found in schema"
        );
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = CliError::from(SelectError::NoComponents);
        assert_eq!(err.code().unwrap().to_string(), "pulumi_crd::select");
        assert!(err.help().is_some());
        assert!(CliError::from(EmitError::NullSchema).help().is_none());
    }
}
