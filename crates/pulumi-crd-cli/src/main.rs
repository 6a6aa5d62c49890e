//! pulumi-crd - Translate a Pulumi component schema into a Kubernetes CRD

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use pulumi_crd_core::IdentityOverrides;
use pulumi_crd_fetch::SchemaLoader;

mod error;
mod exit_codes;
mod pipeline;
mod reporter;

use error::CliError;
use pipeline::RunConfig;
use reporter::Reporter;

/// Environment variable holding a `tracing` filter for debug logging
const LOG_ENV: &str = "PULUMI_CRD_LOG";

#[derive(Parser, Debug)]
#[command(name = "pulumi-crd")]
#[command(about = "Translate a Pulumi component schema into a Kubernetes CustomResourceDefinition", long_about = None)]
struct Cli {
    /// Pulumi package schema: a local path or an http(s) URL
    #[arg(long = "in", value_name = "PATH_OR_URL")]
    input: String,

    /// Component token to translate (required when the schema has several)
    #[arg(long, value_name = "TOKEN")]
    component: Option<String>,

    /// CRD API group
    #[arg(long)]
    group: Option<String>,

    /// CRD version name (e.g. v1alpha1)
    #[arg(long)]
    version: Option<String>,

    /// CRD kind
    #[arg(long)]
    kind: Option<String>,

    /// CRD plural name
    #[arg(long)]
    plural: Option<String>,

    /// CRD singular name
    #[arg(long)]
    singular: Option<String>,

    /// Write the CRD to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Report pipeline stages and skipped schema paths on stderr
    #[arg(long)]
    verbose: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            component: cli.component.unwrap_or_default(),
            overrides: IdentityOverrides {
                group: cli.group,
                version: cli.version,
                kind: cli.kind,
                plural: cli.plural,
                singular: cli.singular,
            },
            out: cli.out,
        }
    }
}

fn main() -> ExitCode {
    miette::set_panic_hook();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(err),
    };

    let mut reporter = Reporter::stderr(cli.verbose);
    let config = RunConfig::from(cli);

    match run(&config, &mut reporter) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            tracing::debug!(code = ?miette::Diagnostic::code(&err).map(|c| c.to_string()), "run failed");
            reporter.error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(config: &RunConfig, reporter: &mut Reporter<std::io::Stderr>) -> error::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let loader = SchemaLoader::from_env();
    let yaml = runtime.block_on(pipeline::render(config, &loader, reporter, interrupted()))?;
    pipeline::write_output(&yaml, config, reporter)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// `--help` goes to stdout with exit 0; anything else becomes one `error:` line
fn parse_failure(err: clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = err.print();
        return ExitCode::from(exit_codes::SUCCESS);
    }

    let err = CliError::usage(usage_message(&err.render().to_string()));
    Reporter::stderr(false).error(&err);
    ExitCode::from(err.exit_code())
}

/// Collapse clap's multi-line report into its first paragraph
fn usage_message(rendered: &str) -> String {
    let paragraph: Vec<&str> = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect();
    let joined = paragraph.join(" ");
    joined
        .strip_prefix("error: ")
        .unwrap_or(&joined)
        .to_string()
}

fn init_tracing() {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&directives)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "pulumi-crd",
            "--in",
            "schema.json",
            "--component",
            "pkg:index:Thing",
            "--version",
            "v2",
            "--out",
            "crd.yaml",
        ])
        .unwrap();
        let config = RunConfig::from(cli);
        assert_eq!(config.input, "schema.json");
        assert_eq!(config.component, "pkg:index:Thing");
        assert_eq!(config.overrides.version.as_deref(), Some("v2"));
        assert_eq!(config.overrides.group, None);
        assert_eq!(config.out, Some(PathBuf::from("crd.yaml")));
    }

    #[test]
    fn test_missing_input_is_usage_error() {
        let err = Cli::try_parse_from(["pulumi-crd"]).unwrap_err();
        let message = usage_message(&err.render().to_string());
        assert!(message.starts_with("the following required arguments were not provided"));
        assert!(message.contains("--in <PATH_OR_URL>"));
        assert!(!message.contains('\n'));
    }

    #[test]
    fn test_unknown_flag_message() {
        let err = Cli::try_parse_from(["pulumi-crd", "--in", "x", "--bogus"]).unwrap_err();
        assert_eq!(
            usage_message(&err.render().to_string()),
            "unexpected argument '--bogus' found"
        );
    }
}
