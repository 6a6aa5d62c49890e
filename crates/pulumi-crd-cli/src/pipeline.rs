//! load → select → preflight → identity → translate → render → write

use std::io::Write;
use std::path::PathBuf;

use pulumi_crd_core::{
    IdentityOverrides, component_tokens, preflight_component, render_crd, resolve_identity,
    select_component, translate_component,
};
use pulumi_crd_fetch::{SchemaLoader, SchemaSource};

use crate::error::{CliError, Result};
use crate::reporter::Reporter;

/// Everything one run needs, taken from the command line
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub input: String,
    pub component: String,
    pub overrides: IdentityOverrides,
    pub out: Option<PathBuf>,
}

/// Produce the CRD YAML for `config`
///
/// `cancel` resolves when the user interrupts; only the load waits on it.
pub async fn render<W, F>(
    config: &RunConfig,
    loader: &SchemaLoader,
    reporter: &mut Reporter<W>,
    cancel: F,
) -> Result<String>
where
    W: Write,
    F: Future<Output = ()>,
{
    let source = SchemaSource::parse(&config.input);
    reporter.info(format_args!("loading input schema {:?}", source.to_string()));
    let doc = loader.load_until(&config.input, cancel).await?;

    let tokens = component_tokens(&doc);
    reporter.info(format_args!("found {} component(s): {}", tokens.len(), tokens.join(", ")));

    let selected = select_component(&doc, &config.component)?;
    reporter.info(format_args!("selected component {:?}", selected.token));

    preflight_component(&doc, &selected)?;
    reporter.info("preflight passed");

    let identity = resolve_identity(&doc, selected.token, &config.overrides)?;
    reporter.info(format_args!(
        "identity {} version {} kind {}",
        identity.crd_name(),
        identity.version,
        identity.kind
    ));

    let translation = match translate_component(&doc, &selected) {
        Ok(translation) => translation,
        Err(err) => {
            reporter.warnings(err.skipped());
            return Err(err.into());
        }
    };
    reporter.warnings(&translation.skipped);
    reporter.info(format_args!(
        "translated spec schema ({} path(s) skipped)",
        translation.skipped.len()
    ));

    Ok(render_crd(&identity, &translation.schema)?)
}

/// Write the rendered YAML to `--out` or stdout
pub fn write_output<W: Write>(yaml: &str, config: &RunConfig, reporter: &mut Reporter<W>) -> Result<()> {
    match &config.out {
        Some(path) => {
            std::fs::write(path, yaml).map_err(|cause| CliError::Output {
                target: format!("{:?}", path.display().to_string()),
                cause,
            })?;
            reporter.info(format_args!("wrote CRD to {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(yaml.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|cause| CliError::Output {
                    target: "stdout".into(),
                    cause,
                })?;
        }
    }
    Ok(())
}
