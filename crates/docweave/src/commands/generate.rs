//! Generate command - fill a template with JSON data

use crate::cli::GenerateArgs;
use crate::output::print_text;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use docweave_core::DocweaveConfig;
use docweave_core::placeholder::{
    CustomPlaceholderRegistryImpl, DirectiveSchema, JsonBean, Property, ReflectionResolver,
};
use docweave_core::template::Template;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file picked up from the working directory when `--config` is absent
const LOCAL_CONFIG: &str = "docweave.toml";

/// Generate a document and print where it was written
///
/// # Errors
///
/// Returns an error if:
/// - The config, schema or data file cannot be read or parsed
/// - The generation fails or does not finish within the timeout
pub fn run(args: GenerateArgs, verbose: bool) -> Result<()> {
    let config = load_config(&args)?;

    let schema = match &args.schema {
        Some(path) => DirectiveSchema::from_file(path)
            .with_context(|| format!("Failed to load schema {}", path.display()))?,
        None => DirectiveSchema::default(),
    };
    let bean = JsonBean::from_file(&args.data, schema)
        .with_context(|| format!("Failed to load data {}", args.data.display()))?;
    let resolver = ReflectionResolver::with_registry(
        Property::object(bean),
        Arc::new(CustomPlaceholderRegistryImpl::with_builtins()),
    );

    let template = Template::from_file(&args.template).with_config(&config)?;
    if verbose {
        eprintln!(
            "{} Generating {} ({}, {})",
            "→".cyan(),
            args.template.display(),
            template.kind(),
            template.locale()
        );
    }

    let handle = template.start_generation(Arc::new(resolver));
    handle.block_until_completion(config.wait_timeout())?;
    if let Some(failure) = handle.failure() {
        bail!(failure);
    }

    let artifact = handle.artifact_location()?;
    if verbose {
        eprintln!("{} Generated {}", "✓".green().bold(), artifact.display());
    }
    print_text(&artifact.display().to_string())?;
    Ok(())
}

/// Config from `--config`, else `./docweave.toml`, else defaults, with flags applied on top
fn load_config(args: &GenerateArgs) -> Result<DocweaveConfig> {
    let mut config = match config_path(args.config.as_deref()) {
        Some(path) => DocweaveConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DocweaveConfig::default(),
    };

    if let Some(locale) = &args.locale {
        config.generation.locale = locale.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.generation.wait_timeout_ms = timeout_ms;
    }
    if let Some(dir) = &args.output_dir {
        config.generation.output_dir = Some(dir.clone());
    }
    config
        .remote_images
        .trusted_domains
        .extend(args.trusted.iter().cloned());

    config.validate()?;
    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG);
            local.is_file().then_some(local)
        }
    }
}
