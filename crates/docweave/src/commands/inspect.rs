//! Inspect command - list the tokens of a template

use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use docweave_core::template::Template;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct TokenOutput {
    kind: &'static str,
    path: String,
    location: String,
}

/// Print every active token of a template in document order
pub fn run(template: &Path, json: bool) -> Result<()> {
    let tokens: Vec<TokenOutput> = Template::from_file(template)
        .inspect()?
        .iter()
        .map(|t| TokenOutput {
            kind: t.kind_name(),
            path: t.subject(),
            location: t.location.clone(),
        })
        .collect();

    if json {
        return print_json(&tokens);
    }

    if tokens.is_empty() {
        print_text(&format!("{} No placeholder tokens found", "!".yellow()))?;
        return Ok(());
    }
    for token in &tokens {
        let padded = format!("{:<11}", token.kind);
        let kind = match token.kind {
            "placeholder" => padded.green(),
            "command" => padded.cyan(),
            _ => padded.blue(),
        };
        print_text(&format!("{} {} ({})", kind, token.path, token.location))?;
    }
    Ok(())
}
