//! CLI commands

pub mod json_to_ifup;
pub mod parse_multi;
pub mod parse_single;

pub use json_to_ifup::JsonToIfupCommand;
pub use parse_multi::ParseMultiCommand;
pub use parse_single::ParseSingleCommand;

use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// What a command prints: the result on stdout, diagnostics on stderr
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub diagnostics: Vec<String>,
}

impl CommandOutput {
    fn skip(&mut self, name: &str, error: impl Display) {
        self.diagnostics
            .push(format!("{}: skip due to error: {}", name, error));
    }

    /// Print diagnostics to stderr and the result to stdout
    pub fn emit(&self) {
        for line in &self.diagnostics {
            eprintln!("{}", line);
        }
        print!("{}", self.stdout);
    }
}

/// Read all of `path`, or all of standard input when no path is given
pub async fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut data = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut data)
                .await
                .context("Failed to read standard input")?;
            Ok(data)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to encode JSON")?;
    json.push('\n');
    Ok(json)
}
