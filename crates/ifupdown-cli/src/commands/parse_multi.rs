//! Parse-multi command

use std::path::Path;

use anyhow::Result;
use ifupdown_config::MultiParser;
use ifupdown_core::ConfigError;

use super::{read_input, to_json, CommandOutput};

/// Converts an interfaces document into a JSON mapping
pub struct ParseMultiCommand {
    pretty: bool,
}

impl ParseMultiCommand {
    /// Create new parse-multi command
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Execute parse-multi command
    pub async fn execute(&self, input: Option<&Path>) -> Result<()> {
        let data = read_input(input).await?;
        self.run(&data)?.emit();
        Ok(())
    }

    /// Parse a document, leaving out blocks that fail to parse or validate
    pub fn run(&self, data: &[u8]) -> Result<CommandOutput> {
        let parser = MultiParser::new();
        parser.write(data);
        let report = parser.parse();

        let mut output = CommandOutput::default();
        for error in &report.errors {
            match error {
                ConfigError::Block { name, source } => output.skip(name, source),
                ConfigError::DuplicateInterface { name } => output.skip(name, error),
                other => output.diagnostics.push(other.to_string()),
            }
        }

        let mut interfaces = report.interfaces;
        for (name, error) in interfaces.retain_valid() {
            output.skip(&name, error);
        }

        output.stdout = to_json(&interfaces, self.pretty)?;
        Ok(output)
    }
}
