//! Parse-single command

use std::path::Path;

use anyhow::{Context, Result};
use ifupdown_config::InterfaceParser;

use super::{read_input, to_json, CommandOutput};

/// Converts the text of one interface into JSON
pub struct ParseSingleCommand {
    parser: InterfaceParser,
    pretty: bool,
}

impl ParseSingleCommand {
    /// Create new parse-single command
    pub fn new(pretty: bool) -> Self {
        Self {
            parser: InterfaceParser::new(),
            pretty,
        }
    }

    /// Execute parse-single command
    pub async fn execute(&self, input: Option<&Path>) -> Result<()> {
        let data = read_input(input).await?;
        self.run(&data)?.emit();
        Ok(())
    }

    /// Parse `data` into a record
    ///
    /// Structural errors fail the command. Validation errors are reported but
    /// the record is still written.
    pub fn run(&self, data: &[u8]) -> Result<CommandOutput> {
        let iface = self
            .parser
            .parse(data)
            .context("Failed to parse interface")?;

        let mut output = CommandOutput::default();
        if let Err(e) = iface.validate() {
            log::debug!("interface '{}' does not validate", iface.name);
            output.diagnostics.push(format!("{}: {}", iface.name, e));
        }

        output.stdout = to_json(&iface, self.pretty)?;
        Ok(output)
    }
}
