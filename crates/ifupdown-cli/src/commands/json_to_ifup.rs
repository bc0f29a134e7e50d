//! JSON-to-ifup command

use std::path::Path;

use anyhow::{Context, Result};
use ifupdown_config::Interfaces;

use super::{read_input, CommandOutput};

/// Renders a JSON mapping of interfaces as an interfaces document
#[derive(Default)]
pub struct JsonToIfupCommand;

impl JsonToIfupCommand {
    /// Create new json-to-ifup command
    pub fn new() -> Self {
        Self
    }

    /// Execute json-to-ifup command
    pub async fn execute(&self, input: Option<&Path>) -> Result<()> {
        let data = read_input(input).await?;
        self.run(&data)?.emit();
        Ok(())
    }

    /// Decode `data` and render every record that validates
    pub fn run(&self, data: &[u8]) -> Result<CommandOutput> {
        let json = std::str::from_utf8(data).context("Input is not valid UTF-8")?;
        let mut interfaces =
            Interfaces::from_json(json).context("Failed to decode interfaces JSON")?;

        let mut output = CommandOutput::default();
        for (name, error) in interfaces.retain_valid() {
            output.skip(&name, error);
        }

        output.stdout = interfaces.render();
        Ok(output)
    }
}
