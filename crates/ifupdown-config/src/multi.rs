//! Parser for whole interfaces documents
//!
//! Text is accumulated through [`MultiParser::write`] (or `std::io::Write`)
//! and split into per-interface blocks on [`MultiParser::parse`]. Each block
//! is handed to the single-stanza [`InterfaceParser`].

use std::collections::HashSet;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use regex::Regex;

use ifupdown_core::{ConfigError, NetworkInterface};

use crate::collection::Interfaces;
use crate::interfaces::{count_iface_stanzas, InterfaceParser};

/// Name given to a trailing block that never named an interface
const UNKNOWN_BLOCK: &str = "unknown";

/// Outcome of parsing a document
///
/// Blocks that parsed are kept even when others failed.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub interfaces: Interfaces,
    pub errors: Vec<ConfigError>,
}

impl ParseReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All block errors combined into one, if there were any
    pub fn error(&self) -> Option<ConfigError> {
        match self.errors.len() {
            0 => None,
            _ => Some(ConfigError::Multiple {
                errors: self.errors.clone(),
            }),
        }
    }

    /// The interfaces, or the combined error when any block failed
    pub fn into_result(self) -> Result<Interfaces, ConfigError> {
        match self.errors.len() {
            0 => Ok(self.interfaces),
            _ => Err(ConfigError::Multiple {
                errors: self.errors,
            }),
        }
    }
}

/// Buffered parser for documents describing any number of interfaces
#[derive(Debug)]
pub struct MultiParser {
    buffer: Mutex<Vec<u8>>,
    block_start: Regex,
    parser: InterfaceParser,
}

impl Default for MultiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiParser {
    /// Create new parser with an empty buffer
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            block_start: Regex::new(r"^(?:auto|allow-\S+|iface)\s+(\S+)")
                .expect("block start pattern is valid"),
            parser: InterfaceParser::new(),
        }
    }

    /// Append document bytes, returning how many were taken
    pub fn write(&self, data: &[u8]) -> usize {
        self.lock().extend_from_slice(data);
        data.len()
    }

    /// Split the buffered document into blocks and parse each of them
    pub fn parse(&self) -> ParseReport {
        let buffer = self.lock();
        let content = String::from_utf8_lossy(&buffer);

        let mut report = ParseReport::default();
        let mut current: Option<String> = None;
        let mut pending: Vec<&str> = Vec::new();
        let mut stanzas: HashSet<String> = HashSet::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = self.block_name(line) {
                if current.as_deref() != Some(name) {
                    if let Some(open) = current.take() {
                        self.flush_block(&open, &pending, &mut stanzas, &mut report);
                        pending.clear();
                    }
                    current = Some(name.to_string());
                }
            }

            pending.push(line);
        }

        if !pending.is_empty() {
            let name = current.as_deref().unwrap_or(UNKNOWN_BLOCK);
            self.flush_block(name, &pending, &mut stanzas, &mut report);
        }

        log::debug!(
            "parsed {} interfaces with {} block errors",
            report.interfaces.len(),
            report.errors.len()
        );

        report
    }

    /// Interface named by a block start line
    fn block_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.block_start
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Parse one block and store it
    ///
    /// A block naming an interface that is already stored extends that
    /// record, so `auto` lines grouped ahead of their stanzas end up on the
    /// stanza's record. Two `iface` stanzas for one name are a duplicate.
    fn flush_block(
        &self,
        name: &str,
        lines: &[&str],
        stanzas: &mut HashSet<String>,
        report: &mut ParseReport,
    ) {
        log::debug!("parsing block '{}' ({} lines)", name, lines.len());

        let mut text = lines.join("\n");
        text.push('\n');
        let has_stanza = count_iface_stanzas(&text) > 0;

        let mut iface = match report.interfaces.get(name) {
            Some(_) if has_stanza && stanzas.contains(name) => {
                log::warn!("duplicate interface '{}', keeping the first", name);
                report.errors.push(ConfigError::DuplicateInterface {
                    name: name.to_string(),
                });
                return;
            }
            Some(existing) => existing.clone(),
            None => {
                let mut iface = NetworkInterface::default();
                iface.name = name.to_string();
                iface
            }
        };

        if let Err(e) = self.parser.parse_into(&mut iface, text.as_bytes()) {
            report.errors.push(ConfigError::Block {
                name: name.to_string(),
                source: Box::new(e),
            });
            return;
        }

        if has_stanza {
            stanzas.insert(iface.name.clone());
        }
        report.interfaces.insert(iface);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl io::Write for &MultiParser {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(MultiParser::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
