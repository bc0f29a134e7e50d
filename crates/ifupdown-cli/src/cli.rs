//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ifupctl")]
#[command(about = "Convert between ifupdown interfaces files and JSON")]
#[command(long_about = "
Convert between ifupdown interfaces files and JSON

Input is read from FILE, or from standard input when FILE is omitted.
Records that fail validation are reported on standard error and left out
of the output.

Examples:
  ifupctl parse-single eth0.cfg                # One stanza to JSON
  ifupctl parse-multi /etc/network/interfaces  # Whole document to JSON
  ifupctl --compact parse-multi < interfaces   # Unindented JSON
  ifupctl json-to-ifup interfaces.json         # JSON mapping to a document
")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write JSON without indentation
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse the text of one interface into JSON
    ParseSingle {
        /// Interface stanza to read (standard input when omitted)
        file: Option<PathBuf>,
    },

    /// Parse an interfaces document into a JSON mapping
    ParseMulti {
        /// Interfaces document to read (standard input when omitted)
        file: Option<PathBuf>,
    },

    /// Render a JSON mapping of interfaces as an interfaces document
    JsonToIfup {
        /// JSON document to read (standard input when omitted)
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Default log filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
