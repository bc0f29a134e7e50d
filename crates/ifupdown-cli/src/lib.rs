//! ifupdown interfaces CLI
//!
//! Command-line conversion between interfaces(5) text and JSON.
//!
//! This crate provides the `ifupctl` binary: parsing a single interface
//! stanza or a whole document into JSON, and turning a JSON mapping of
//! interfaces back into an interfaces file.

pub mod cli;
pub mod commands;
