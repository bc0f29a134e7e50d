//! ifupdown interfaces parsing
//!
//! Reading interfaces(5) text into records, one stanza or whole documents,
//! and the named collection used for JSON and document output.

pub mod collection;
pub mod interfaces;
pub mod multi;


pub use collection::Interfaces;
pub use interfaces::{count_iface_stanzas, parse_interface, InterfaceParser};
pub use multi::{MultiParser, ParseReport};
