//! Connectable sources, the connected-account model, and IMAP form helpers.

pub mod account;
pub mod catalog;
pub mod imap;

pub use account::*;
pub use catalog::{SOURCES, Source, SourceKind, find_source};
pub use imap::*;
