//! Typed directive parsers for the framepipe stage mini-syntax.
//!
//! Three stage builders accept small directive strings instead of structured
//! arguments: `rename` takes `"old = new"` mappings, `arrange` takes
//! `"col"`/`"col desc"` sort directives, and `summarize` takes
//! `"new = func(col)"` aggregation specs. This crate holds the typed forms of
//! those directives and the parsers that produce them. The grammars are exact
//! and deliberately small; anything that does not match fails with a
//! [`framepipe_result::Error::Parse`] naming the offending string.

pub mod aggregate;
pub mod rename;
pub mod sort;

// Note: for API simplicity these are also exported out of their modules.
pub use aggregate::{AggregateKind, AggregateSpec};
pub use rename::RenameSpec;
pub use sort::SortSpec;
