//! Error types and result definitions for the framepipe pipeline library.
//!
//! All framepipe crates share a single error enum ([`Error`]) and result type
//! alias ([`Result<T>`]). Stages never catch or translate failures: whatever a
//! stage (or a caller-supplied predicate or transform) raises propagates
//! unchanged with the `?` operator until the pipeline runner aborts the run.
//!
//! # Error Categories
//!
//! - **Lookup failures** ([`Error::ColumnNotFound`]): a referenced column is
//!   absent from the table state the stage received
//! - **Mini-syntax errors** ([`Error::Parse`]): malformed rename, sort, or
//!   aggregation directive strings
//! - **Aggregation errors** ([`Error::UnknownAggregation`]): an unsupported
//!   aggregation function name
//! - **Shape errors** ([`Error::ShapeMismatch`]): a column transform produced
//!   the wrong number of rows
//! - **I/O errors** ([`Error::Io`]): CSV export failures
//! - **Engine errors** ([`Error::Arrow`]): failures surfaced by Arrow kernels

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
