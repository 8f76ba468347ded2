#![forbid(unsafe_code)]
//! weft-core: foundational types for the weft relationship-graph engine.
//!
//! This crate holds everything the graph engine consumes but does not own:
//!
//! - [`key`] — composite `(collection, id)` node keys and id normalization.
//! - [`record`] — raw content records (an identifier plus an opaque JSON
//!   data bag) and slug/id extraction rules.
//! - [`reference`] — classification and normalization of the heterogeneous
//!   reference representations found inside record data.
//! - [`source`] — the [`ContentSource`] abstraction the content layer
//!   implements, plus in-memory and filesystem implementations.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at API boundaries; `anyhow::Result`
//!   with context for internal helpers.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod key;
pub mod record;
pub mod reference;
pub mod source;

pub use key::EntryKey;
pub use record::RawRecord;
pub use reference::{
    InvalidShape, PARENT_FIELD, extract_relation_fields, is_parent_field, is_reference_shaped,
    normalize_reference,
};
pub use source::{ContentSource, FsSource, MemorySource, NAV_COLLECTIONS, SourceError};
