#![forbid(unsafe_code)]
//! weft-graph: the relationship-graph engine.
//!
//! Builds an immutable in-memory graph over heterogeneous content
//! collections: direct references both ways, per-collection parent/child
//! hierarchy, and optional bounded-depth transitive relations — then serves
//! reads through an atomically swapped cache.
//!
//! # Module layout
//!
//! - [`build`] — [`ContentGraph`], [`BuildOptions`], and the phased
//!   [`build_graph`] pipeline.
//! - [`node`] — [`Node`] and the derived [`RelationMap`].
//! - [`cache`] — [`GraphCache`], the caller-owned build cache.
//! - [`query`] — read helpers (`entries_of`, `children_of`, `roots_of`, …).
//! - [`report`] — [`BuildReport`] and the warning taxonomy.
//! - [`stats`] — [`GraphStats`] diagnostics.
//! - [`config`] — optional TOML build configuration.
//!
//! # Usage sketch
//!
//! ```rust,no_run
//! use weft_core::FsSource;
//! use weft_graph::{BuildOptions, GraphCache, query};
//!
//! let cache = GraphCache::new(FsSource::new("content"));
//! let graph = cache.get_or_build(&BuildOptions::default()).unwrap();
//! for record in query::roots_of(&graph, "services") {
//!     println!("{}", record.id);
//! }
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at API boundaries; only a
//!   collection-load failure aborts a build.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod build;
pub mod cache;
pub mod config;
mod hierarchy;
mod indirect;
pub mod node;
pub mod query;
pub mod report;
pub mod stats;

pub use build::{BuildError, BuildOptions, ContentGraph, DEFAULT_INDIRECT_DEPTH, build_graph};
pub use cache::GraphCache;
pub use config::GraphConfig;
pub use node::{IndirectRelation, Node, Relation, RelationMap, TreeRelation};
pub use query::{ChildrenOpts, by_order, children_of, entries_of, leaves_of, relations_of, roots_of};
pub use report::{BuildReport, BuildWarning};
pub use stats::GraphStats;
