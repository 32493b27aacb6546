//! Library entry point for vuesweep.
//!
//! The engine finds Vue projects below a root, measures their `node_modules`
//! and `dist` directories, and removes those directories on request. Scans
//! and deletion batches run on background threads and stream their results
//! as events; the caller keeps the records in a [`index::ProjectIndex`].

pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod path;
pub mod reclaim;
pub mod report;
pub mod scanner;
pub mod scanners;
pub mod utils;
